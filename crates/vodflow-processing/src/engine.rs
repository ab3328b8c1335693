use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Failed to execute transcoder: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Transcoder exited with failure: {0}")]
    Encoder(String),

    #[error("No variants were generated")]
    NoVariants,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// HLS encoding seam. The production engine shells out to ffmpeg; tests swap
/// in a stub that writes a minimal playlist tree.
#[async_trait]
pub trait TranscodingEngine: Send + Sync {
    /// Encode `input` into an HLS tree under `output_dir`: one subdirectory
    /// per variant plus a `master.m3u8` at the root.
    async fn encode_to_hls(&self, input: &Path, output_dir: &Path) -> Result<(), TranscodeError>;
}
