//! Stub transcoding engine for pipeline tests.

use crate::engine::{TranscodeError, TranscodingEngine};
use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

/// Writes a minimal single-variant HLS tree instead of invoking ffmpeg, or
/// fails on demand to exercise rollback paths.
#[derive(Default)]
pub struct StubEngine {
    fail_next: AtomicBool,
}

impl StubEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_next(&self, fail: bool) {
        self.fail_next.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl TranscodingEngine for StubEngine {
    async fn encode_to_hls(&self, _input: &Path, output_dir: &Path) -> Result<(), TranscodeError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(TranscodeError::Encoder("stub failure".to_string()));
        }

        let variant_dir = output_dir.join("480p");
        tokio::fs::create_dir_all(&variant_dir).await?;
        tokio::fs::write(
            variant_dir.join("index.m3u8"),
            "#EXTM3U\n#EXT-X-VERSION:3\n#EXTINF:10.0,\nsegment_000.ts\n#EXT-X-ENDLIST\n",
        )
        .await?;
        tokio::fs::write(variant_dir.join("segment_000.ts"), b"stub segment").await?;
        tokio::fs::write(
            output_dir.join("master.m3u8"),
            "#EXTM3U\n#EXT-X-VERSION:3\n\n#EXT-X-STREAM-INF:BANDWIDTH=1400000,RESOLUTION=854x480\n480p/index.m3u8\n",
        )
        .await?;

        Ok(())
    }
}
