use std::path::{Path, PathBuf};
use std::sync::Arc;
use vodflow_core::PipelineError;
use vodflow_processing::TranscodingEngine;

/// Runs the encoder and enforces the disk contract: the raw input is deleted
/// whether encoding succeeds or fails, and a failed run leaves no partial
/// output behind.
pub struct TranscodeStage {
    engine: Arc<dyn TranscodingEngine>,
}

impl TranscodeStage {
    pub fn new(engine: Arc<dyn TranscodingEngine>) -> Self {
        Self { engine }
    }

    /// Encode `input` into an HLS tree in a sibling `hls` directory and
    /// return that directory.
    #[tracing::instrument(skip(self, input), fields(input = %input.display()))]
    pub async fn run(&self, input: &Path) -> Result<PathBuf, PipelineError> {
        let output_dir = input
            .parent()
            .map(|p| p.join("hls"))
            .ok_or_else(|| PipelineError::Transcode("input path has no parent".to_string()))?;

        let result = self.engine.encode_to_hls(input, &output_dir).await;

        // The raw upload is single-use; never keep it past this stage.
        if let Err(e) = tokio::fs::remove_file(input).await {
            tracing::warn!(path = %input.display(), error = %e, "Failed to delete raw input");
        }

        match result {
            Ok(()) => Ok(output_dir),
            Err(e) => {
                let _ = tokio::fs::remove_dir_all(&output_dir).await;
                Err(PipelineError::Transcode(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vodflow_processing::test_helpers::StubEngine;

    async fn staged_input(dir: &Path) -> PathBuf {
        let video_dir = dir.join("u1/v1");
        tokio::fs::create_dir_all(&video_dir).await.unwrap();
        let input = video_dir.join("trip.mp4");
        tokio::fs::write(&input, b"raw").await.unwrap();
        input
    }

    #[tokio::test]
    async fn test_success_deletes_raw_and_keeps_hls() {
        let dir = tempfile::tempdir().unwrap();
        let input = staged_input(dir.path()).await;
        let stage = TranscodeStage::new(Arc::new(StubEngine::new()));

        let output = stage.run(&input).await.unwrap();

        assert!(!input.exists());
        assert_eq!(output, dir.path().join("u1/v1/hls"));
        assert!(output.join("master.m3u8").exists());
    }

    #[tokio::test]
    async fn test_failure_deletes_raw_and_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let input = staged_input(dir.path()).await;
        let engine = Arc::new(StubEngine::new());
        engine.set_fail_next(true);
        let stage = TranscodeStage::new(engine);

        let err = stage.run(&input).await.unwrap_err();

        assert!(matches!(err, PipelineError::Transcode(_)));
        assert!(!input.exists());
        assert!(!dir.path().join("u1/v1/hls").exists());
    }
}
