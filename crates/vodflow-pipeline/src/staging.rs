use bytes::Bytes;
use std::path::{Path, PathBuf};
use vodflow_core::PipelineError;
use vodflow_processing::UploadValidator;

/// Local scratch space for raw uploads, laid out as
/// `{root}/{user_id}/{video_id}/{video_id}.{ext}`.
pub struct StagingArea {
    root: PathBuf,
    validator: UploadValidator,
}

impl StagingArea {
    pub fn new(root: impl Into<PathBuf>, validator: UploadValidator) -> Self {
        Self {
            root: root.into(),
            validator,
        }
    }

    pub fn video_dir(&self, user_id: &str, video_id: &str) -> PathBuf {
        self.root.join(user_id).join(video_id)
    }

    /// Validate and write the raw upload to disk. A partially written file is
    /// removed before the error is returned.
    #[tracing::instrument(skip(self, data), fields(user_id = %user_id, video_id = %video_id, size = data.len()))]
    pub async fn stage(
        &self,
        user_id: &str,
        video_id: &str,
        filename: &str,
        data: Bytes,
    ) -> Result<PathBuf, PipelineError> {
        let extension = self.validator.validate(filename, data.len())?;

        // The on-disk name is derived from the id and the validated extension.
        // The client filename never becomes a path component.
        let dir = self.video_dir(user_id, video_id);
        let path = dir.join(format!("{}.{}", video_id, extension));

        if let Err(e) = self.write_file(&dir, &path, &data).await {
            let _ = tokio::fs::remove_file(&path).await;
            return Err(PipelineError::StorageWrite(format!(
                "failed to stage {}: {}",
                path.display(),
                e
            )));
        }

        tracing::debug!(path = %path.display(), "Raw upload staged");
        Ok(path)
    }

    async fn write_file(&self, dir: &Path, path: &Path, data: &[u8]) -> std::io::Result<()> {
        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(path, data).await
    }

    /// Remove everything staged for this upload. Best effort.
    pub async fn cleanup(&self, user_id: &str, video_id: &str) {
        let dir = self.video_dir(user_id, video_id);
        if let Err(e) = tokio::fs::remove_dir_all(&dir).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(dir = %dir.display(), error = %e, "Failed to clean staging directory");
            }
        }
        // Reclaim the per-user directory once no other upload is staged in it.
        // remove_dir refuses non-empty directories, so concurrent uploads are safe.
        let _ = tokio::fs::remove_dir(self.root.join(user_id)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staging(root: &Path) -> StagingArea {
        StagingArea::new(
            root,
            UploadValidator::new(1024, vec!["mp4".to_string()]),
        )
    }

    #[tokio::test]
    async fn test_stage_writes_under_user_video_dir() {
        let dir = tempfile::tempdir().unwrap();
        let staging = staging(dir.path());

        let path = staging
            .stage("u1", "v1", "trip.mp4", Bytes::from_static(b"raw"))
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("u1/v1/v1.mp4"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"raw");
    }

    #[tokio::test]
    async fn test_traversal_filename_cannot_escape_staging_root() {
        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        let staging = staging(dir.path());

        let filename = format!("../../../..{}/evil.mp4", outside.path().display());
        let path = staging
            .stage("u1", "v1", &filename, Bytes::from_static(b"raw"))
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("u1/v1/v1.mp4"));
        assert!(!outside.path().join("evil.mp4").exists());
    }

    #[tokio::test]
    async fn test_stage_rejects_invalid_upload_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let staging = staging(dir.path());

        let err = staging
            .stage("u1", "v1", "trip.avi", Bytes::from_static(b"raw"))
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Validation(_)));
        assert!(!dir.path().join("u1/v1").exists());
    }

    #[tokio::test]
    async fn test_cleanup_removes_whole_upload_dir() {
        let dir = tempfile::tempdir().unwrap();
        let staging = staging(dir.path());

        staging
            .stage("u1", "v1", "trip.mp4", Bytes::from_static(b"raw"))
            .await
            .unwrap();
        staging.cleanup("u1", "v1").await;

        assert!(!dir.path().join("u1/v1").exists());
        assert!(!dir.path().join("u1").exists());
    }

    #[tokio::test]
    async fn test_cleanup_keeps_user_dir_with_other_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let staging = staging(dir.path());

        staging
            .stage("u1", "v1", "trip.mp4", Bytes::from_static(b"raw"))
            .await
            .unwrap();
        staging
            .stage("u1", "v2", "trip.mp4", Bytes::from_static(b"raw"))
            .await
            .unwrap();
        staging.cleanup("u1", "v1").await;

        assert!(!dir.path().join("u1/v1").exists());
        assert!(dir.path().join("u1/v2/v2.mp4").exists());
    }
}
