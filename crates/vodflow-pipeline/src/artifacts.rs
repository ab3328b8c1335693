use bytes::Bytes;
use std::path::Path;
use std::sync::Arc;
use vodflow_core::PipelineError;
use vodflow_storage::BlobStore;

/// URLs of the uploaded HLS tree. `video_url` points at the master playlist,
/// the entry point players consume.
#[derive(Debug, Clone)]
pub struct EncodedArtifacts {
    pub video_url: String,
    pub playlist_urls: Vec<String>,
    pub segment_urls: Vec<String>,
}

/// Pushes encoded output to durable storage under `{user_id}/{video_id}/...`
/// keys mirroring the local HLS tree.
pub struct ArtifactUploader {
    store: Arc<dyn BlobStore>,
}

impl ArtifactUploader {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    fn content_type_for(path: &Path) -> &'static str {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("m3u8") => "application/vnd.apple.mpegurl",
            Some("ts") => "video/mp2t",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("png") => "image/png",
            _ => "application/octet-stream",
        }
    }

    /// Upload every file under `dir`. Fails if the tree has no master
    /// playlist; a tree without an entry point is unplayable.
    #[tracing::instrument(skip(self, dir), fields(user_id = %user_id, video_id = %video_id))]
    pub async fn upload_directory(
        &self,
        user_id: &str,
        video_id: &str,
        dir: &Path,
    ) -> Result<EncodedArtifacts, PipelineError> {
        let mut video_url = None;
        let mut playlist_urls = Vec::new();
        let mut segment_urls = Vec::new();

        // Iterative walk; the tree is two levels deep but this stays correct
        // if the variant layout changes.
        let mut pending = vec![dir.to_path_buf()];
        while let Some(current) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&current).await.map_err(|e| {
                PipelineError::Upload(format!("failed to read {}: {}", current.display(), e))
            })?;

            while let Some(entry) = entries.next_entry().await.map_err(|e| {
                PipelineError::Upload(format!("failed to read {}: {}", current.display(), e))
            })? {
                let path = entry.path();
                let file_type = entry.file_type().await.map_err(|e| {
                    PipelineError::Upload(format!("failed to stat {}: {}", path.display(), e))
                })?;
                if file_type.is_dir() {
                    pending.push(path);
                    continue;
                }

                let relative = path
                    .strip_prefix(dir)
                    .map_err(|e| PipelineError::Upload(e.to_string()))?
                    .to_string_lossy()
                    .replace('\\', "/");
                let key = format!("{}/{}/{}", user_id, video_id, relative);

                let data = tokio::fs::read(&path).await.map_err(|e| {
                    PipelineError::Upload(format!("failed to read {}: {}", path.display(), e))
                })?;

                let url = self
                    .store
                    .put_object(&key, Bytes::from(data), Self::content_type_for(&path))
                    .await
                    .map_err(|e| PipelineError::Upload(e.to_string()))?;

                if relative == "master.m3u8" {
                    video_url = Some(url);
                } else if relative.ends_with(".m3u8") {
                    playlist_urls.push(url);
                } else {
                    segment_urls.push(url);
                }
            }
        }

        let video_url = video_url.ok_or_else(|| {
            PipelineError::Upload("encoded output has no master.m3u8".to_string())
        })?;

        tracing::info!(
            playlist_count = playlist_urls.len(),
            segment_count = segment_urls.len(),
            "Encoded artifacts uploaded"
        );

        Ok(EncodedArtifacts {
            video_url,
            playlist_urls,
            segment_urls,
        })
    }

    /// Upload the thumbnail for the metadata step and return its URL. The
    /// object name is fixed to `thumbnail.{ext}` so a client filename can
    /// never collide with the HLS objects under the same prefix.
    pub async fn upload_thumbnail(
        &self,
        user_id: &str,
        video_id: &str,
        filename: &str,
        data: Bytes,
    ) -> Result<String, PipelineError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .unwrap_or_else(|| "jpg".to_string());
        let key = format!("{}/{}/thumbnail.{}", user_id, video_id, extension);
        self.store
            .put_object(&key, data, Self::content_type_for(Path::new(filename)))
            .await
            .map_err(|e| PipelineError::Upload(e.to_string()))
    }

    /// Best-effort removal of already-uploaded objects during rollback.
    pub async fn delete_objects(&self, artifacts: &EncodedArtifacts, user_id: &str, video_id: &str) {
        let prefix = format!("{}/{}/", user_id, video_id);
        let keys = std::iter::once(&artifacts.video_url)
            .chain(artifacts.playlist_urls.iter())
            .chain(artifacts.segment_urls.iter());

        for url in keys {
            // URLs come back from the store; recover the key from the suffix.
            if let Some(idx) = url.find(&prefix) {
                let key = &url[idx..];
                if let Err(e) = self.store.delete_object(key).await {
                    tracing::warn!(key = key, error = %e, "Failed to delete artifact during rollback");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vodflow_processing::test_helpers::StubEngine;
    use vodflow_processing::TranscodingEngine;
    use vodflow_storage::MemoryBlobStore;

    #[tokio::test]
    async fn test_uploads_hls_tree_and_returns_master_url() {
        let dir = tempfile::tempdir().unwrap();
        StubEngine::new()
            .encode_to_hls(Path::new("unused.mp4"), dir.path())
            .await
            .unwrap();

        let store = Arc::new(MemoryBlobStore::new());
        let uploader = ArtifactUploader::new(store.clone());

        let artifacts = uploader
            .upload_directory("u1", "v1", dir.path())
            .await
            .unwrap();

        assert!(artifacts.video_url.ends_with("u1/v1/master.m3u8"));
        assert_eq!(artifacts.playlist_urls.len(), 1);
        assert_eq!(artifacts.segment_urls.len(), 1);
        assert_eq!(store.object_count(), 3);
    }

    #[tokio::test]
    async fn test_missing_master_playlist_is_upload_error() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("index.m3u8"), b"#EXTM3U")
            .await
            .unwrap();

        let uploader = ArtifactUploader::new(Arc::new(MemoryBlobStore::new()));
        let err = uploader
            .upload_directory("u1", "v1", dir.path())
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Upload(_)));
    }

    #[tokio::test]
    async fn test_thumbnail_filename_cannot_clobber_playlist_objects() {
        let dir = tempfile::tempdir().unwrap();
        StubEngine::new()
            .encode_to_hls(Path::new("unused.mp4"), dir.path())
            .await
            .unwrap();

        let store = Arc::new(MemoryBlobStore::new());
        let uploader = ArtifactUploader::new(store.clone());
        uploader
            .upload_directory("u1", "v1", dir.path())
            .await
            .unwrap();
        let (master, _) = store.get("u1/v1/master.m3u8").unwrap();

        let url = uploader
            .upload_thumbnail("u1", "v1", "master.m3u8", Bytes::from_static(b"\xff\xd8jpeg"))
            .await
            .unwrap();

        assert!(url.ends_with("u1/v1/thumbnail.m3u8"));
        assert_eq!(store.get("u1/v1/master.m3u8").unwrap().0, master);
    }

    #[tokio::test]
    async fn test_thumbnail_key_uses_fixed_name() {
        let store = Arc::new(MemoryBlobStore::new());
        let uploader = ArtifactUploader::new(store.clone());

        let url = uploader
            .upload_thumbnail("u1", "v1", "cover-photo.PNG", Bytes::from_static(b"png"))
            .await
            .unwrap();

        assert!(url.ends_with("u1/v1/thumbnail.png"));
        assert!(store.get("u1/v1/thumbnail.png").is_some());
    }

    #[tokio::test]
    async fn test_delete_objects_rolls_back_uploads() {
        let dir = tempfile::tempdir().unwrap();
        StubEngine::new()
            .encode_to_hls(Path::new("unused.mp4"), dir.path())
            .await
            .unwrap();

        let store = Arc::new(MemoryBlobStore::new());
        let uploader = ArtifactUploader::new(store.clone());
        let artifacts = uploader
            .upload_directory("u1", "v1", dir.path())
            .await
            .unwrap();

        uploader.delete_objects(&artifacts, "u1", "v1").await;
        assert_eq!(store.object_count(), 0);
    }
}
