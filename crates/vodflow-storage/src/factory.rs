use crate::{BlobStore, LocalBlobStore, S3BlobStore, StorageError, StorageResult};
use std::sync::Arc;
use vodflow_core::{Config, StorageBackend};

/// Build the configured blob store backend.
pub async fn create_blob_store(config: &Config) -> StorageResult<Arc<dyn BlobStore>> {
    match config.storage_backend {
        StorageBackend::Local => {
            let path = config.local_storage_path.as_deref().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH is not set".to_string())
            })?;
            let base_url = config.local_storage_base_url.as_deref().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_BASE_URL is not set".to_string())
            })?;

            let store = LocalBlobStore::new(path, base_url.to_string()).await?;
            tracing::info!(path = %path, "Using local blob store");
            Ok(Arc::new(store))
        }
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket
                .as_deref()
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET is not set".to_string()))?;
            let region = config
                .s3_region
                .as_deref()
                .ok_or_else(|| StorageError::ConfigError("S3_REGION is not set".to_string()))?;

            let store = S3BlobStore::new(
                bucket,
                region,
                config.s3_endpoint.as_deref(),
                config.s3_public_base_url.as_deref(),
            )?;
            tracing::info!(bucket = %bucket, region = %region, "Using S3 blob store");
            Ok(Arc::new(store))
        }
    }
}
