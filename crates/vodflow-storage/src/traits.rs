//! Storage abstraction trait
//!
//! All blob store backends implement [`BlobStore`], so the artifact upload
//! stage works against any backend without coupling to implementation details.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable object storage with a namespaced key scheme.
///
/// **Key format:** `{user_id}/{video_id}/...`, built by the caller. Keys must
/// be relative and free of traversal sequences.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload an object and return its publicly accessible URL.
    async fn put_object(&self, key: &str, data: Bytes, content_type: &str)
        -> StorageResult<String>;

    /// Delete an object. Idempotent: deleting an absent key is not an error.
    async fn delete_object(&self, key: &str) -> StorageResult<()>;

    /// Public URL for a key, without touching the backend.
    fn object_url(&self, key: &str) -> String;
}

/// Reject keys that could escape the storage namespace.
pub(crate) fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key.contains("..") || key.starts_with('/') {
        return Err(StorageError::InvalidKey(format!(
            "storage key '{}' is not a clean relative path",
            key
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key_rejects_traversal() {
        assert!(validate_key("u1/v1/master.m3u8").is_ok());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("/absolute").is_err());
        assert!(validate_key("").is_err());
    }
}
