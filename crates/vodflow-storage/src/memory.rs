use crate::traits::{validate_key, BlobStore, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// In-memory blob store for tests and single-process development.
///
/// Supports injected put failures so callers can exercise upload-stage error
/// handling without a real backend.
#[derive(Default)]
pub struct MemoryBlobStore {
    objects: Mutex<HashMap<String, (Bytes, String)>>,
    fail_puts: AtomicBool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, every `put_object` fails with `UploadFailed`.
    pub fn set_fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn get(&self, key: &str) -> Option<(Bytes, String)> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put_object(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<String> {
        validate_key(key)?;

        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed(format!(
                "injected put failure for {}",
                key
            )));
        }

        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (data, content_type.to_string()));

        Ok(self.object_url(key))
    }

    async fn delete_object(&self, key: &str) -> StorageResult<()> {
        validate_key(key)?;
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    fn object_url(&self, key: &str) -> String {
        format!("memory://{}", key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete_roundtrip() {
        let store = MemoryBlobStore::new();

        let url = store
            .put_object("u1/v1/seg.ts", Bytes::from_static(b"data"), "video/mp2t")
            .await
            .unwrap();
        assert_eq!(url, "memory://u1/v1/seg.ts");

        let (data, content_type) = store.get("u1/v1/seg.ts").unwrap();
        assert_eq!(data, Bytes::from_static(b"data"));
        assert_eq!(content_type, "video/mp2t");

        store.delete_object("u1/v1/seg.ts").await.unwrap();
        assert_eq!(store.object_count(), 0);
    }

    #[tokio::test]
    async fn test_injected_put_failure() {
        let store = MemoryBlobStore::new();
        store.set_fail_puts(true);

        let result = store
            .put_object("u1/v1/seg.ts", Bytes::from_static(b"data"), "video/mp2t")
            .await;
        assert!(matches!(result, Err(StorageError::UploadFailed(_))));
        assert_eq!(store.object_count(), 0);
    }
}
