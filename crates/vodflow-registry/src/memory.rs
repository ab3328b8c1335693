use crate::registry::{RegistryError, RegistryResult, TemporaryVideoRegistry};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use vodflow_core::models::TemporaryVideo;

/// Mutex-guarded in-memory registry for tests and single-process development.
/// Same semantics as the Postgres implementation: an expired row never blocks
/// creation, and expired rows are invisible to `find`.
pub struct InMemoryRegistry {
    ttl_secs: i64,
    records: Mutex<HashMap<(String, String), TemporaryVideo>>,
}

impl InMemoryRegistry {
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            ttl_secs,
            records: Mutex::new(HashMap::new()),
        }
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl TemporaryVideoRegistry for InMemoryRegistry {
    async fn create(
        &self,
        user_id: &str,
        video_id: &str,
        video_url: &str,
    ) -> RegistryResult<TemporaryVideo> {
        let key = (user_id.to_string(), video_id.to_string());
        let mut records = self.records.lock().unwrap();

        if let Some(existing) = records.get(&key) {
            if !existing.is_expired() {
                return Err(RegistryError::AlreadyExists {
                    user_id: user_id.to_string(),
                    video_id: video_id.to_string(),
                });
            }
        }

        let record = TemporaryVideo::new(user_id, video_id, video_url, self.ttl_secs);
        records.insert(key, record.clone());
        Ok(record)
    }

    async fn find(&self, user_id: &str, video_id: &str) -> RegistryResult<TemporaryVideo> {
        let key = (user_id.to_string(), video_id.to_string());
        let records = self.records.lock().unwrap();

        match records.get(&key) {
            Some(record) if !record.is_expired() => Ok(record.clone()),
            _ => Err(RegistryError::NotFound {
                user_id: user_id.to_string(),
                video_id: video_id.to_string(),
            }),
        }
    }

    async fn delete(&self, user_id: &str, video_id: &str) -> RegistryResult<()> {
        let key = (user_id.to_string(), video_id.to_string());
        self.records.lock().unwrap().remove(&key);
        Ok(())
    }

    async fn sweep_if_expired(&self, user_id: &str, video_id: &str) -> RegistryResult<bool> {
        let key = (user_id.to_string(), video_id.to_string());
        let mut records = self.records.lock().unwrap();

        let expired = records
            .get(&key)
            .map(|record| record.is_expired())
            .unwrap_or(false);
        if expired {
            records.remove(&key);
        }
        Ok(expired)
    }

    async fn sweep_expired(&self) -> RegistryResult<u64> {
        let now = Utc::now();
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|_, record| !record.is_expired_at(now));
        Ok((before - records.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_create_then_find() {
        let registry = InMemoryRegistry::new(600);
        let created = registry
            .create("u1", "v1", "http://cdn/u1/v1/master.m3u8")
            .await
            .unwrap();

        let found = registry.find("u1", "v1").await.unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_create_on_live_key_fails() {
        let registry = InMemoryRegistry::new(600);
        registry.create("u1", "v1", "url-a").await.unwrap();

        let result = registry.create("u1", "v1", "url-b").await;
        assert!(matches!(result, Err(RegistryError::AlreadyExists { .. })));

        // The original record is untouched.
        assert_eq!(registry.find("u1", "v1").await.unwrap().video_url, "url-a");
    }

    #[tokio::test]
    async fn test_expired_record_does_not_block_creation() {
        let registry = InMemoryRegistry::new(0);
        registry.create("u1", "v1", "url-a").await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        let record = registry.create("u1", "v1", "url-b").await.unwrap();
        assert_eq!(record.video_url, "url-b");
    }

    #[tokio::test]
    async fn test_find_treats_expired_as_absent() {
        let registry = InMemoryRegistry::new(0);
        registry.create("u1", "v1", "url").await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        let result = registry.find("u1", "v1").await;
        assert!(matches!(result, Err(RegistryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_find_is_scoped_to_owner() {
        let registry = InMemoryRegistry::new(600);
        registry.create("u1", "v1", "url").await.unwrap();

        let result = registry.find("u2", "v1").await;
        assert!(matches!(result, Err(RegistryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let registry = InMemoryRegistry::new(600);
        assert!(registry.delete("u1", "missing").await.is_ok());

        registry.create("u1", "v1", "url").await.unwrap();
        registry.delete("u1", "v1").await.unwrap();
        assert!(registry.delete("u1", "v1").await.is_ok());
        assert_eq!(registry.record_count(), 0);
    }

    #[tokio::test]
    async fn test_sweep_if_expired_leaves_live_records() {
        let registry = InMemoryRegistry::new(600);
        registry.create("u1", "v1", "url").await.unwrap();

        assert!(!registry.sweep_if_expired("u1", "v1").await.unwrap());
        assert!(registry.find("u1", "v1").await.is_ok());
    }

    #[tokio::test]
    async fn test_sweep_expired_reclaims_only_expired_rows() {
        let registry = InMemoryRegistry::new(600);
        registry.create("u1", "live", "url").await.unwrap();

        let expired = InMemoryRegistry::new(0);
        expired.create("u1", "stale-1", "url").await.unwrap();
        expired.create("u1", "stale-2", "url").await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        assert_eq!(registry.sweep_expired().await.unwrap(), 0);
        assert_eq!(expired.sweep_expired().await.unwrap(), 2);
        assert_eq!(expired.record_count(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_create_one_wins() {
        let registry = Arc::new(InMemoryRegistry::new(600));

        let a = {
            let registry = registry.clone();
            tokio::spawn(async move { registry.create("u1", "v1", "url-a").await })
        };
        let b = {
            let registry = registry.clone();
            tokio::spawn(async move { registry.create("u1", "v1", "url-b").await })
        };

        let results = [a.await.unwrap(), b.await.unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(RegistryError::AlreadyExists { .. })))
            .count();

        assert_eq!(successes, 1);
        assert_eq!(conflicts, 1);
    }
}
