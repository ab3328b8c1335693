use crate::traits::{validate_key, BlobStore, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path as ObjectPath;
use object_store::{
    Attribute, AttributeValue, Attributes, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
};
use std::sync::Arc;

/// S3-compatible blob store backed by `object_store`.
///
/// Credentials come from the standard AWS environment. `public_base_url`
/// controls the URLs handed back to clients; when unset, the virtual-hosted
/// S3 URL for the bucket is used.
pub struct S3BlobStore {
    store: Arc<AmazonS3>,
    public_base_url: String,
}

impl S3BlobStore {
    pub fn new(
        bucket: &str,
        region: &str,
        endpoint: Option<&str>,
        public_base_url: Option<&str>,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .with_region(region);

        if let Some(endpoint) = endpoint {
            builder = builder.with_endpoint(endpoint);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(format!("Failed to build S3 client: {}", e)))?;

        let public_base_url = public_base_url
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("https://{}.s3.{}.amazonaws.com", bucket, region));

        Ok(Self {
            store: Arc::new(store),
            public_base_url,
        })
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put_object(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<String> {
        validate_key(key)?;

        let size = data.len();
        let start = std::time::Instant::now();

        let mut attributes = Attributes::new();
        attributes.insert(
            Attribute::ContentType,
            AttributeValue::from(content_type.to_string()),
        );

        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        self.store
            .put_opts(&ObjectPath::from(key), PutPayload::from(data), options)
            .await
            .map_err(|e| StorageError::UploadFailed(format!("S3 put failed for {}: {}", key, e)))?;

        tracing::debug!(
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(self.object_url(key))
    }

    async fn delete_object(&self, key: &str) -> StorageResult<()> {
        validate_key(key)?;

        match self.store.delete(&ObjectPath::from(key)).await {
            Ok(()) => Ok(()),
            // Deleting an absent key is idempotent, matching the local backend.
            Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "S3 delete failed for {}: {}",
                key, e
            ))),
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}
