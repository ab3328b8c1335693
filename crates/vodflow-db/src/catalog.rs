use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;
use vodflow_core::models::{AdDescriptor, Tag, VideoSnapshot, VideoUploadMetadata};

/// Catalog operation errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Tag not found: {0}")]
    TagNotFound(String),

    #[error("Video not found: {0}")]
    NotFound(String),

    #[error("Finalization failed: {0}")]
    Finalization(String),

    #[error("Catalog database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Transactional write unit over the permanent Video/Ad/Tag/VideoTag graph.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Create the full Video/Ad/VideoTag graph as one atomic unit: mint the
    /// permanent video id, insert the video row, one Ad row per descriptor,
    /// and one VideoTag join per tag id. A missing tag fails the whole unit
    /// with `TagNotFound`; nothing is visible on any failure.
    async fn finalize(
        &self,
        seller_id: &str,
        metadata: &VideoUploadMetadata,
        video_url: &str,
        thumbnail_url: &str,
    ) -> CatalogResult<VideoSnapshot>;

    /// Atomically replace the tag set of an existing video owned by
    /// `seller_id`. Every tag must pre-exist.
    async fn update_tags(
        &self,
        seller_id: &str,
        video_id: Uuid,
        tag_ids: &[String],
    ) -> CatalogResult<VideoSnapshot>;

    /// Atomically replace the ad set of an existing video owned by `seller_id`.
    async fn update_ads(
        &self,
        seller_id: &str,
        video_id: Uuid,
        ads: &[AdDescriptor],
    ) -> CatalogResult<VideoSnapshot>;

    /// Seed a catalog tag. Tags are never created by the upload pipeline.
    async fn insert_tag(&self, tag: &Tag) -> CatalogResult<()>;
}

impl From<CatalogError> for vodflow_core::PipelineError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::TagNotFound(msg) => {
                vodflow_core::PipelineError::TagNotFound(format!("Tag not found: {}", msg))
            }
            CatalogError::NotFound(msg) => {
                vodflow_core::PipelineError::NotFound(format!("Video not found: {}", msg))
            }
            CatalogError::Finalization(msg) => vodflow_core::PipelineError::Finalization(msg),
            CatalogError::Database(e) => {
                vodflow_core::PipelineError::Finalization(format!("database error: {}", e))
            }
        }
    }
}
