use async_trait::async_trait;
use thiserror::Error;
use vodflow_core::models::TemporaryVideo;

/// Registry operation errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("A staged upload already exists for {user_id}/{video_id}")]
    AlreadyExists { user_id: String, video_id: String },

    #[error("No staged upload for {user_id}/{video_id}")]
    NotFound { user_id: String, video_id: String },

    #[error("Registry database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Time-bounded registry of staged uploads.
///
/// Implementations must make `create` exclusive per key: two concurrent
/// creates for the same `(user_id, video_id)` yield exactly one success and
/// one `AlreadyExists`. An expired row never blocks creation.
#[async_trait]
pub trait TemporaryVideoRegistry: Send + Sync {
    /// Insert a record with `expires_at = now + TTL`. Fails with
    /// `AlreadyExists` if a live record holds the key.
    async fn create(
        &self,
        user_id: &str,
        video_id: &str,
        video_url: &str,
    ) -> RegistryResult<TemporaryVideo>;

    /// Look up a live record. Absent and expired are both `NotFound`.
    async fn find(&self, user_id: &str, video_id: &str) -> RegistryResult<TemporaryVideo>;

    /// Idempotent delete; absent keys are not an error.
    async fn delete(&self, user_id: &str, video_id: &str) -> RegistryResult<()>;

    /// Delete the record only if it has expired. Returns whether a row was
    /// reclaimed. Invoked opportunistically after each upload step; best
    /// effort, not a promptness guarantee.
    async fn sweep_if_expired(&self, user_id: &str, video_id: &str) -> RegistryResult<bool>;

    /// Bulk variant used by the periodic sweeper. Returns the reclaimed count.
    async fn sweep_expired(&self) -> RegistryResult<u64>;
}

impl From<RegistryError> for vodflow_core::PipelineError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::AlreadyExists { .. } => {
                vodflow_core::PipelineError::AlreadyExists(err.to_string())
            }
            RegistryError::NotFound { .. } => {
                vodflow_core::PipelineError::NotFound(err.to_string())
            }
            RegistryError::Database(e) => vodflow_core::PipelineError::Database(e),
        }
    }
}
