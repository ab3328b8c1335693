//! Blob store adapter
//!
//! Durable object storage behind the [`BlobStore`] trait. Keys are namespaced
//! `{user_id}/{video_id}/...` so collisions across users are impossible.
//! Backends: S3-compatible stores via `object_store`, the local filesystem,
//! and an in-memory store used by tests.

mod factory;
mod local;
mod memory;
mod s3;
mod traits;

pub use factory::create_blob_store;
pub use local::LocalBlobStore;
pub use memory::MemoryBlobStore;
pub use s3::S3BlobStore;
pub use traits::{BlobStore, StorageError, StorageResult};
