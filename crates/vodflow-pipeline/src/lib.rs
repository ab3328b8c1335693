//! Two-step upload pipeline.
//!
//! Step one ingests a raw video: stage to disk, encode to HLS, upload the
//! artifacts, register a temporary record. Step two attaches metadata: look up
//! the temporary record, upload the thumbnail, finalize the permanent catalog
//! entry, publish, retire the temporary record. Each step compensates its own
//! side effects on failure.

mod artifacts;
mod coordinator;
mod staging;
mod transcode;

pub use artifacts::{ArtifactUploader, EncodedArtifacts};
pub use coordinator::UploadPipeline;
pub use staging::StagingArea;
pub use transcode::TranscodeStage;
