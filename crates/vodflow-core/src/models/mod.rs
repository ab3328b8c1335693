pub mod temporary;
pub mod video;

pub use temporary::TemporaryVideo;
pub use video::{Ad, AdDescriptor, Tag, Video, VideoSnapshot, VideoUploadMetadata};
