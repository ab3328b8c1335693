//! Video validation and HLS transcoding.

mod engine;
mod ffmpeg;
pub mod test_helpers;
mod validator;

pub use engine::{TranscodeError, TranscodingEngine};
pub use ffmpeg::{FfmpegEngine, HlsVariant};
pub use validator::{UploadValidator, ValidationError};
