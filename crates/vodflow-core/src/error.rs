//! Error types module
//!
//! All failures in the upload pipeline are unified under [`PipelineError`].
//! Each stage crate has its own error enum at the seam; conversions into
//! `PipelineError` live here so the coordinator and the HTTP layer deal with
//! one taxonomy.

use std::io;

use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable or degraded-success conditions
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
/// This trait allows errors to self-describe their HTTP response characteristics
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "TAG_NOT_FOUND")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Storage write error: {0}")]
    StorageWrite(String),

    #[error("Transcode error: {0}")]
    Transcode(String),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Tag not found: {0}")]
    TagNotFound(String),

    #[error("Finalization error: {0}")]
    Finalization(String),

    #[error("Publish error: {0}")]
    Publish(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<SqlxError> for PipelineError {
    fn from(err: SqlxError) -> Self {
        PipelineError::Database(err)
    }
}

impl From<anyhow::Error> for PipelineError {
    fn from(err: anyhow::Error) -> Self {
        PipelineError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for PipelineError {
    fn from(err: io::Error) -> Self {
        PipelineError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::Validation(format!("JSON parsing error: {}", err))
    }
}

impl From<uuid::Error> for PipelineError {
    fn from(err: uuid::Error) -> Self {
        PipelineError::Validation(format!("UUID parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for PipelineError {
    fn from(err: validator::ValidationErrors) -> Self {
        PipelineError::Validation(format!("Validation error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
/// Reduces duplication in the ErrorMetadata impl; client_message stays per-variant for dynamic content.
fn static_metadata(
    err: &PipelineError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        PipelineError::StorageWrite(_) => (
            500,
            "STORAGE_WRITE_ERROR",
            true,
            Some("Retry the upload after a short delay"),
            true,
            LogLevel::Error,
        ),
        PipelineError::Transcode(_) => (
            500,
            "TRANSCODE_ERROR",
            false,
            Some("Check the video file is a valid media file and retry"),
            true,
            LogLevel::Error,
        ),
        PipelineError::Upload(_) => (
            500,
            "UPLOAD_ERROR",
            true,
            Some("Retry the upload after a short delay"),
            true,
            LogLevel::Error,
        ),
        PipelineError::AlreadyExists(_) => (
            409,
            "ALREADY_EXISTS",
            false,
            Some("An upload for this video is already staged"),
            false,
            LogLevel::Debug,
        ),
        PipelineError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the id exists and the staged upload has not expired"),
            false,
            LogLevel::Debug,
        ),
        PipelineError::TagNotFound(_) => (
            400,
            "TAG_NOT_FOUND",
            false,
            Some("Verify every tag id exists before finalizing"),
            false,
            LogLevel::Debug,
        ),
        PipelineError::Finalization(_) => (
            500,
            "FINALIZATION_ERROR",
            true,
            Some("Retry the metadata submission; the staged upload is still valid"),
            true,
            LogLevel::Error,
        ),
        PipelineError::Publish(_) => (
            500,
            "PUBLISH_ERROR",
            true,
            None,
            true,
            LogLevel::Warn,
        ),
        PipelineError::Validation(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        PipelineError::Config(_) => (
            500,
            "CONFIG_ERROR",
            false,
            Some("Contact the operator"),
            true,
            LogLevel::Error,
        ),
        PipelineError::Database(_) => (
            500,
            "DATABASE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        PipelineError::Internal(_) => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        PipelineError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl PipelineError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &'static str {
        match self {
            PipelineError::StorageWrite(_) => "StorageWrite",
            PipelineError::Transcode(_) => "Transcode",
            PipelineError::Upload(_) => "Upload",
            PipelineError::AlreadyExists(_) => "AlreadyExists",
            PipelineError::NotFound(_) => "NotFound",
            PipelineError::TagNotFound(_) => "TagNotFound",
            PipelineError::Finalization(_) => "Finalization",
            PipelineError::Publish(_) => "Publish",
            PipelineError::Validation(_) => "Validation",
            PipelineError::Config(_) => "Config",
            PipelineError::Database(_) => "Database",
            PipelineError::Internal(_) => "Internal",
            PipelineError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including the source chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for PipelineError {
    fn http_status_code(&self) -> u16 {
        static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            PipelineError::StorageWrite(_) => "Failed to stage the uploaded file".to_string(),
            PipelineError::Transcode(_) => "Failed to transcode the uploaded video".to_string(),
            PipelineError::Upload(_) => "Failed to upload the encoded video".to_string(),
            PipelineError::AlreadyExists(ref msg) => msg.clone(),
            PipelineError::NotFound(ref msg) => msg.clone(),
            PipelineError::TagNotFound(ref msg) => msg.clone(),
            PipelineError::Finalization(_) => "Failed to finalize the video record".to_string(),
            PipelineError::Publish(_) => "Failed to publish the video event".to_string(),
            PipelineError::Validation(ref msg) => msg.clone(),
            PipelineError::Config(_) => "Service configuration error".to_string(),
            PipelineError::Database(_) => "Failed to access database".to_string(),
            PipelineError::Internal(_) => "Internal server error".to_string(),
            PipelineError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}
