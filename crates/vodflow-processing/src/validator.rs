use std::path::Path;
use thiserror::Error;
use vodflow_core::PipelineError;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Uploaded file is empty")]
    EmptyFile,

    #[error("Filename has no extension: {0}")]
    MissingExtension(String),

    #[error("Unsupported video extension: {0}")]
    InvalidExtension(String),

    #[error("File too large: {size} bytes (max {max})")]
    FileTooLarge { size: usize, max: usize },
}

impl From<ValidationError> for PipelineError {
    fn from(err: ValidationError) -> Self {
        PipelineError::Validation(err.to_string())
    }
}

/// Pre-ingestion checks on an uploaded file, before anything touches disk.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    max_bytes: usize,
    allowed_extensions: Vec<String>,
}

impl UploadValidator {
    pub fn new(max_bytes: usize, allowed_extensions: Vec<String>) -> Self {
        Self {
            max_bytes,
            allowed_extensions,
        }
    }

    /// Returns the normalized extension. Callers use it to derive the on-disk
    /// name; the client filename itself never becomes a path.
    pub fn validate(&self, filename: &str, size: usize) -> Result<String, ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }
        if size > self.max_bytes {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_bytes,
            });
        }

        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .ok_or_else(|| ValidationError::MissingExtension(filename.to_string()))?;

        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::InvalidExtension(extension));
        }

        Ok(extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> UploadValidator {
        UploadValidator::new(1024, vec!["mp4".to_string(), "mov".to_string()])
    }

    #[test]
    fn test_accepts_valid_upload_and_returns_extension() {
        assert_eq!(validator().validate("trip.mp4", 512).unwrap(), "mp4");
    }

    #[test]
    fn test_extension_check_is_case_insensitive() {
        assert_eq!(validator().validate("trip.MP4", 512).unwrap(), "mp4");
    }

    #[test]
    fn test_traversal_filename_only_yields_its_extension() {
        assert_eq!(
            validator().validate("../../../../tmp/x/evil.mp4", 512).unwrap(),
            "mp4"
        );
    }

    #[test]
    fn test_rejects_empty_file() {
        assert!(matches!(
            validator().validate("trip.mp4", 0),
            Err(ValidationError::EmptyFile)
        ));
    }

    #[test]
    fn test_rejects_oversized_file() {
        assert!(matches!(
            validator().validate("trip.mp4", 2048),
            Err(ValidationError::FileTooLarge { .. })
        ));
    }

    #[test]
    fn test_rejects_unknown_extension() {
        assert!(matches!(
            validator().validate("trip.wmv", 512),
            Err(ValidationError::InvalidExtension(_))
        ));
        assert!(matches!(
            validator().validate("trip", 512),
            Err(ValidationError::MissingExtension(_))
        ));
    }
}
