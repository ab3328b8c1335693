//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`; every error
//! funnels through [`PipelineError`] so status codes and body shape stay
//! consistent across endpoints.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use vodflow_core::{ErrorMetadata, LogLevel, PipelineError};

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper type for PipelineError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for PipelineError (external type from vodflow-core)
#[derive(Debug)]
pub struct HttpAppError(pub PipelineError);

impl From<PipelineError> for HttpAppError {
    fn from(err: PipelineError) -> Self {
        HttpAppError(err)
    }
}

impl From<uuid::Error> for HttpAppError {
    fn from(err: uuid::Error) -> Self {
        HttpAppError(err.into())
    }
}

impl From<serde_json::Error> for HttpAppError {
    fn from(err: serde_json::Error) -> Self {
        HttpAppError(err.into())
    }
}

impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        HttpAppError(PipelineError::Validation(format!(
            "Invalid multipart request: {}",
            err
        )))
    }
}

fn log_error(error: &PipelineError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let error = &self.0;

        let status = StatusCode::from_u16(error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(error);

        // Hide details in production and for sensitive errors.
        let body = if is_production_env() || error.is_sensitive() {
            Json(ErrorResponse {
                error: error.client_message(),
                details: None,
                error_type: None,
                code: error.error_code().to_string(),
                recoverable: error.is_recoverable(),
                suggested_action: error.suggested_action().map(String::from),
            })
        } else {
            Json(ErrorResponse {
                error: error.client_message(),
                details: Some(error.detailed_message()),
                error_type: Some(error.error_type().to_string()),
                code: error.error_code().to_string(),
                recoverable: error.is_recoverable(),
                suggested_action: error.suggested_action().map(String::from),
            })
        };

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let response =
            HttpAppError(PipelineError::NotFound("no staged upload".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_tag_not_found_maps_to_400() {
        let response =
            HttpAppError(PipelineError::TagNotFound("t9".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_already_exists_maps_to_409() {
        let response =
            HttpAppError(PipelineError::AlreadyExists("u1/v1".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_transcode_failure_maps_to_500() {
        let response =
            HttpAppError(PipelineError::Transcode("ffmpeg exited 1".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_response_shape() {
        let response = ErrorResponse {
            error: "Not found".to_string(),
            details: None,
            error_type: None,
            code: "NOT_FOUND".to_string(),
            recoverable: false,
            suggested_action: None,
        };
        let json = serde_json::to_value(&response).expect("serialize");
        assert!(json.get("error").and_then(|v| v.as_str()).is_some());
        assert!(json.get("code").and_then(|v| v.as_str()).is_some());
        assert!(json.get("recoverable").and_then(|v| v.as_bool()).is_some());
        assert!(json.get("details").is_none());
    }
}
