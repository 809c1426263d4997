//! Application error types and their HTTP status mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Convenience result alias used throughout the crate
pub type Result<T> = std::result::Result<T, AppError>;

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading or validation failed
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The backend answered the call with a non-2xx status
    #[error("Backend rejected request with status {status}: {body}")]
    BackendRejected { status: u16, body: String },

    /// The backend could not be reached (connect failure or timeout)
    #[error("Backend unreachable: {0}")]
    BackendUnreachable(String),

    /// The backend answered 2xx but the payload did not match the
    /// requested outputs
    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),

    /// The backend never became ready during the startup poll
    #[error("Backend did not become ready after {attempts} attempts")]
    StartupFailed { attempts: u32 },

    /// A language code with no entry in the tag table
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Malformed or empty request content
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status the error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BackendRejected { .. }
            | AppError::BackendUnreachable(_)
            | AppError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
            AppError::UnsupportedLanguage(_) | AppError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Config(_) | AppError::StartupFailed { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_errors_map_to_502() {
        let rejected = AppError::BackendRejected {
            status: 500,
            body: "oom".to_string(),
        };
        assert_eq!(rejected.status_code(), StatusCode::BAD_GATEWAY);

        let unreachable = AppError::BackendUnreachable("connect refused".to_string());
        assert_eq!(unreachable.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn client_errors_map_to_400() {
        let lang = AppError::UnsupportedLanguage("tlh".to_string());
        assert_eq!(lang.status_code(), StatusCode::BAD_REQUEST);

        let validation = AppError::Validation("text must not be empty".to_string());
        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);
    }
}
