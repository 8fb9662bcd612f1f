//! Server-specific error types
//!
//! The taxonomy distinguishes user input problems (validation), capability
//! gaps (a view/format the response shape does not support), and collaborator
//! failures (database, cache store, FILER API). Validation and capability
//! errors are surfaced verbatim to the caller; collaborator failures are
//! logged with context and masked behind a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Result type alias for request-handling operations
pub type ApiResult<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid user input: bad enum value, incompatible configuration,
    /// out-of-range page, over-broad result set.
    #[error("{0}")]
    Validation(String),

    /// The requested output shape exists in the API surface but is not
    /// supported for this response type.
    #[error("{0}")]
    NotImplemented(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Cache error: {0}")]
    Cache(String),

    /// Failure talking to the external FILER API
    #[error("FILER lookup failed: {0}")]
    Lookup(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Standard error envelope returned to API consumers
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            AppError::NotImplemented(msg) => {
                (StatusCode::NOT_IMPLEMENTED, "NOT_IMPLEMENTED", msg)
            },
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "A database error occurred".to_string(),
                )
            },
            AppError::Cache(ref msg) => {
                tracing::error!("Cache error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "A cache error occurred".to_string(),
                )
            },
            AppError::Lookup(ref msg) => {
                tracing::error!("FILER lookup error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "LOOKUP_ERROR",
                    "An upstream data service is unavailable".to_string(),
                )
            },
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            },
        };

        let body = ErrorResponse::new(code, message);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_message_passthrough() {
        let err = AppError::Validation("page 2 does not exist".to_string());
        assert_eq!(err.to_string(), "page 2 does not exist");
    }

    #[test]
    fn test_validation_maps_to_400() {
        let response = AppError::Validation("bad input".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_implemented_maps_to_501() {
        let response =
            AppError::NotImplemented("IGV browser view is coming soon".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[test]
    fn test_lookup_maps_to_502() {
        let response = AppError::Lookup("connection refused".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
