//! API Error Types
//!
//! Faults raised while serving a request, mapped to HTTP responses. Missing
//! records are not faults: handlers answer them with a `{ "result": null }`
//! 404 directly.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::api::dto::json_response;
use crate::store::StoreError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Record store failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A lookup did not finish within the configured timeout
    #[error("Search timed out after {0} ms")]
    Timeout(u64),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub result: Option<()>,
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Store(StoreError::NotInitialized) => {
                (StatusCode::NOT_FOUND, "STORE_NOT_INITIALIZED")
            }
            ApiError::Store(StoreError::Unavailable(_)) => {
                (StatusCode::BAD_GATEWAY, "UPSTREAM_UNAVAILABLE")
            }
            ApiError::Store(StoreError::Malformed(_)) => {
                (StatusCode::BAD_GATEWAY, "UPSTREAM_MALFORMED")
            }
            ApiError::Store(StoreError::Config(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORE_CONFIG_ERROR")
            }
            ApiError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "SEARCH_TIMEOUT"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::error!(
            request_id = %request_id,
            error_code = %code,
            error_message = %self,
            "API error occurred"
        );

        let body = ErrorResponse {
            result: None,
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        json_response(status, &body)
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
