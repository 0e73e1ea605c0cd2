//! Unified error handling
//!
//! Application-level error type and response envelope:
//! - [`AppError`] - error enum mapped to HTTP status + stable code
//! - [`AppResponse`] - API response structure
//!
//! # Error codes
//!
//! | Prefix | Category | Example |
//! |--------|----------|---------|
//! | E0xxx | Caller errors | E0002 validation failed |
//! | E8xxx | Upstream platform errors | E8001 platform call failed |
//! | E9xxx | System errors | E9001 internal error |
//!
//! # Usage
//!
//! ```ignore
//! // Return an error
//! Err(AppError::Validation("items must not be empty".into()))
//!
//! // Return a successful response
//! Ok(ok(data))
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// Unified API response envelope
///
/// ```json
/// {
///   "code": "E0000",
///   "message": "Success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// Error code (E0000 means success)
    pub code: String,
    /// Message
    pub message: String,
    /// Response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Caller errors (4xx) ==========
    #[error("Resource not found: {0}")]
    /// Resource does not exist (404)
    NotFound(String),

    #[error("Validation failed: {0}")]
    /// Malformed or incomplete payload (400)
    Validation(String),

    // ========== Upstream errors (5xx) ==========
    #[error("Platform call failed: {0}")]
    /// The hosted commerce platform rejected or failed a call (502)
    Upstream(String),

    // ========== System errors (5xx) ==========
    #[error("Internal server error: {0}")]
    /// Internal error (500)
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.as_str()),

            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.as_str()),

            AppError::Upstream(msg) => {
                error!(target: "platform", error = %msg, "Upstream platform error");
                (StatusCode::BAD_GATEWAY, "E8001", "Platform call failed")
            }

            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error",
                )
            }
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message: message.to_string(),
            data: None,
        });

        (status, body).into_response()
    }
}

impl From<crate::pricing::PricingError> for AppError {
    fn from(e: crate::pricing::PricingError) -> Self {
        AppError::Upstream(e.to_string())
    }
}

impl From<crate::services::PlatformError> for AppError {
    fn from(e: crate::services::PlatformError) -> Self {
        AppError::Upstream(e.to_string())
    }
}

// ========== Helper functions ==========

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: "Success".to_string(),
        data: Some(data),
    })
}
