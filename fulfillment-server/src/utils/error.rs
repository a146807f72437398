//! Unified error handling
//!
//! Application-level error type and response envelope:
//! - [`AppError`] - application error enum
//! - [`AppResponse`] - API response structure
//!
//! # Error code ranges
//!
//! | Prefix | Category | Example |
//! |--------|----------|---------|
//! | E0xxx | General | E0003 not found |
//! | E2xxx | Permission | E2001 forbidden |
//! | E3xxx | Authentication | E3002 invalid token |
//! | E41xx | Order workflow | E4102 invalid transition |
//! | E9xxx | System | E9002 storage error |
//!
//! Terminals treat 409 responses (invalid transition / invalid state) as
//! benign races: the losing poller refreshes its view instead of surfacing
//! an error to staff. 403 and 404 indicate genuine misuse and are surfaced.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// Unified API response structure
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
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Authentication errors (401) ==========
    #[error("Authentication required")]
    Unauthorized,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    // ========== Authorization errors (403) ==========
    #[error("Permission denied: {0}")]
    Forbidden(String),

    // ========== Workflow errors (4xx) ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    // ========== System errors (5xx) ==========
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "E3001", self.to_string()),
            AppError::TokenExpired => (StatusCode::UNAUTHORIZED, "E3003", self.to_string()),
            AppError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, "E3002", msg.clone()),

            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "E2001", msg.clone()),

            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.clone()),
            AppError::InvalidTransition(msg) => (StatusCode::CONFLICT, "E4102", msg.clone()),
            AppError::InvalidState(msg) => (StatusCode::CONFLICT, "E4103", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.clone()),

            AppError::Storage(msg) => {
                error!(target: "storage", error = %msg, "Storage error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9002",
                    "Storage error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message,
            data: None,
        });

        (status, body).into_response()
    }
}

// ========== Helper constructors ==========

impl AppError {
    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }

    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken(message.into())
    }

    pub fn token_expired() -> Self {
        Self::TokenExpired
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

/// Result type for API handlers
pub type AppResult<T> = Result<T, AppError>;
