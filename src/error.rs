//! Error types for the cache
//!
//! Provides unified error handling using thiserror. Every variant is soft:
//! the library logs or absorbs them, and only the HTTP layer surfaces them.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found in cache, or expired
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Pattern source failed to compile
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// Inbound invalidation message could not be decoded
    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    /// Remote channel could not be opened
    #[error("Transport unavailable: {0}")]
    TransportUnavailable(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidPattern(_)
            | CacheError::MalformedMessage(_)
            | CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::TransportUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
