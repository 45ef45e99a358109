//! Error types for the cache facade
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache facade.
///
/// A missing key is never an error here: reads return `Option` and callers
/// check for absence themselves.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The backing store cannot be reached
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// The store rejected a command (wrong value type, non-integer counter, ...)
    #[error("Store error: {0}")]
    Store(String),

    /// Stored bytes could not be converted to the requested type
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// The underlying fetch function failed
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Key not found (HTTP surface only)
    #[error("Key not found: {0}")]
    NotFound(String),
}

// == Store Client Errors ==
impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_io_error() || err.is_connection_refusal() || err.is_timeout() {
            CacheError::StoreUnavailable(err.to_string())
        } else {
            CacheError::Store(err.to_string())
        }
    }
}

impl From<reqwest::Error> for CacheError {
    fn from(err: reqwest::Error) -> Self {
        CacheError::Fetch(err.to_string())
    }
}

impl From<std::num::ParseIntError> for CacheError {
    fn from(err: std::num::ParseIntError) -> Self {
        CacheError::Conversion(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for CacheError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        CacheError::Conversion(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::Conversion(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CacheError::Fetch(_) => StatusCode::BAD_GATEWAY,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache facade.
pub type Result<T> = std::result::Result<T, CacheError>;
