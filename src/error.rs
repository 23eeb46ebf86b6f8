//! Error types for the recorder
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Recorder Error Enum ==
/// Unified error type for store, recorder, and page cache operations.
#[derive(Error, Debug)]
pub enum RecorderError {
    /// Key not found in the store
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Stored value could not be decoded into the requested type
    #[error("Parse failed: {0}")]
    Parse(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Command issued against a key holding the wrong kind of value
    #[error("Wrong type for key: {0}")]
    WrongType(String),

    /// Key-value store unreachable or rejected the command
    #[error("Store error: {0}")]
    Store(String),

    /// Upstream page fetch failed
    #[error("Fetch failed: {0}")]
    Fetch(String),
}

impl From<redis::RedisError> for RecorderError {
    fn from(err: redis::RedisError) -> Self {
        RecorderError::Store(err.to_string())
    }
}

impl From<reqwest::Error> for RecorderError {
    fn from(err: reqwest::Error) -> Self {
        RecorderError::Fetch(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for RecorderError {
    fn into_response(self) -> Response {
        let status = match &self {
            RecorderError::NotFound(_) => StatusCode::NOT_FOUND,
            RecorderError::Parse(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RecorderError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RecorderError::WrongType(_) => StatusCode::CONFLICT,
            RecorderError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            RecorderError::Fetch(_) => StatusCode::BAD_GATEWAY,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the recorder.
pub type Result<T> = std::result::Result<T, RecorderError>;
