//! Backend error types for tutorgate-llm.
//!
//! All backend operations return [`Result<T>`] which uses [`BackendError`]
//! as the error type.

use thiserror::Error;

/// Errors that can occur when calling the generation backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The HTTP request to the backend failed.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The requested model does not exist on the backend.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The backend returned a response that could not be parsed.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The backend reported an error in-band on a streaming response.
    #[error("stream error: {0}")]
    Stream(String),

    /// The request timed out.
    #[error("timeout")]
    Timeout,

    /// An HTTP-level error from reqwest.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenience type alias for backend operations.
pub type Result<T> = std::result::Result<T, BackendError>;
