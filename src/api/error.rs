//! Error types and the uniform `{ data, error }` result envelope.

use serde::Serialize;
use thiserror::Error;

/// Message used when a failure carries no usable text.
pub const GENERIC_ERROR: &str = "Something went wrong";

/// Failure of a single catalog API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network unreachable, timeout, or connection reset.
    #[error("{0}")]
    Transport(String),

    /// The service answered with a non-2xx status.
    #[error("{message}")]
    Service { status: u16, message: String },

    /// The service answered 2xx but the body was not what we expected.
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Returns the human-readable message, falling back to a generic one.
    pub fn message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_ERROR.to_string()
        } else {
            message
        }
    }

    /// Returns true for failures that a retry might fix.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Transport(_) => true,
            ApiError::Service { status, .. } => *status >= 500,
            ApiError::Decode(_) => false,
        }
    }
}

impl From<wreq::Error> for ApiError {
    fn from(err: wreq::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Result of a catalog API call.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Uniform result shape: exactly one of `data` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    /// Returns true if the call failed.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl<T> From<ApiResult<T>> for Envelope<T> {
    fn from(result: ApiResult<T>) -> Self {
        match result {
            Ok(data) => Self { data: Some(data), error: None },
            Err(err) => Self { data: None, error: Some(err.message()) },
        }
    }
}
