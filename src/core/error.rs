//! Error types shared across the client
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to the debate backend
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused, timeout, TLS failure and friends
    #[error("request failed: {0}")]
    Transport(String),

    /// Backend answered with a non-2xx status
    #[error("server returned HTTP {status}")]
    Status { status: StatusCode, body: String },

    /// Body was not the JSON we expected
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Pull the backend's `error` field out of a JSON error body, if any
    pub fn server_message(&self) -> Option<String> {
        match self {
            ApiError::Status { body, .. } => serde_json::from_str::<serde_json::Value>(body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string)),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if e.is_timeout() {
            ApiError::Transport("request timed out".to_string())
        } else if e.is_connect() {
            ApiError::Transport("could not connect to the server".to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

/// The three ways a debate session operation can fail.
///
/// Each one is terminal to the operation that triggered it, never to the
/// session.
#[derive(Debug, Error)]
pub enum SessionFailure {
    #[error("could not start the debate: {0}")]
    Start(#[source] ApiError),

    #[error("message exchange failed: {0}")]
    Exchange(#[source] ApiError),

    #[error("could not record the end of the debate: {0}")]
    Termination(#[source] ApiError),
}
