/*
[INPUT]:  Error sources (HTTP, API, serialization, URL, WebSocket)
[OUTPUT]: Structured error types with context and retry hints
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the fetch service adapter
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response; `message` is the server's detail text
    #[error("{message}")]
    Api { code: u16, message: String },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// WebSocket error
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FetchError {
    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Http(err) => err.is_timeout() || err.is_connect(),
            FetchError::Api { code, .. } => *code >= 500,
            FetchError::WebSocket(_) => true,
            _ => false,
        }
    }

    /// Whether the server refused the task because another one is running
    pub fn is_conflict(&self) -> bool {
        matches!(self, FetchError::Api { code, .. } if *code == StatusCode::CONFLICT.as_u16())
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        FetchError::Api {
            code: status.as_u16(),
            message: message.into(),
        }
    }
}

/// Result type alias for fetch service operations
pub type Result<T> = std::result::Result<T, FetchError>;
