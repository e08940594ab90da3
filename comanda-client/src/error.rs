//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend rejected the request
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Sign-in or token refresh failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Operation requires a session
    #[error("Not signed in")]
    NotAuthenticated,

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Change feed transport error
    #[error("Feed error: {0}")]
    Feed(String),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
