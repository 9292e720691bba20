//! Error types for the account server client.

use thiserror::Error;
use vibe_core::VibeError;

/// Errors that can occur when talking to the account server.
#[derive(Error, Debug)]
pub enum AccountClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Authentication required but no token available
    #[error("Authentication required")]
    AuthRequired,

    /// Authentication failed (invalid credentials or expired token)
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),

    /// Rate limited by server
    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },
}

impl From<AccountClientError> for VibeError {
    fn from(err: AccountClientError) -> Self {
        match err {
            AccountClientError::RateLimited { retry_after_secs } => VibeError::RateLimited {
                retry_after_ms: retry_after_secs.saturating_mul(1000),
            },
            AccountClientError::AuthRequired => VibeError::NotAuthenticated,
            other => VibeError::gateway(other.to_string()),
        }
    }
}

/// Result type for server client operations.
pub type Result<T> = std::result::Result<T, AccountClientError>;
