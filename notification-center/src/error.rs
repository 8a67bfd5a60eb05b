//! Error types.

use std::time::Duration;
use thiserror::Error;

/// The main error type for notification center operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network-related error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The notification service answered with a non-success status.
    #[error("API error [{status}] {error}: {message}")]
    Api {
        status: u16,
        error: String,
        message: String,
    },

    /// Invalid argument passed to an API method.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// A request did not settle in time.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The owning notification center has been disposed.
    #[error("Notification center disposed")]
    Disposed,

    /// Link points to another origin while external hrefs are disallowed.
    #[error("External href not allowed: {0}")]
    ExternalHref(String),

    /// Link uses a scheme that is never navigated to.
    #[error("Unsafe href rejected: {0}")]
    UnsafeHref(String),
}

impl Error {
    /// Create an API error.
    pub fn api(status: u16, error: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Api {
            status,
            error: error.into(),
            message: message.into(),
        }
    }

    /// Check if this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(_) | Error::Timeout(_) => true,
            Error::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Result type alias for notification center operations.
pub type Result<T> = std::result::Result<T, Error>;
