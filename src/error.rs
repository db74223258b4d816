//! Error types for the LED toggle client

use thiserror::Error;

/// Result type for client operations
pub type LedResult<T> = Result<T, LedClientError>;

/// Errors that can occur while driving the LED client.
///
/// None of these are fatal: event handlers log them and the panel stays interactive.
#[derive(Error, Debug)]
pub enum LedClientError {
    /// The last known status is neither "on" nor "off", so there is nothing to toggle
    #[error("Invalid current led status {0:?}")]
    InvalidStatus(String),

    /// The socket is not in the open state
    #[error("Connection is not open")]
    NotOpen,

    /// Strict status policy refused a device-reported value
    #[error("Rejected device status {0:?}")]
    RejectedStatus(String),

    /// The configured endpoint cannot be used
    #[error("Invalid endpoint {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    /// The connection worker has gone away
    #[error("Socket channel closed")]
    ChannelClosed,

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LedClientError {
    /// Create an invalid endpoint error
    pub fn invalid_endpoint(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
