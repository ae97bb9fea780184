//! Error types for the winamax-feed crate.
//!
//! Only transport-level failures are fatal. Malformed frames and fragments
//! are logged and dropped by the components that encounter them, missing
//! entity references resolve to `None` fields, and readiness timeouts are
//! reported as degraded boolean results rather than errors.

use thiserror::Error;

/// The main error type for this crate
#[derive(Debug, Error)]
pub enum Error {
    /// WebSocket error
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// HTTP error during the polling warm-up
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration (bad URL, missing fields)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The Engine.IO/Socket.IO handshake did not complete
    #[error("Handshake failed: {0}")]
    Handshake(String),

    /// Connection closed by the upstream
    #[error("Connection closed")]
    ConnectionClosed,

    /// Operation timed out
    #[error("Operation timed out")]
    Timeout,
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::Config(format!("Invalid URL: {}", err))
    }
}
