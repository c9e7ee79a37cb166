//! Realtime client error types.

use thiserror::Error;

/// Errors raised by a [`Transport`](crate::transport::Transport) or its connections.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The handshake was rejected or the socket could not be opened.
    #[error("handshake with {url} failed: {reason}")]
    Handshake {
        /// Target URL.
        url: String,
        /// Why it failed.
        reason: String,
    },

    /// The handshake did not finish in time.
    #[error("handshake with {url} timed out after {timeout_ms}ms")]
    Timeout {
        /// Target URL.
        url: String,
        /// How long we waited.
        timeout_ms: u64,
    },

    /// An established connection failed.
    #[error("connection error: {0}")]
    Connection(String),
}

/// Errors returned from [`RealtimeClient`](crate::RealtimeClient) operations.
#[derive(Debug, Error)]
pub enum RealtimeError {
    /// Settings and identity did not form a valid connection target.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}
