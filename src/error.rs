//! Error types for the remoting layer
//!
//! Provides a unified error type for all transport operations.

use thiserror::Error;

/// Result type alias using RemotingError
pub type Result<T> = std::result::Result<T, RemotingError>;

/// Unified error type for remoting operations
#[derive(Debug, Error)]
pub enum RemotingError {
    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Not connected to {0}")]
    NotConnected(String),

    #[error("Connection to {0} closed while waiting for a response")]
    ConnectionClosed(String),

    #[error("Connection pool is closed")]
    PoolClosed,

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Frame too large: {size} bytes (max {max})")]
    FrameTooLarge { size: usize, max: usize },

    #[error("Failed to encode command header: {0}")]
    Encode(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Cancellation
    // -------------------------------------------------------------------------
    #[error("Request {opaque} to {addr} timed out")]
    Timeout { addr: String, opaque: i32 },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RemotingError {
    /// Whether the connection that produced this error must be evicted.
    ///
    /// Timeouts and protocol errors on a single request leave the
    /// connection usable; everything that touched the socket does not.
    ///
    /// A retry after a `Timeout` must be a new `Command::request`. Resending
    /// the same command reuses its opaque, and the late response to the first
    /// attempt would then be delivered as the answer to the retry.
    pub fn is_connection_fatal(&self) -> bool {
        matches!(
            self,
            RemotingError::Connect { .. }
                | RemotingError::NotConnected(_)
                | RemotingError::ConnectionClosed(_)
                | RemotingError::Io(_)
                | RemotingError::FrameTooLarge { .. }
        )
    }

    /// Whether the caller's deadline fired before a response arrived.
    pub fn is_timeout(&self) -> bool {
        matches!(self, RemotingError::Timeout { .. })
    }
}
