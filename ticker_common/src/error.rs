//! Error types shared between the ticker server and client.
//!
//! The `TickerError` enum unifies the market's own precondition failures with the
//! I/O, serialization and channel failures of the transport around it, allowing every
//! crate in the workspace to propagate a single error type.
use std::io;

use thiserror::Error;

/// Message carried by [`TickerError::InvalidState`] when a reset is attempted while open.
pub const RESET_WHILE_OPEN: &str = "market must be closed before reset";

/// Unified error type shared by server and client.
#[derive(Error, Debug)]
pub enum TickerError {
    /// The requested market operation is not allowed in the current market state.
    #[error("Invalid market state: {0}")]
    InvalidState(String),

    /// A stock offered to the registry is malformed (empty symbol, negative price).
    #[error("Invalid stock: {0}")]
    InvalidStock(String),

    /// Configuration file or flag holds a value outside its accepted range.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The process-wide ticker was already installed.
    #[error("Stock ticker is already initialized")]
    AlreadyInitialized,

    /// I/O error originating from the standard library or sockets/files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// The peer sent something that is not a valid protocol message.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Channel send failed (e.g., receiver dropped); contains a short context string.
    #[error("Channel send failed: {0}")]
    ChannelSend(String),
}

impl TickerError {
    /// Error returned by a reset attempted while the market is open.
    pub fn reset_while_open() -> Self {
        TickerError::InvalidState(RESET_WHILE_OPEN.to_string())
    }
}
