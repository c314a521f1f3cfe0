//! Error types for the Nomos client
//!
//! Provides a unified error type for all client operations.

use thiserror::Error;

/// Result type alias using NomosError
pub type Result<T> = std::result::Result<T, NomosError>;

/// Unified error type for Nomos client operations
#[derive(Debug, Error)]
pub enum NomosError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("Server unavailable: {0}")]
    Unavailable(String),

    #[error("Not connected")]
    NotConnected,

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Server error: {message}")]
    Server {
        /// Header text following the status byte
        message: String,

        /// Server asked for the connection to be dropped
        reset_required: bool,
    },

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Protocol desynchronized: {0}")]
    Desync(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl NomosError {
    /// Whether this error left the client without a usable connection.
    pub fn is_fatal(&self) -> bool {
        match self {
            NomosError::Io(_)
            | NomosError::Unavailable(_)
            | NomosError::NotConnected
            | NomosError::Desync(_) => true,
            NomosError::Server { reset_required, .. } => *reset_required,
            NomosError::Protocol(_) | NomosError::InvalidKey(_) | NomosError::Config(_) => false,
        }
    }
}
