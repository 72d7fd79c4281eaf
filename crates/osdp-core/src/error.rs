//! Error types for the OSDP core library.

use thiserror::Error;

use crate::hex::HexError;

/// Result type alias using the core `Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for OSDP operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Hex text could not be converted to bytes
    #[error("Hex error: {0}")]
    Hex(#[from] HexError),

    /// Log level outside the eight syslog severities
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
}
