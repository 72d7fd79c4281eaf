//! Crypto error types.
//!
//! Only malformed caller input is reported here. Misuse of the in-place
//! transforms panics, and a broken cipher library or entropy source aborts
//! the process (see [`crate::fatal`]).

use osdp_core::hex::HexError;

/// Errors from building keys and IVs out of untrusted input.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("Invalid IV length: expected {expected}, got {actual}")]
    InvalidIvLength { expected: usize, actual: usize },

    #[error("Invalid hex: {0}")]
    Hex(#[from] HexError),
}
