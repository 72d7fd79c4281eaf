//! AES-128 block transform shared by both backends.
//!
//! A present IV selects CBC over the whole buffer as one chain; no IV selects
//! ECB on exactly one block. Nothing is padded: the caller hands in
//! block-aligned payloads, and anything else is a bug in the caller that
//! panics.

pub mod embedded;
pub mod platform;

use std::fmt;

use osdp_core::hex::{decoded_len, hex_to_bin};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;

pub use embedded::EmbeddedCipher;
pub use platform::PlatformCipher;

/// AES block size.
pub const BLOCK_SIZE: usize = 16;

/// AES-128 key size.
pub const KEY_SIZE: usize = 16;

/// A 128-bit AES key. Wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CipherKey([u8; KEY_SIZE]);

impl CipherKey {
    pub const fn new(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }

    /// Parse 32 hex digits.
    pub fn from_hex(text: &str) -> Result<Self, CryptoError> {
        decode_block(text, |actual| CryptoError::InvalidKeyLength {
            expected: KEY_SIZE,
            actual,
        })
        .map(Self)
    }
}

impl fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CipherKey([REDACTED])")
    }
}

impl PartialEq for CipherKey {
    fn eq(&self, other: &Self) -> bool {
        self.0[..].ct_eq(&other.0[..]).into()
    }
}

impl Eq for CipherKey {}

impl From<[u8; KEY_SIZE]> for CipherKey {
    fn from(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for CipherKey {
    type Error = CryptoError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        <[u8; KEY_SIZE]>::try_from(bytes)
            .map(Self)
            .map_err(|_| CryptoError::InvalidKeyLength {
                expected: KEY_SIZE,
                actual: bytes.len(),
            })
    }
}

/// CBC initialization vector.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Iv([u8; BLOCK_SIZE]);

impl Iv {
    pub const fn new(bytes: [u8; BLOCK_SIZE]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; BLOCK_SIZE] {
        &self.0
    }

    /// Parse 32 hex digits.
    pub fn from_hex(text: &str) -> Result<Self, CryptoError> {
        decode_block(text, |actual| CryptoError::InvalidIvLength {
            expected: BLOCK_SIZE,
            actual,
        })
        .map(Self)
    }
}

impl fmt::Debug for Iv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Iv({})", hex::encode(self.0))
    }
}

impl From<[u8; BLOCK_SIZE]> for Iv {
    fn from(bytes: [u8; BLOCK_SIZE]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Iv {
    type Error = CryptoError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        <[u8; BLOCK_SIZE]>::try_from(bytes)
            .map(Self)
            .map_err(|_| CryptoError::InvalidIvLength {
                expected: BLOCK_SIZE,
                actual: bytes.len(),
            })
    }
}

fn decode_block(
    text: &str,
    length_error: impl FnOnce(usize) -> CryptoError,
) -> Result<[u8; BLOCK_SIZE], CryptoError> {
    let text = text.trim();
    let actual = decoded_len(text.len());
    if actual != BLOCK_SIZE {
        return Err(length_error(actual));
    }
    let mut out = [0u8; BLOCK_SIZE];
    hex_to_bin(text, &mut out)?;
    Ok(out)
}

/// Which way a transform runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

/// In-place AES-128 transform.
///
/// Implementations keep no state between calls, so one instance can serve
/// any number of threads as long as each call has its own buffer.
pub trait BlockCipher: Send + Sync {
    /// Short backend name for diagnostics.
    fn name(&self) -> &'static str;

    /// Encrypt or decrypt `buffer` in place.
    ///
    /// # Panics
    ///
    /// With an IV, if `buffer.len()` is not a multiple of [`BLOCK_SIZE`].
    /// Without one, if `buffer.len()` is not exactly [`BLOCK_SIZE`].
    fn transform(&self, key: &CipherKey, iv: Option<&Iv>, buffer: &mut [u8], direction: Direction);

    fn encrypt(&self, key: &CipherKey, iv: Option<&Iv>, buffer: &mut [u8]) {
        self.transform(key, iv, buffer, Direction::Encrypt);
    }

    fn decrypt(&self, key: &CipherKey, iv: Option<&Iv>, buffer: &mut [u8]) {
        self.transform(key, iv, buffer, Direction::Decrypt);
    }
}

/// Enforce the buffer length contract for the mode `iv` selects.
pub(crate) fn check_buffer(iv: Option<&Iv>, len: usize) {
    match iv {
        Some(_) => assert!(
            len % BLOCK_SIZE == 0,
            "CBC buffer of {len} bytes is not a multiple of {BLOCK_SIZE}"
        ),
        None => assert!(
            len == BLOCK_SIZE,
            "ECB works on a single {BLOCK_SIZE}-byte block, got {len} bytes"
        ),
    }
}
