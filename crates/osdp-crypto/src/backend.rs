//! Cipher and random source pairing.
//!
//! The default pair is fixed when the crate is built: the `embedded` feature
//! selects [`CryptoBackend::embedded`], otherwise [`CryptoBackend::platform`].

use std::fmt;
use std::sync::OnceLock;

use crate::cipher::{BlockCipher, CipherKey, EmbeddedCipher, Iv, PlatformCipher};
use crate::random::{OsRandom, RandomSource, WeakRandom};

/// Which implementation pair a [`CryptoBackend`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Library AES with the OS CSPRNG.
    Platform,
    /// Self-contained AES with the weak PRNG.
    Embedded,
}

impl BackendKind {
    /// The kind selected at build time.
    pub const DEFAULT: Self = if cfg!(feature = "embedded") {
        Self::Embedded
    } else {
        Self::Platform
    };

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Platform => "platform",
            Self::Embedded => "embedded",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A block cipher and random source that are used together.
pub struct CryptoBackend {
    kind: BackendKind,
    cipher: Box<dyn BlockCipher>,
    random: Box<dyn RandomSource>,
}

impl CryptoBackend {
    pub fn platform() -> Self {
        Self {
            kind: BackendKind::Platform,
            cipher: Box::new(PlatformCipher),
            random: Box::new(OsRandom),
        }
    }

    pub fn embedded() -> Self {
        Self {
            kind: BackendKind::Embedded,
            cipher: Box::new(EmbeddedCipher),
            random: Box::new(WeakRandom::new()),
        }
    }

    pub fn new(kind: BackendKind) -> Self {
        match kind {
            BackendKind::Platform => Self::platform(),
            BackendKind::Embedded => Self::embedded(),
        }
    }

    pub const fn kind(&self) -> BackendKind {
        self.kind
    }

    pub fn cipher(&self) -> &dyn BlockCipher {
        self.cipher.as_ref()
    }

    pub fn random(&self) -> &dyn RandomSource {
        self.random.as_ref()
    }

    /// Encrypt `data` in place: CBC with an IV, single-block ECB without.
    ///
    /// # Panics
    ///
    /// On a buffer length the selected mode cannot take.
    pub fn encrypt(&self, key: &CipherKey, iv: Option<&Iv>, data: &mut [u8]) {
        self.cipher.encrypt(key, iv, data);
    }

    /// Inverse of [`Self::encrypt`].
    ///
    /// # Panics
    ///
    /// On a buffer length the selected mode cannot take.
    pub fn decrypt(&self, key: &CipherKey, iv: Option<&Iv>, data: &mut [u8]) {
        self.cipher.decrypt(key, iv, data);
    }

    pub fn fill_random(&self, buffer: &mut [u8]) {
        self.random.fill(buffer);
    }

    /// A fresh array of random bytes, e.g. a nonce or a session key.
    pub fn random_array<const N: usize>(&self) -> [u8; N] {
        let mut out = [0u8; N];
        self.random.fill(&mut out);
        out
    }
}

impl Default for CryptoBackend {
    fn default() -> Self {
        Self::new(BackendKind::DEFAULT)
    }
}

impl fmt::Debug for CryptoBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoBackend")
            .field("kind", &self.kind)
            .field("cipher", &self.cipher.name())
            .field("random", &self.random.name())
            .finish()
    }
}

/// The process-wide backend, built on first use.
pub fn default_backend() -> &'static CryptoBackend {
    static BACKEND: OnceLock<CryptoBackend> = OnceLock::new();
    BACKEND.get_or_init(|| {
        let backend = CryptoBackend::default();
        tracing::debug!(target: "osdp", backend = %backend.kind(), "crypto backend ready");
        backend
    })
}

/// Encrypt with the process-wide backend.
///
/// # Panics
///
/// On a buffer length the selected mode cannot take.
pub fn encrypt(key: &CipherKey, iv: Option<&Iv>, data: &mut [u8]) {
    default_backend().encrypt(key, iv, data);
}

/// Decrypt with the process-wide backend.
///
/// # Panics
///
/// On a buffer length the selected mode cannot take.
pub fn decrypt(key: &CipherKey, iv: Option<&Iv>, data: &mut [u8]) {
    default_backend().decrypt(key, iv, data);
}

/// Fill `buffer` from the process-wide random source.
pub fn fill_random(buffer: &mut [u8]) {
    default_backend().fill_random(buffer);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_kind_follows_feature() {
        let expected = if cfg!(feature = "embedded") {
            BackendKind::Embedded
        } else {
            BackendKind::Platform
        };
        assert_eq!(BackendKind::DEFAULT, expected);
        assert_eq!(default_backend().kind(), expected);
        assert_eq!(CryptoBackend::default().kind(), expected);
    }

    #[test]
    fn pairs() {
        let platform = CryptoBackend::platform();
        assert_eq!(platform.cipher().name(), "platform");
        assert_eq!(platform.random().name(), "os");

        let embedded = CryptoBackend::new(BackendKind::Embedded);
        assert_eq!(embedded.kind(), BackendKind::Embedded);
        assert_eq!(embedded.cipher().name(), "embedded");
        assert_eq!(embedded.random().name(), "weak");
    }

    #[test]
    fn debug_names_parts() {
        let shown = format!("{:?}", CryptoBackend::platform());
        assert!(shown.contains("Platform"));
        assert!(shown.contains("\"os\""));
        assert_eq!(BackendKind::Embedded.to_string(), "embedded");
    }

    #[test]
    fn free_functions_round_trip() {
        let key = CipherKey::new([0x11; 16]);
        let iv = Iv::new([0x22; 16]);
        let mut data = *b"sixteen byte msgsixteen byte msg";
        encrypt(&key, Some(&iv), &mut data);
        assert_ne!(&data, b"sixteen byte msgsixteen byte msg");
        decrypt(&key, Some(&iv), &mut data);
        assert_eq!(&data, b"sixteen byte msgsixteen byte msg");
    }

    #[test]
    fn random_array_and_fill() {
        let backend = CryptoBackend::platform();
        let nonce: [u8; 8] = backend.random_array();
        let key: [u8; 16] = backend.random_array();
        assert_ne!(nonce, [0; 8]);
        assert_ne!(key, [0; 16]);

        let mut buf = [0u8; 12];
        fill_random(&mut buf);
        assert_ne!(buf, [0; 12]);
    }
}
