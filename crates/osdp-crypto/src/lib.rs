//! OSDP Secure Channel Primitives
//!
//! AES-128 and random bytes for the OSDP secure channel, behind traits so the
//! protocol layer never names a concrete implementation.
//!
//! ## Backends
//!
//! - **Platform**: RustCrypto `aes`/`cbc` with the OS CSPRNG (default)
//! - **Embedded**: self-contained AES-128 with a seeded PRNG, for targets with
//!   neither a crypto library nor an entropy source (`embedded` feature)
//!
//! Both ciphers produce identical output for the same key, IV and data.

pub mod backend;
pub mod cipher;
pub mod error;
mod fatal;
pub mod random;

pub use backend::{BackendKind, CryptoBackend, decrypt, default_backend, encrypt, fill_random};
pub use cipher::{
    BLOCK_SIZE, BlockCipher, CipherKey, Direction, EmbeddedCipher, Iv, KEY_SIZE, PlatformCipher,
};
pub use error::CryptoError;
pub use random::{OsRandom, RandomSource, WeakRandom};
