//! Random byte sources for nonces, challenges and session keys.

use std::process;
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::{OsRng, SmallRng};
use rand::{RngCore, SeedableRng};

use crate::fatal;

/// Fills buffers with random bytes.
pub trait RandomSource: Send + Sync {
    /// Short source name for diagnostics.
    fn name(&self) -> &'static str;

    /// Overwrite all of `buf`. An empty buffer is left alone.
    fn fill(&self, buf: &mut [u8]);
}

/// The operating system CSPRNG.
///
/// Failing to read entropy aborts the process.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn name(&self) -> &'static str {
        "os"
    }

    fn fill(&self, buf: &mut [u8]) {
        if buf.is_empty() {
            return;
        }
        if let Err(e) = OsRng.try_fill_bytes(buf) {
            fatal::abort("OS random source", &e);
        }
    }
}

/// A fast non-cryptographic PRNG.
///
/// Output is predictable. Only for targets with no entropy source, where the
/// secure channel is already weakened by the platform.
#[derive(Debug)]
pub struct WeakRandom {
    rng: Mutex<SmallRng>,
}

impl WeakRandom {
    /// Seed from the clock and process id.
    pub fn new() -> Self {
        tracing::warn!(
            target: "osdp",
            "using a non-cryptographic random source; secure channel keys are predictable"
        );
        Self::with_seed(environment_seed())
    }

    /// Fixed seed, for reproducible output.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }
}

impl Default for WeakRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for WeakRandom {
    fn name(&self) -> &'static str {
        "weak"
    }

    fn fill(&self, buf: &mut [u8]) {
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .fill_bytes(buf);
    }
}

#[allow(clippy::cast_possible_truncation)]
fn environment_seed() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos() as u64);
    nanos ^ (u64::from(process::id()) << 32)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn os_random_fills_buffer() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        OsRandom.fill(&mut a);
        OsRandom.fill(&mut b);
        assert_ne!(a, [0u8; 32]);
        assert_ne!(a, b);
    }

    #[test]
    fn empty_buffer_is_fine() {
        OsRandom.fill(&mut []);
        WeakRandom::with_seed(1).fill(&mut []);
    }

    #[test]
    fn weak_random_is_reproducible() {
        let mut a = [0u8; 24];
        let mut b = [0u8; 24];
        WeakRandom::with_seed(42).fill(&mut a);
        WeakRandom::with_seed(42).fill(&mut b);
        assert_eq!(a, b);

        WeakRandom::with_seed(43).fill(&mut b);
        assert_ne!(a, b);
    }

    #[test]
    fn weak_random_advances() {
        let rng = WeakRandom::with_seed(7);
        let mut a = [0u8; 16];
        let mut b = [0u8; 16];
        rng.fill(&mut a);
        rng.fill(&mut b);
        assert_ne!(a, b);
    }

    #[test]
    fn weak_random_survives_poisoned_lock() {
        let rng = std::sync::Arc::new(WeakRandom::with_seed(3));
        let clone = rng.clone();
        let _ = std::thread::spawn(move || {
            let _guard = clone.rng.lock().unwrap();
            panic!("poison");
        })
        .join();
        let mut buf = [0u8; 8];
        rng.fill(&mut buf);
        assert_ne!(buf, [0u8; 8]);
    }

    #[test]
    fn source_names() {
        assert_eq!(OsRandom.name(), "os");
        assert_eq!(WeakRandom::with_seed(0).name(), "weak");
    }
}
