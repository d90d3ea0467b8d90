// src/crypto/rng.rs
//! Randomness sources for IVs and salts
//!
//! Strategies never touch an RNG directly; they draw from a [`RandomSource`]
//! handed in by the session. Production sessions use [`OsRandom`] (a
//! thread-local `OsRng`); [`FixedRandom`] exists for byte-exact tests.

use crate::error::AdapterError;
use rand::{rngs::OsRng, TryRngCore};
use std::cell::RefCell;

/// Source of IV and salt bytes.
pub trait RandomSource: Send + Sync {
    /// Fill `dest` completely or fail.
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), AdapterError>;

    /// Convenience: a freshly filled vector of `len` bytes.
    fn random_bytes(&self, len: usize) -> Result<Vec<u8>, AdapterError> {
        let mut out = vec![0u8; len];
        self.fill_bytes(&mut out)?;
        Ok(out)
    }
}

// Thread-local OsRng wrapped in RefCell so we can mutably borrow it
thread_local! {
    static RNG: RefCell<OsRng> = const { RefCell::new(OsRng) };
}

/// Operating-system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    #[inline]
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), AdapterError> {
        RNG.with(|rng_cell| {
            rng_cell
                .borrow_mut()
                .try_fill_bytes(dest)
                .map_err(|e| AdapterError::Crypto(format!("OS randomness unavailable: {e}")))
        })
    }
}

/// Deterministic source that repeats a single byte.
///
/// ONLY for tests and vector generation: every IV and salt it yields is identical.
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom(pub u8);

impl RandomSource for FixedRandom {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), AdapterError> {
        dest.fill(self.0);
        Ok(())
    }
}
