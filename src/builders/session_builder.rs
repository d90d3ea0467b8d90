//! src/builders/session_builder.rs
//! Adapter session builder

use crate::cipher::Algorithm;
use crate::consts::DEFAULT_DERIVATION_ROUNDS;
use crate::crypto::rng::{OsRandom, RandomSource};
use crate::error::AdapterError;
use crate::session::{validate_rounds, AdapterSession, SessionState};
use std::sync::Arc;

/// [`AdapterSession`] builder
///
/// Defaults: AES-256-GCM, [`DEFAULT_DERIVATION_ROUNDS`] PBKDF2 rounds,
/// auto-detection enabled, OS randomness.
///
/// ```
/// use adaptcrypt_rs::{AdapterSession, Algorithm};
///
/// let session = AdapterSession::builder()
///     .with_algorithm(Algorithm::Cbc)
///     .with_derivation_rounds(10_000)
///     .build()?;
/// assert_eq!(session.algorithm(), Algorithm::Cbc);
/// # Ok::<(), adaptcrypt_rs::AdapterError>(())
/// ```
#[derive(Clone)]
pub struct AdapterSessionBuilder {
    algorithm: Algorithm,
    derivation_rounds: u32,
    auto_detect: bool,
    random: Arc<dyn RandomSource>,
}

impl AdapterSessionBuilder {
    /// Create builder with the defaults above.
    #[must_use]
    pub fn new() -> Self {
        Self {
            algorithm: Algorithm::Gcm,
            derivation_rounds: DEFAULT_DERIVATION_ROUNDS,
            auto_detect: true,
            random: Arc::new(OsRandom),
        }
    }

    /// Initial algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Initial PBKDF2 round count (validated by [`build`](Self::build)).
    #[must_use]
    pub fn with_derivation_rounds(mut self, rounds: u32) -> Self {
        self.derivation_rounds = rounds;
        self
    }

    /// Enable or disable cross-algorithm retry and parameter learning on decrypt.
    #[must_use]
    pub fn with_auto_detect(mut self, enabled: bool) -> Self {
        self.auto_detect = enabled;
        self
    }

    /// Replace the IV/salt randomness source.
    #[must_use]
    pub fn with_random_source<S>(mut self, source: S) -> Self
    where
        S: RandomSource + 'static,
    {
        self.random = Arc::new(source);
        self
    }

    /// Current algorithm setting
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Current round count setting
    #[must_use]
    pub const fn derivation_rounds(&self) -> u32 {
        self.derivation_rounds
    }

    /// Build the session.
    ///
    /// # Errors
    ///
    /// [`AdapterError::Derivation`] when the round count is out of range.
    pub fn build(self) -> Result<AdapterSession, AdapterError> {
        validate_rounds(self.derivation_rounds)?;
        Ok(AdapterSession::from_parts(
            SessionState {
                algorithm: self.algorithm,
                derivation_rounds: self.derivation_rounds,
            },
            self.auto_detect,
            self.random,
        ))
    }
}

impl Default for AdapterSessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PBKDF2_MAX_ROUNDS;
    use crate::crypto::rng::FixedRandom;

    #[test]
    fn defaults_match_session_new() {
        let built = AdapterSessionBuilder::new().build().unwrap();
        assert_eq!(built.state(), AdapterSession::new().state());
        assert!(built.auto_detect());
    }

    #[test]
    fn overrides_are_applied() {
        let session = AdapterSessionBuilder::new()
            .with_algorithm(Algorithm::Cbc)
            .with_derivation_rounds(42)
            .with_auto_detect(false)
            .with_random_source(FixedRandom(1))
            .build()
            .unwrap();
        assert_eq!(session.algorithm(), Algorithm::Cbc);
        assert_eq!(session.derivation_rounds(), 42);
        assert!(!session.auto_detect());
    }

    #[test]
    fn out_of_range_rounds_fail_to_build() {
        for rounds in [0, PBKDF2_MAX_ROUNDS + 1] {
            let err = AdapterSessionBuilder::new()
                .with_derivation_rounds(rounds)
                .build()
                .unwrap_err();
            assert!(matches!(err, AdapterError::Derivation(_)));
        }
    }
}
