//! # Adapter Session
//!
//! Stateful orchestrator over the packer, the key-derivation gate and the cipher
//! strategies.
//!
//! The session state is the pair `(algorithm, derivation_rounds)`. `encrypt`
//! always uses the current pair. `decrypt` tries the current algorithm, falls
//! back to the alternate one when authentication fails, and afterwards adopts the
//! algorithm and round count of the record it just opened. A session therefore
//! "learns" the parameters of whatever it last decrypted:
//!
//! ```no_run
//! use adaptcrypt_rs::aliases::PasswordString;
//! use adaptcrypt_rs::{AdapterSession, Algorithm};
//!
//! let password = PasswordString::new("hunter2".to_string());
//! let session = AdapterSession::new();
//! session.set_algorithm(Algorithm::Cbc);
//!
//! # let wire_from_elsewhere = String::new();
//! let text = session.decrypt_text(&wire_from_elsewhere, &password)?;
//! // `session.algorithm()` / `session.derivation_rounds()` now match that record
//! # Ok::<(), adaptcrypt_rs::AdapterError>(())
//! ```
//!
//! # Thread Safety
//!
//! The state pair sits behind a mutex and is always read and replaced as a unit,
//! so concurrent decrypts never leave a mixed `(algorithm, rounds)` behind. The
//! last decrypt to finish wins.

use crate::aliases::PasswordString;
use crate::builders::AdapterSessionBuilder;
use crate::cipher::Algorithm;
use crate::consts::{DEFAULT_DERIVATION_ROUNDS, PBKDF2_MAX_ROUNDS, PBKDF2_MIN_ROUNDS};
use crate::crypto::rng::{OsRandom, RandomSource};
use crate::error::AdapterError;
use crate::packer::{pack, unpack, EncryptedRecord};
use crate::payload::Payload;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// The mutable parameters of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    /// Algorithm used by the next `encrypt` and tried first by the next `decrypt`.
    pub algorithm: Algorithm,
    /// PBKDF2 round count used by the next `encrypt`.
    pub derivation_rounds: u32,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Gcm,
            derivation_rounds: DEFAULT_DERIVATION_ROUNDS,
        }
    }
}

/// Long-lived, per-caller encryption adapter.
pub struct AdapterSession {
    state: Mutex<SessionState>,
    auto_detect: bool,
    random: Arc<dyn RandomSource>,
}

impl AdapterSession {
    /// Session with default parameters: GCM, [`DEFAULT_DERIVATION_ROUNDS`],
    /// auto-detection on, OS randomness.
    pub fn new() -> Self {
        Self::from_parts(SessionState::default(), true, Arc::new(OsRandom))
    }

    /// Fluent configuration; see [`AdapterSessionBuilder`].
    pub fn builder() -> AdapterSessionBuilder {
        AdapterSessionBuilder::new()
    }

    pub(crate) fn from_parts(
        state: SessionState,
        auto_detect: bool,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            state: Mutex::new(state),
            auto_detect,
            random,
        }
    }

    // The pair is Copy and always written whole, so a poisoned lock still holds
    // a consistent value.
    #[inline]
    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current `(algorithm, derivation_rounds)` pair.
    pub fn state(&self) -> SessionState {
        *self.lock_state()
    }

    /// Current algorithm.
    pub fn algorithm(&self) -> Algorithm {
        self.state().algorithm
    }

    /// Current PBKDF2 round count.
    pub fn derivation_rounds(&self) -> u32 {
        self.state().derivation_rounds
    }

    /// Whether `decrypt` retries with the alternate algorithm and adopts the
    /// parameters of decrypted records.
    pub fn auto_detect(&self) -> bool {
        self.auto_detect
    }

    /// Switch the algorithm used by subsequent encrypts.
    pub fn set_algorithm(&self, algorithm: Algorithm) {
        self.lock_state().algorithm = algorithm;
    }

    /// Change the round count used by subsequent encrypts.
    ///
    /// # Errors
    ///
    /// [`AdapterError::Derivation`] when `rounds` is outside
    /// [`PBKDF2_MIN_ROUNDS`]..=[`PBKDF2_MAX_ROUNDS`].
    pub fn set_derivation_rounds(&self, rounds: u32) -> Result<(), AdapterError> {
        validate_rounds(rounds)?;
        self.lock_state().derivation_rounds = rounds;
        Ok(())
    }

    /// Encrypt `data` with the current parameters and pack it.
    ///
    /// Text in, text wire out; bytes in, bytes wire out.
    pub fn encrypt(
        &self,
        data: &Payload,
        password: &PasswordString,
    ) -> Result<Payload, AdapterError> {
        let wire = pack(&self.encrypt_record(data.as_bytes(), password)?);
        Ok(match data {
            Payload::Text(_) => Payload::Text(wire),
            Payload::Bytes(_) => Payload::Bytes(wire.into_bytes()),
        })
    }

    /// Unpack and decrypt `wire`, learning its parameters on success.
    ///
    /// Text wire yields text plaintext, bytes wire yields bytes plaintext.
    ///
    /// # Errors
    ///
    /// - [`AdapterError::Format`] - malformed packed record (no retry)
    /// - [`AdapterError::Authentication`] - neither algorithm authenticated it
    /// - [`AdapterError::Derivation`] - the record's round count was refused
    /// - [`AdapterError::Decode`] - text wire whose plaintext is not UTF-8
    pub fn decrypt(
        &self,
        wire: &Payload,
        password: &PasswordString,
    ) -> Result<Payload, AdapterError> {
        let record = match wire {
            Payload::Text(text) => unpack(text)?,
            Payload::Bytes(bytes) => unpack(std::str::from_utf8(bytes).map_err(|e| {
                AdapterError::Format(format!("packed record is not UTF-8: {e}"))
            })?)?,
        };
        let plaintext = self.decrypt_record(&record, password)?;
        wire.reshape(plaintext)
    }

    /// Text convenience wrapper around [`encrypt`](Self::encrypt).
    pub fn encrypt_text(
        &self,
        text: &str,
        password: &PasswordString,
    ) -> Result<String, AdapterError> {
        let record = self.encrypt_record(text.as_bytes(), password)?;
        Ok(pack(&record))
    }

    /// Text convenience wrapper around [`decrypt`](Self::decrypt).
    pub fn decrypt_text(
        &self,
        wire: &str,
        password: &PasswordString,
    ) -> Result<String, AdapterError> {
        let record = unpack(wire)?;
        let plaintext = self.decrypt_record(&record, password)?;
        crate::payload::bytes_to_text(plaintext)
    }

    /// Bytes convenience wrapper around [`encrypt`](Self::encrypt).
    pub fn encrypt_bytes(
        &self,
        data: &[u8],
        password: &PasswordString,
    ) -> Result<Vec<u8>, AdapterError> {
        self.encrypt(&Payload::Bytes(data.to_vec()), password)
            .map(Payload::into_bytes)
    }

    /// Bytes convenience wrapper around [`decrypt`](Self::decrypt).
    pub fn decrypt_bytes(
        &self,
        wire: &[u8],
        password: &PasswordString,
    ) -> Result<Vec<u8>, AdapterError> {
        self.decrypt(&Payload::Bytes(wire.to_vec()), password)
            .map(Payload::into_bytes)
    }

    /// Encrypt to an unpacked record using the current parameters.
    pub fn encrypt_record(
        &self,
        plaintext: &[u8],
        password: &PasswordString,
    ) -> Result<EncryptedRecord, AdapterError> {
        let SessionState {
            algorithm,
            derivation_rounds,
        } = self.state();
        algorithm
            .strategy()
            .encrypt(plaintext, password, derivation_rounds, self.random.as_ref())
    }

    /// Decrypt an unpacked record with trial authentication and parameter learning.
    pub fn decrypt_record(
        &self,
        record: &EncryptedRecord,
        password: &PasswordString,
    ) -> Result<Vec<u8>, AdapterError> {
        let current = self.algorithm();

        let (algorithm, plaintext) = match current.strategy().decrypt(record, password) {
            Ok(plaintext) => (current, plaintext),
            Err(err) if err.is_authentication() && self.auto_detect => {
                let alternate = current.alternate();
                debug!(
                    tried = %current,
                    retry = %alternate,
                    "record did not authenticate, retrying with alternate algorithm"
                );
                match alternate.strategy().decrypt(record, password) {
                    Ok(plaintext) => (alternate, plaintext),
                    // The caller configured `current`; its failure is the one to report.
                    Err(retry_err) if retry_err.is_authentication() => return Err(err),
                    Err(retry_err) => return Err(retry_err),
                }
            }
            Err(err) => return Err(err),
        };

        if self.auto_detect {
            self.learn(SessionState {
                algorithm,
                derivation_rounds: record.rounds,
            });
        }

        Ok(plaintext)
    }

    fn learn(&self, observed: SessionState) {
        let mut state = self.lock_state();
        if *state != observed {
            debug!(
                from_algorithm = %state.algorithm,
                to_algorithm = %observed.algorithm,
                from_rounds = state.derivation_rounds,
                to_rounds = observed.derivation_rounds,
                "adopting parameters of decrypted record"
            );
            *state = observed;
        }
    }
}

impl Default for AdapterSession {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AdapterSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterSession")
            .field("state", &self.state())
            .field("auto_detect", &self.auto_detect)
            .finish_non_exhaustive()
    }
}

pub(crate) fn validate_rounds(rounds: u32) -> Result<(), AdapterError> {
    if !(PBKDF2_MIN_ROUNDS..=PBKDF2_MAX_ROUNDS).contains(&rounds) {
        return Err(AdapterError::Derivation(format!(
            "derivation rounds must be within {PBKDF2_MIN_ROUNDS}..={PBKDF2_MAX_ROUNDS}, got {rounds}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::rng::FixedRandom;

    fn password() -> PasswordString {
        PasswordString::new("test".to_string())
    }

    fn session(algorithm: Algorithm, rounds: u32) -> AdapterSession {
        AdapterSession::from_parts(
            SessionState {
                algorithm,
                derivation_rounds: rounds,
            },
            true,
            Arc::new(OsRandom),
        )
    }

    #[test]
    fn defaults() {
        let s = AdapterSession::new();
        assert_eq!(s.algorithm(), Algorithm::Gcm);
        assert_eq!(s.derivation_rounds(), DEFAULT_DERIVATION_ROUNDS);
        assert!(s.auto_detect());
    }

    #[test]
    fn set_derivation_rounds_validates() {
        let s = session(Algorithm::Cbc, 10);
        assert!(matches!(
            s.set_derivation_rounds(0),
            Err(AdapterError::Derivation(_))
        ));
        assert_eq!(s.derivation_rounds(), 10);
        s.set_derivation_rounds(20).unwrap();
        assert_eq!(s.derivation_rounds(), 20);
    }

    #[test]
    fn encrypt_record_uses_current_state() {
        let s = AdapterSession::from_parts(
            SessionState {
                algorithm: Algorithm::Cbc,
                derivation_rounds: 7,
            },
            true,
            Arc::new(FixedRandom(0)),
        );
        let record = s.encrypt_record(b"abc", &password()).unwrap();
        assert_eq!(record.rounds, 7);
        assert_eq!(record.iv, "00".repeat(16));
    }

    #[test]
    fn learning_replaces_the_pair_as_a_unit() {
        let producer = session(Algorithm::Cbc, 33);
        let wire = producer.encrypt_text("x", &password()).unwrap();

        let consumer = session(Algorithm::Gcm, 5);
        consumer.decrypt_text(&wire, &password()).unwrap();
        assert_eq!(
            consumer.state(),
            SessionState {
                algorithm: Algorithm::Cbc,
                derivation_rounds: 33
            }
        );
    }

    #[test]
    fn failed_decrypt_leaves_state_untouched() {
        let producer = session(Algorithm::Cbc, 33);
        let wire = producer.encrypt_text("x", &password()).unwrap();

        let consumer = session(Algorithm::Gcm, 5);
        let wrong = PasswordString::new("nope".to_string());
        let err = consumer.decrypt_text(&wire, &wrong).unwrap_err();
        assert!(err.is_authentication());
        assert_eq!(consumer.state().algorithm, Algorithm::Gcm);
        assert_eq!(consumer.state().derivation_rounds, 5);
    }

    #[test]
    fn debug_does_not_require_secrets() {
        let rendered = format!("{:?}", session(Algorithm::Gcm, 1));
        assert!(rendered.contains("AdapterSession"));
        assert!(rendered.contains("Gcm"));
    }
}
