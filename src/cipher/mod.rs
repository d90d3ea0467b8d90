// src/cipher/mod.rs

//! # Cipher Strategies
//!
//! Two independent implementations of [`CipherStrategy`]:
//!
//! - [`CbcStrategy`] - AES-256-CBC + PKCS#7, authenticated by HMAC-SHA256 over `iv ‖ ciphertext`
//! - [`GcmStrategy`] - AES-256-GCM, tag produced by the AEAD itself
//!
//! A strategy turns plaintext into an [`EncryptedRecord`] and back. Neither knows
//! about the wire format beyond the record fields, and neither inherits behaviour
//! from the other: [`Algorithm`] is only a tag that selects one of them.

pub(crate) mod cbc;
pub(crate) mod gcm;

pub use cbc::CbcStrategy;
pub use gcm::GcmStrategy;

use crate::aliases::PasswordString;
use crate::consts::SALT_SIZE;
use crate::crypto::rng::RandomSource;
use crate::error::AdapterError;
use crate::packer::EncryptedRecord;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt;
use std::str::FromStr;

/// Cipher family of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// AES-256-CBC with a separate HMAC-SHA256.
    Cbc,
    /// AES-256-GCM.
    Gcm,
}

impl Algorithm {
    /// Both algorithms, in no particular priority.
    pub const ALL: [Algorithm; 2] = [Algorithm::Cbc, Algorithm::Gcm];

    /// The other algorithm; the one tried when this one fails to authenticate.
    #[inline]
    pub const fn alternate(self) -> Algorithm {
        match self {
            Algorithm::Cbc => Algorithm::Gcm,
            Algorithm::Gcm => Algorithm::Cbc,
        }
    }

    /// Strategy implementing this algorithm.
    #[inline]
    pub fn strategy(self) -> &'static dyn CipherStrategy {
        match self {
            Algorithm::Cbc => &CbcStrategy,
            Algorithm::Gcm => &GcmStrategy,
        }
    }

    /// Lowercase name, as used in logs and by [`FromStr`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Algorithm::Cbc => "cbc",
            Algorithm::Gcm => "gcm",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cbc" | "aes-256-cbc" => Ok(Algorithm::Cbc),
            "gcm" | "aes-256-gcm" => Ok(Algorithm::Gcm),
            other => Err(AdapterError::Crypto(format!("unknown algorithm: {other}"))),
        }
    }
}

/// Encrypt/decrypt contract shared by the CBC and GCM variants.
///
/// # Thread Safety
///
/// Implementations are stateless unit structs and therefore `Send + Sync`.
pub trait CipherStrategy: Send + Sync {
    /// Tag of this strategy.
    fn algorithm(&self) -> Algorithm;

    /// IV / nonce length in bytes.
    fn iv_size(&self) -> usize;

    /// Encrypt with a fresh IV and salt drawn from `random`.
    fn encrypt(
        &self,
        plaintext: &[u8],
        password: &PasswordString,
        rounds: u32,
        random: &dyn RandomSource,
    ) -> Result<EncryptedRecord, AdapterError> {
        let iv = random.random_bytes(self.iv_size())?;
        let salt = random.random_bytes(SALT_SIZE)?;
        self.encrypt_with_params(plaintext, password, rounds, &iv, &salt)
    }

    /// Encrypt with caller-supplied IV and salt.
    ///
    /// Deterministic; never reuse an IV/salt pair with the same password outside
    /// of tests.
    fn encrypt_with_params(
        &self,
        plaintext: &[u8],
        password: &PasswordString,
        rounds: u32,
        iv: &[u8],
        salt: &[u8],
    ) -> Result<EncryptedRecord, AdapterError>;

    /// Authenticate and decrypt `record`.
    ///
    /// Returns [`AdapterError::Authentication`] for anything that prevents the
    /// record from authenticating under this algorithm, including components
    /// that do not decode or have the wrong length for it.
    fn decrypt(
        &self,
        record: &EncryptedRecord,
        password: &PasswordString,
    ) -> Result<Vec<u8>, AdapterError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Component codecs
// ─────────────────────────────────────────────────────────────────────────────

#[inline]
pub(crate) fn encode_content(ciphertext: &[u8]) -> String {
    STANDARD.encode(ciphertext)
}

pub(crate) fn decode_content(content: &str) -> Result<Vec<u8>, AdapterError> {
    STANDARD
        .decode(content)
        .map_err(|e| AdapterError::Authentication(format!("content is not valid base64: {e}")))
}

pub(crate) fn decode_hex_component(name: &str, value: &str) -> Result<Vec<u8>, AdapterError> {
    hex::decode(value)
        .map_err(|e| AdapterError::Authentication(format!("{name} is not valid hex: {e}")))
}
