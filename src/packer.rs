//! # Record Packer
//!
//! Pure, stateless conversion between an [`EncryptedRecord`] and its packed wire
//! form:
//!
//! ```text
//! content$iv$salt$authTag$rounds    (current)
//! content$iv$salt$authTag           (legacy, rounds = LEGACY_PBKDF2_ROUNDS)
//! ```
//!
//! The packer is purely structural. It checks the component count and the round
//! count and nothing else; decoding the components is the cipher strategy's job.

use crate::consts::{
    CURRENT_COMPONENT_COUNT, LEGACY_COMPONENT_COUNT, LEGACY_PBKDF2_ROUNDS, WIRE_DELIMITER,
};
use crate::error::AdapterError;
use std::fmt;
use std::str::FromStr;

/// One encrypted record in its decoded-structure form.
///
/// Every component except `rounds` is kept in its wire encoding (base64 for
/// `content`, lowercase hex for the rest).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedRecord {
    /// Ciphertext.
    pub content: String,
    /// Initialization vector (CBC) or nonce (GCM).
    pub iv: String,
    /// PBKDF2 salt.
    pub salt: String,
    /// HMAC digest (CBC) or AEAD tag (GCM).
    pub auth_tag: String,
    /// PBKDF2 round count used for this record.
    pub rounds: u32,
}

/// Join the five components with [`WIRE_DELIMITER`], in wire order.
///
/// Always writes the round count.
pub fn pack(record: &EncryptedRecord) -> String {
    let rounds = record.rounds.to_string();
    let delimiter = WIRE_DELIMITER.to_string();
    [
        record.content.as_str(),
        record.iv.as_str(),
        record.salt.as_str(),
        record.auth_tag.as_str(),
        rounds.as_str(),
    ]
    .join(delimiter.as_str())
}

/// Split a packed record back into its components.
///
/// # Errors
///
/// [`AdapterError::Format`] when the component count is not 4 or 5, or when a
/// fifth component is present but is not a positive base-10 `u32`.
pub fn unpack(wire: &str) -> Result<EncryptedRecord, AdapterError> {
    let components: Vec<&str> = wire.split(WIRE_DELIMITER).collect();

    if !(LEGACY_COMPONENT_COUNT..=CURRENT_COMPONENT_COUNT).contains(&components.len()) {
        return Err(AdapterError::Format(format!(
            "unexpected number of encrypted components: {} (expected {LEGACY_COMPONENT_COUNT} or {CURRENT_COMPONENT_COUNT})",
            components.len()
        )));
    }

    let rounds = match components.get(4) {
        Some(raw) => parse_rounds(raw)?,
        None => LEGACY_PBKDF2_ROUNDS,
    };

    Ok(EncryptedRecord {
        content: components[0].to_owned(),
        iv: components[1].to_owned(),
        salt: components[2].to_owned(),
        auth_tag: components[3].to_owned(),
        rounds,
    })
}

// A malformed round count is a producer defect: refuse it instead of guessing.
fn parse_rounds(raw: &str) -> Result<u32, AdapterError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AdapterError::Format(format!(
            "round count component is not a base-10 integer: {raw:?}"
        )));
    }
    match raw.parse::<u32>() {
        Ok(0) => Err(AdapterError::Format("round count must be positive".into())),
        Ok(rounds) => Ok(rounds),
        Err(e) => Err(AdapterError::Format(format!(
            "round count component out of range: {e}"
        ))),
    }
}

impl fmt::Display for EncryptedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&pack(self))
    }
}

impl FromStr for EncryptedRecord {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        unpack(s)
    }
}
