//! # Error Types
//!
//! This module defines the error type used throughout the library.
//! All operations return [`Result<T, AdapterError>`](AdapterError).

use thiserror::Error;

/// The error type for all adapter operations.
///
/// Every error is terminal for the operation that raised it. The only retry the
/// library ever performs is the cross-algorithm attempt in
/// [`AdapterSession::decrypt`](crate::AdapterSession::decrypt), which is driven by
/// [`AdapterError::Authentication`].
#[derive(Error, Debug)]
pub enum AdapterError {
    /// I/O error from a reader or writer handed to the streaming front end.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The packed record is structurally malformed.
    ///
    /// Raised for:
    /// - a component count outside `4..=5`
    /// - a round-count component that is not a positive base-10 integer
    /// - a byte wire value that is not UTF-8
    #[error("Format error: {0}")]
    Format(String),

    /// The record could not be authenticated.
    ///
    /// Wrong passphrase, tampering, corruption, or a record produced by a
    /// different algorithm than the one attempted.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Key derivation was refused or failed.
    #[error("Key derivation error: {0}")]
    Derivation(String),

    /// Recovered plaintext is not valid UTF-8 although text was expected.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A cryptographic primitive or the randomness source failed.
    #[error("Crypto error: {0}")]
    Crypto(String),
}

impl AdapterError {
    /// `true` for failures that the cross-algorithm retry may recover from.
    #[inline]
    pub fn is_authentication(&self) -> bool {
        matches!(self, AdapterError::Authentication(_))
    }
}

impl From<&'static str> for AdapterError {
    fn from(msg: &'static str) -> Self {
        AdapterError::Crypto(msg.to_string())
    }
}
