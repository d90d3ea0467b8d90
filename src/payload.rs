//! # Payload
//!
//! Text/bytes duality of the adapter API.
//!
//! The shape of a value is carried explicitly rather than guessed from its
//! contents:
//!
//! - `encrypt(Text)` yields a `Text` wire value; `encrypt(Bytes)` yields `Bytes`.
//! - `decrypt(Text)` yields UTF-8 decoded `Text`; `decrypt(Bytes)` yields raw `Bytes`.
//!
//! A byte plaintext that happens to be valid UTF-8 therefore never turns into text.

use crate::error::AdapterError;

/// Plaintext or wire value, tagged with its shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// UTF-8 text.
    Text(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
}

impl Payload {
    /// Underlying bytes, regardless of shape.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::Text(text) => text.as_bytes(),
            Payload::Bytes(bytes) => bytes,
        }
    }

    /// `true` for [`Payload::Text`].
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self, Payload::Text(_))
    }

    /// The text, if this is [`Payload::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            Payload::Bytes(_) => None,
        }
    }

    /// Consume into raw bytes, regardless of shape.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Payload::Text(text) => text.into_bytes(),
            Payload::Bytes(bytes) => bytes,
        }
    }

    /// Consume into text, if this is [`Payload::Text`].
    pub fn into_text(self) -> Option<String> {
        match self {
            Payload::Text(text) => Some(text),
            Payload::Bytes(_) => None,
        }
    }

    /// Wrap `data` in the same shape as `self`.
    ///
    /// Text shape decodes `data` as UTF-8; failure is [`AdapterError::Decode`].
    pub(crate) fn reshape(&self, data: Vec<u8>) -> Result<Payload, AdapterError> {
        match self {
            Payload::Text(_) => bytes_to_text(data).map(Payload::Text),
            Payload::Bytes(_) => Ok(Payload::Bytes(data)),
        }
    }
}

/// UTF-8 decode recovered plaintext.
pub fn bytes_to_text(bytes: Vec<u8>) -> Result<String, AdapterError> {
    String::from_utf8(bytes).map_err(|e| {
        AdapterError::Decode(format!("recovered plaintext is not valid UTF-8: {e}"))
    })
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_owned())
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Bytes(bytes)
    }
}

impl From<&[u8]> for Payload {
    fn from(bytes: &[u8]) -> Self {
        Payload::Bytes(bytes.to_vec())
    }
}
