//! # Key Derivation
//!
//! The single key-derivation gate used by every cipher strategy.
//!
//! - [`pbkdf2`] - PBKDF2-HMAC-SHA256 with a caller-chosen output length

pub mod pbkdf2;
