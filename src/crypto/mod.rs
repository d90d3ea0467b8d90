// src/crypto/mod.rs

//! Low-level crypto plumbing: key derivation and randomness.
//!
//! HMAC types are defined in `aliases.rs`.

pub mod kdf;
pub mod rng;
