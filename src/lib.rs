// src/lib.rs

//! Passphrase encryption adapter producing self-describing packed records.
//!
//! ```text
//! content$iv$salt$authTag$rounds
//! ```
//!
//! Two cipher families are supported (AES-256-CBC + HMAC-SHA256 and AES-256-GCM,
//! both keyed through PBKDF2-HMAC-SHA256). The wire format does not name the
//! algorithm: an [`AdapterSession`] finds it by trial authentication and adopts
//! the algorithm and round count of every record it decrypts.

pub mod aliases;
pub mod builders;
pub mod cipher;
pub mod consts;
pub mod crypto;
pub mod error;
pub mod packer;
pub mod payload;
pub mod session;
pub mod stream;
pub mod utils;

// High-level API
pub use builders::AdapterSessionBuilder;
pub use cipher::{Algorithm, CipherStrategy};
pub use error::AdapterError;
pub use payload::Payload;
pub use session::{AdapterSession, SessionState};
pub use stream::{decrypt_reader, encrypt_reader, Direction, TransformStream};

// Record packer and key-derivation gate, for custom flows
pub use crypto::kdf::pbkdf2::derive_key;
pub use crypto::rng::{FixedRandom, OsRandom, RandomSource};
pub use packer::{pack, unpack, EncryptedRecord};
