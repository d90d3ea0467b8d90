//! # Constants
//!
//! This module defines the wire-format, key-derivation and cipher constants used
//! throughout the library.

/// Component delimiter of the packed wire format.
///
/// Component encodings (base64 / hex) never produce this character.
pub const WIRE_DELIMITER: char = '$';

/// Number of components in a legacy packed record (`content$iv$salt$authTag`).
pub const LEGACY_COMPONENT_COUNT: usize = 4;

/// Number of components in a current packed record (`content$iv$salt$authTag$rounds`).
pub const CURRENT_COMPONENT_COUNT: usize = 5;

/// PBKDF2 round count assumed for legacy 4-component records.
///
/// Early producers did not write the round count; every record they emitted was
/// derived with exactly this many rounds.
pub const LEGACY_PBKDF2_ROUNDS: u32 = 250_000;

/// Default PBKDF2 round count for new sessions.
pub const DEFAULT_DERIVATION_ROUNDS: u32 = 250_000;

/// Minimum allowed PBKDF2 round count.
pub const PBKDF2_MIN_ROUNDS: u32 = 1;

/// Maximum allowed PBKDF2 round count.
///
/// Set to `5_000_000` so that a hostile record cannot pin a CPU for minutes.
pub const PBKDF2_MAX_ROUNDS: u32 = 5_000_000;

/// Salt size in bytes, shared by both algorithms.
pub const SALT_SIZE: usize = 16;

/// AES-256 key size in bytes.
pub const AES_KEY_SIZE: usize = 32;

/// HMAC-SHA256 key size in bytes (CBC only).
pub const HMAC_KEY_SIZE: usize = 32;

/// HMAC-SHA256 digest size in bytes (CBC only).
pub const HMAC_TAG_SIZE: usize = 32;

/// AES block size / CBC IV size in bytes.
pub const CBC_IV_SIZE: usize = 16;

/// Bits of key material derived for CBC: encryption key followed by HMAC key.
pub const CBC_KEY_MATERIAL_BITS: usize = (AES_KEY_SIZE + HMAC_KEY_SIZE) * 8;

/// GCM nonce size in bytes.
pub const GCM_NONCE_SIZE: usize = 12;

/// GCM authentication tag size in bytes.
pub const GCM_TAG_SIZE: usize = 16;

/// Bits of key material derived for GCM.
pub const GCM_KEY_MATERIAL_BITS: usize = AES_KEY_SIZE * 8;

/// Maximum size of a single chunk emitted by the streaming transform.
pub const STREAM_CHUNK_SIZE: usize = 64 * 1024;
