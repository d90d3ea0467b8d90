//! # Secure-Gate Type Aliases
//!
//! Type aliases for secure memory management using [`secure-gate`](https://github.com/Slurp9187/secure-gate).
//! Every secret in this crate (passphrase, derived key material, split keys) lives
//! in one of these wrappers and is zeroized on drop.
//!
//! ## Type Categories
//!
//! ### HMAC Primitive
//! - [`HmacSha256`] - HMAC-SHA256 for CBC record authentication
//!
//! ### Generic Secure Buffers
//! - [`SpanBuffer<N>`] - Generic secure stack buffer for any size `N`
//! - [`Block16`] - 16-byte AES block
//!
//! ### Dynamic Secrets
//! - [`PasswordString`] - Secure passphrase wrapper
//! - [`DerivedKey`] - PBKDF2 output of algorithm-dependent length
//!
//! ### Fixed-Size Secrets
//! - [`Aes256Key32`] - 32-byte AES-256 key
//! - [`HmacKey32`] - 32-byte HMAC-SHA256 key
//!
//! ## Usage
//!
//! All secure types require explicit `.expose_secret()` or `.expose_secret_mut()` to access
//! the underlying data.

use secure_gate::dynamic_alias;
use secure_gate::fixed_alias;

use hmac::Hmac;
use sha2::Sha256;

pub type HmacSha256 = Hmac<Sha256>;

// ─────────────────────────────────────────────────────────────────────────────
// SpanBuffer : generic secure stack buffer (direct alias to secure-gate's Fixed)
// ─────────────────────────────────────────────────────────────────────────────
pub type SpanBuffer<const N: usize> = secure_gate::Fixed<[u8; N]>;

pub type Block16 = SpanBuffer<16>; // one AES block

// ─────────────────────────────────────────────────────────────────────────────
// Dynamic secrets
// ─────────────────────────────────────────────────────────────────────────────
dynamic_alias!(pub PasswordString, String);
dynamic_alias!(pub DerivedKey, Vec<u8>); // raw PBKDF2 output

// ─────────────────────────────────────────────────────────────────────────────
// Fixed-size concrete secrets
// ─────────────────────────────────────────────────────────────────────────────
fixed_alias!(pub Aes256Key32, 32); // AES-256 key (CBC and GCM)
fixed_alias!(pub HmacKey32, 32); // CBC authentication key
