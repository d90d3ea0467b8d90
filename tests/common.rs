//! tests/common.rs
//! Common constants and helpers shared across test files

use adaptcrypt_rs::aliases::PasswordString;
use adaptcrypt_rs::{AdapterSession, Algorithm, FixedRandom};

/// Round count used by most tests; matches the rounds the reference suite used.
#[allow(dead_code)]
pub const TEST_ROUNDS: u32 = 1000;

/// Standard text sample.
#[allow(dead_code)]
pub const TEST_TEXT: &str = "iocane secret text";

/// Non-ASCII sample used for byte payloads.
#[allow(dead_code)]
pub const TEST_BYTES: &[u8] = "This is söme text! 北方话".as_bytes();

#[allow(dead_code)]
pub fn password(s: &str) -> PasswordString {
    PasswordString::new(s.to_string())
}

/// Session with OS randomness.
#[allow(dead_code)]
pub fn session(algorithm: Algorithm, rounds: u32) -> AdapterSession {
    AdapterSession::builder()
        .with_algorithm(algorithm)
        .with_derivation_rounds(rounds)
        .build()
        .expect("valid test session")
}

/// Session whose IVs and salts are all `byte`, for byte-exact comparisons.
#[allow(dead_code)]
pub fn fixed_session(algorithm: Algorithm, rounds: u32, byte: u8) -> AdapterSession {
    AdapterSession::builder()
        .with_algorithm(algorithm)
        .with_derivation_rounds(rounds)
        .with_random_source(FixedRandom(byte))
        .build()
        .expect("valid test session")
}
