//! src/crypto/kdf/pbkdf2.rs

use crate::aliases::{DerivedKey, PasswordString};
use crate::consts::{PBKDF2_MAX_ROUNDS, PBKDF2_MIN_ROUNDS};
use crate::error::AdapterError;

use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::Sha256;

/// Derive `key_length_bits` of PBKDF2-HMAC-SHA256 key material.
///
/// Pure function of its inputs. CBC asks for 512 bits and splits the result into
/// an encryption key and an HMAC key; GCM asks for 256.
///
/// # Errors
///
/// [`AdapterError::Derivation`] when the round count is outside
/// [`PBKDF2_MIN_ROUNDS`]..=[`PBKDF2_MAX_ROUNDS`], the requested length is zero or
/// not a whole number of bytes, the password is empty, or the primitive fails.
#[inline]
pub fn derive_key(
    password: &PasswordString,
    salt: &[u8],
    rounds: u32,
    key_length_bits: usize,
) -> Result<DerivedKey, AdapterError> {
    if !(PBKDF2_MIN_ROUNDS..=PBKDF2_MAX_ROUNDS).contains(&rounds) {
        return Err(AdapterError::Derivation(format!(
            "PBKDF2 rounds must be within {PBKDF2_MIN_ROUNDS}..={PBKDF2_MAX_ROUNDS}, got {rounds}"
        )));
    }
    if key_length_bits == 0 || key_length_bits % 8 != 0 {
        return Err(AdapterError::Derivation(format!(
            "unsupported key length: {key_length_bits} bits"
        )));
    }
    if password.expose_secret().is_empty() {
        return Err(AdapterError::Derivation("empty password".into()));
    }

    let mut key = DerivedKey::new(vec![0u8; key_length_bits / 8]);
    pbkdf2::<Hmac<Sha256>>(
        password.expose_secret().as_bytes(),
        salt,
        rounds,
        key.expose_secret_mut(),
    )
    .map_err(|e| AdapterError::Derivation(format!("PBKDF2 failed: {e}")))?;

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pw(s: &str) -> PasswordString {
        PasswordString::new(s.to_string())
    }

    #[test]
    fn known_answer_single_round() {
        let key = derive_key(&pw("password"), b"salt", 1, 256).unwrap();
        assert_eq!(
            hex::encode(key.expose_secret()),
            "120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b"
        );
    }

    #[test]
    fn longer_output_extends_shorter() {
        let short = derive_key(&pw("pw"), &[0x11; 16], 10, 256).unwrap();
        let long = derive_key(&pw("pw"), &[0x11; 16], 10, 512).unwrap();
        assert_eq!(long.expose_secret().len(), 64);
        assert_eq!(&long.expose_secret()[..32], short.expose_secret().as_slice());
    }

    #[test]
    fn rejects_bad_parameters() {
        for (rounds, bits) in [(0, 256), (PBKDF2_MAX_ROUNDS + 1, 256), (1, 0), (1, 255)] {
            let err = derive_key(&pw("pw"), b"salt", rounds, bits).unwrap_err();
            assert!(matches!(err, AdapterError::Derivation(_)), "{rounds}/{bits}");
        }
        assert!(matches!(
            derive_key(&pw(""), b"salt", 1, 256),
            Err(AdapterError::Derivation(_))
        ));
    }
}
