//! src/cipher/gcm.rs
//! AES-256-GCM strategy
//!
//! 256 bits of PBKDF2 output key the AEAD directly. The encoded IV and salt are
//! bound as associated data, so neither can be swapped without the tag failing.

use crate::aliases::{Aes256Key32, PasswordString};
use crate::cipher::{decode_content, decode_hex_component, encode_content};
use crate::cipher::{Algorithm, CipherStrategy};
use crate::consts::{AES_KEY_SIZE, GCM_KEY_MATERIAL_BITS, GCM_NONCE_SIZE, GCM_TAG_SIZE};
use crate::crypto::kdf::pbkdf2::derive_key;
use crate::error::AdapterError;
use crate::packer::EncryptedRecord;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};

/// AES-256-GCM with its integrated authentication tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct GcmStrategy;

impl CipherStrategy for GcmStrategy {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Gcm
    }

    fn iv_size(&self) -> usize {
        GCM_NONCE_SIZE
    }

    fn encrypt_with_params(
        &self,
        plaintext: &[u8],
        password: &PasswordString,
        rounds: u32,
        iv: &[u8],
        salt: &[u8],
    ) -> Result<EncryptedRecord, AdapterError> {
        if iv.len() != GCM_NONCE_SIZE {
            return Err(AdapterError::Crypto(format!(
                "GCM nonce must be {GCM_NONCE_SIZE} bytes, got {}",
                iv.len()
            )));
        }

        let iv_hex = hex::encode(iv);
        let salt_hex = hex::encode(salt);

        let cipher = new_cipher(password, salt, rounds)?;
        let mut buffer = plaintext.to_vec();
        let tag = cipher
            .encrypt_in_place_detached(
                Nonce::from_slice(iv),
                &associated_data(&iv_hex, &salt_hex),
                &mut buffer,
            )
            .map_err(|e| AdapterError::Crypto(format!("AES-GCM encryption failed: {e}")))?;

        Ok(EncryptedRecord {
            content: encode_content(&buffer),
            iv: iv_hex,
            salt: salt_hex,
            auth_tag: hex::encode(tag),
            rounds,
        })
    }

    fn decrypt(
        &self,
        record: &EncryptedRecord,
        password: &PasswordString,
    ) -> Result<Vec<u8>, AdapterError> {
        let iv = decode_hex_component("iv", &record.iv)?;
        if iv.len() != GCM_NONCE_SIZE {
            return Err(AdapterError::Authentication(format!(
                "nonce length {} does not match AES-256-GCM",
                iv.len()
            )));
        }
        let tag = decode_hex_component("authTag", &record.auth_tag)?;
        if tag.len() != GCM_TAG_SIZE {
            return Err(AdapterError::Authentication(format!(
                "authentication tag length {} does not match AES-256-GCM",
                tag.len()
            )));
        }
        let salt = decode_hex_component("salt", &record.salt)?;
        let mut buffer = decode_content(&record.content)?;

        let cipher = new_cipher(password, &salt, record.rounds)?;
        cipher
            .decrypt_in_place_detached(
                Nonce::from_slice(&iv),
                &associated_data(&record.iv, &record.salt),
                &mut buffer,
                GenericArray::from_slice(&tag),
            )
            .map_err(|_| {
                AdapterError::Authentication(
                    "GCM tag mismatch: wrong password, tampered or non-GCM record".into(),
                )
            })?;

        Ok(buffer)
    }
}

fn new_cipher(
    password: &PasswordString,
    salt: &[u8],
    rounds: u32,
) -> Result<Aes256Gcm, AdapterError> {
    let material = derive_key(password, salt, rounds, GCM_KEY_MATERIAL_BITS)?;
    let mut key = Aes256Key32::new([0u8; 32]);
    key.expose_secret_mut()
        .copy_from_slice(&material.expose_secret()[..AES_KEY_SIZE]);

    Aes256Gcm::new_from_slice(key.expose_secret())
        .map_err(|e| AdapterError::Crypto(format!("AES-GCM key rejected: {e}")))
}

// Associated data is the IV and salt exactly as they appear on the wire.
#[inline]
fn associated_data(iv: &str, salt: &str) -> Vec<u8> {
    let mut aad = Vec::with_capacity(iv.len() + salt.len());
    aad.extend_from_slice(iv.as_bytes());
    aad.extend_from_slice(salt.as_bytes());
    aad
}
