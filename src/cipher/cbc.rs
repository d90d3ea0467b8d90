//! src/cipher/cbc.rs
//! AES-256-CBC + HMAC-SHA256 strategy
//!
//! Key material: 512 bits of PBKDF2 output, split into the AES key (first 32
//! bytes) and the HMAC key (last 32 bytes). The HMAC covers `iv ‖ ciphertext`
//! and is verified in constant time before any block is decrypted.

use crate::aliases::{Aes256Key32, Block16, HmacKey32, HmacSha256, PasswordString};
use crate::cipher::{decode_content, decode_hex_component, encode_content};
use crate::cipher::{Algorithm, CipherStrategy};
use crate::consts::{AES_KEY_SIZE, CBC_IV_SIZE, CBC_KEY_MATERIAL_BITS, HMAC_TAG_SIZE};
use crate::crypto::kdf::pbkdf2::derive_key;
use crate::error::AdapterError;
use crate::packer::EncryptedRecord;
use crate::utils::{pkcs7_pad, pkcs7_unpad, xor_blocks};
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes256Dec, Aes256Enc, Block as AesBlock};
use hmac::Mac;

/// AES-256-CBC with HMAC-SHA256 authentication.
#[derive(Debug, Clone, Copy, Default)]
pub struct CbcStrategy;

impl CipherStrategy for CbcStrategy {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Cbc
    }

    fn iv_size(&self) -> usize {
        CBC_IV_SIZE
    }

    fn encrypt_with_params(
        &self,
        plaintext: &[u8],
        password: &PasswordString,
        rounds: u32,
        iv: &[u8],
        salt: &[u8],
    ) -> Result<EncryptedRecord, AdapterError> {
        if iv.len() != CBC_IV_SIZE {
            return Err(AdapterError::Crypto(format!(
                "CBC IV must be {CBC_IV_SIZE} bytes, got {}",
                iv.len()
            )));
        }

        let (enc_key, mac_key) = derive_cbc_keys(password, salt, rounds)?;
        let ciphertext = cbc_encrypt(&enc_key, iv, plaintext);

        let mut mac = new_mac(&mac_key)?;
        mac.update(iv);
        mac.update(&ciphertext);
        let tag = mac.finalize().into_bytes();

        Ok(EncryptedRecord {
            content: encode_content(&ciphertext),
            iv: hex::encode(iv),
            salt: hex::encode(salt),
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
        if iv.len() != CBC_IV_SIZE {
            return Err(AdapterError::Authentication(format!(
                "IV length {} does not match AES-256-CBC",
                iv.len()
            )));
        }
        let expected_tag = decode_hex_component("authTag", &record.auth_tag)?;
        if expected_tag.len() != HMAC_TAG_SIZE {
            return Err(AdapterError::Authentication(format!(
                "authentication tag length {} does not match HMAC-SHA256",
                expected_tag.len()
            )));
        }
        let salt = decode_hex_component("salt", &record.salt)?;
        let ciphertext = decode_content(&record.content)?;

        let (enc_key, mac_key) = derive_cbc_keys(password, &salt, record.rounds)?;

        let mut mac = new_mac(&mac_key)?;
        mac.update(&iv);
        mac.update(&ciphertext);
        mac.verify_slice(&expected_tag).map_err(|_| {
            AdapterError::Authentication(
                "HMAC mismatch: wrong password, tampered or non-CBC record".into(),
            )
        })?;

        if ciphertext.is_empty() || ciphertext.len() % 16 != 0 {
            return Err(AdapterError::Format(
                "CBC ciphertext is not a whole number of blocks".into(),
            ));
        }

        let mut plaintext = cbc_decrypt(&enc_key, &iv, &ciphertext);
        pkcs7_unpad(&mut plaintext)?;
        Ok(plaintext)
    }
}

/// Derive and split the CBC key material into encryption and HMAC keys.
fn derive_cbc_keys(
    password: &PasswordString,
    salt: &[u8],
    rounds: u32,
) -> Result<(Aes256Key32, HmacKey32), AdapterError> {
    let material = derive_key(password, salt, rounds, CBC_KEY_MATERIAL_BITS)?;
    let bytes = material.expose_secret();

    let mut enc_key = Aes256Key32::new([0u8; 32]);
    enc_key
        .expose_secret_mut()
        .copy_from_slice(&bytes[..AES_KEY_SIZE]);

    let mut mac_key = HmacKey32::new([0u8; 32]);
    mac_key
        .expose_secret_mut()
        .copy_from_slice(&bytes[AES_KEY_SIZE..]);

    Ok((enc_key, mac_key))
}

#[inline]
fn new_mac(mac_key: &HmacKey32) -> Result<HmacSha256, AdapterError> {
    <HmacSha256 as Mac>::new_from_slice(mac_key.expose_secret())
        .map_err(|e| AdapterError::Crypto(format!("HMAC key rejected: {e}")))
}

fn cbc_encrypt(key: &Aes256Key32, iv: &[u8], plaintext: &[u8]) -> Vec<u8> {
    let cipher = Aes256Enc::new(key.expose_secret().into());
    let padded = pkcs7_pad(plaintext);

    let mut output = Vec::with_capacity(padded.len());
    let mut prev_block = [0u8; 16];
    prev_block.copy_from_slice(iv);
    let mut xor_output = Block16::new([0u8; 16]);

    for chunk in padded.chunks_exact(16) {
        xor_blocks(chunk, &prev_block, xor_output.expose_secret_mut());
        let mut aes_block = AesBlock::from(*xor_output.expose_secret());
        cipher.encrypt_block(&mut aes_block);
        prev_block.copy_from_slice(aes_block.as_slice());
        output.extend_from_slice(&prev_block);
    }

    output
}

fn cbc_decrypt(key: &Aes256Key32, iv: &[u8], ciphertext: &[u8]) -> Vec<u8> {
    let cipher = Aes256Dec::new(key.expose_secret().into());

    let mut output = Vec::with_capacity(ciphertext.len());
    let mut prev_block = [0u8; 16];
    prev_block.copy_from_slice(iv);
    let mut plaintext_block = Block16::new([0u8; 16]);

    for chunk in ciphertext.chunks_exact(16) {
        let mut aes_block = *AesBlock::from_slice(chunk);
        cipher.decrypt_block(&mut aes_block);
        xor_blocks(
            aes_block.as_slice(),
            &prev_block,
            plaintext_block.expose_secret_mut(),
        );
        output.extend_from_slice(plaintext_block.expose_secret());
        prev_block.copy_from_slice(chunk);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn password() -> PasswordString {
        PasswordString::new("test".to_string())
    }

    #[test]
    fn deterministic_with_fixed_params() {
        let a = CbcStrategy
            .encrypt_with_params(b"hello", &password(), 10, &[1; 16], &[2; 16])
            .unwrap();
        let b = CbcStrategy
            .encrypt_with_params(b"hello", &password(), 10, &[1; 16], &[2; 16])
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.iv, "01".repeat(16));
        assert_eq!(a.salt, "02".repeat(16));
        assert_eq!(a.auth_tag.len(), HMAC_TAG_SIZE * 2);
        assert_eq!(CbcStrategy.decrypt(&a, &password()).unwrap(), b"hello");
    }

    #[test]
    fn ciphertext_is_padded_to_blocks() {
        for (len, blocks) in [(0usize, 1usize), (15, 1), (16, 2), (17, 2)] {
            let record = CbcStrategy
                .encrypt_with_params(&vec![0x41; len], &password(), 1, &[0; 16], &[0; 16])
                .unwrap();
            assert_eq!(decode_content(&record.content).unwrap().len(), blocks * 16);
        }
    }

    #[test]
    fn rejects_wrong_iv_length_on_encrypt() {
        let err = CbcStrategy
            .encrypt_with_params(b"x", &password(), 1, &[0; 12], &[0; 16])
            .unwrap_err();
        assert!(matches!(err, AdapterError::Crypto(_)));
    }

    #[test]
    fn short_iv_on_decrypt_is_authentication_failure() {
        let mut record = CbcStrategy
            .encrypt_with_params(b"x", &password(), 1, &[0; 16], &[0; 16])
            .unwrap();
        record.iv = "00".repeat(12);
        assert!(CbcStrategy
            .decrypt(&record, &password())
            .unwrap_err()
            .is_authentication());
    }
}
