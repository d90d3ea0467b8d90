//! Utility functions used across the library.

use crate::error::AdapterError;

/// XORs two 16-byte blocks and writes the result to `output`.
///
/// Used by the CBC chaining loops in both directions.
///
/// # Panics (by contract)
///
/// Panics if any of the three slices is shorter than 16 bytes. All callers pass
/// AES blocks or [`Block16`](crate::aliases::Block16) contents.
#[inline(always)]
pub const fn xor_blocks(block_a: &[u8], block_b: &[u8], output: &mut [u8]) {
    let mut i = 0;
    while i < 16 {
        output[i] = block_a[i] ^ block_b[i];
        i += 1;
    }
}

/// Appends PKCS#7 padding for a 16-byte block cipher.
///
/// A full block of padding is added when the input is already block aligned.
#[inline]
pub fn pkcs7_pad(data: &[u8]) -> Vec<u8> {
    let pad = 16 - (data.len() % 16);
    let mut out = Vec::with_capacity(data.len() + pad);
    out.extend_from_slice(data);
    out.resize(data.len() + pad, pad as u8);
    out
}

/// Strips PKCS#7 padding in place.
///
/// Only ever called on plaintext whose ciphertext already passed HMAC
/// verification, so a bad pad means a defective producer rather than an attacker.
pub fn pkcs7_unpad(data: &mut Vec<u8>) -> Result<(), AdapterError> {
    let padding = match data.last() {
        Some(&p) => p as usize,
        None => return Err(AdapterError::Format("empty CBC plaintext".into())),
    };

    if padding == 0 || padding > 16 || padding > data.len() {
        return Err(AdapterError::Format("invalid PKCS#7 padding".into()));
    }

    let start = data.len() - padding;
    if data[start..].iter().any(|&b| b as usize != padding) {
        return Err(AdapterError::Format("corrupt PKCS#7 padding".into()));
    }

    data.truncate(start);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xor_is_self_inverse() {
        let a = [0xAAu8; 16];
        let b: [u8; 16] = core::array::from_fn(|i| i as u8);
        let mut x = [0u8; 16];
        let mut back = [0u8; 16];
        xor_blocks(&a, &b, &mut x);
        xor_blocks(&x, &b, &mut back);
        assert_eq!(back, a);
    }

    #[test]
    fn pad_adds_full_block_when_aligned() {
        let padded = pkcs7_pad(&[7u8; 16]);
        assert_eq!(padded.len(), 32);
        assert!(padded[16..].iter().all(|&b| b == 16));
    }

    #[test]
    fn pad_then_unpad() {
        for len in 0..40 {
            let data: Vec<u8> = (0..len as u8).collect();
            let mut padded = pkcs7_pad(&data);
            assert_eq!(padded.len() % 16, 0);
            pkcs7_unpad(&mut padded).unwrap();
            assert_eq!(padded, data);
        }
    }

    #[test]
    fn unpad_rejects_garbage() {
        let mut zero = vec![1u8, 2, 3, 0];
        assert!(matches!(pkcs7_unpad(&mut zero), Err(AdapterError::Format(_))));

        let mut mixed = vec![9u8; 14];
        mixed.extend_from_slice(&[3, 2]);
        assert!(matches!(pkcs7_unpad(&mut mixed), Err(AdapterError::Format(_))));

        let mut empty = Vec::new();
        assert!(pkcs7_unpad(&mut empty).is_err());
    }
}
