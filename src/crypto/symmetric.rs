use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use hkdf::Hkdf;
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::{CallSdkError, Result};

pub const KEY_SIZE: usize = 32;
pub const NONCE_SIZE: usize = 24;

pub fn generate_random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

pub fn hkdf_expand_to_key(ikm: &[u8], info: &[u8]) -> Zeroizing<[u8; KEY_SIZE]> {
    let hkdf = Hkdf::<Sha256>::new(None, ikm);
    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    hkdf.expand(info, key.as_mut())
        .expect("HKDF expand should not fail with 32-byte output");
    key
}

/// Encrypt under an explicit nonce. The nonce is not part of the output;
/// the caller is responsible for never reusing it with the same key.
pub fn seal(key: &[u8; KEY_SIZE], nonce: &[u8; NONCE_SIZE], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = XChaCha20Poly1305::new_from_slice(key)
        .map_err(|e| CallSdkError::Encryption(format!("Failed to create cipher: {}", e)))?;

    cipher
        .encrypt(XNonce::from_slice(nonce), plaintext)
        .map_err(|e| CallSdkError::Encryption(format!("XChaCha20-Poly1305 failed: {}", e)))
}

/// Decrypt under an explicit nonce, mirroring [`seal`].
pub fn open(key: &[u8; KEY_SIZE], nonce: &[u8; NONCE_SIZE], ciphertext: &[u8]) -> Result<Vec<u8>> {
    let cipher = XChaCha20Poly1305::new_from_slice(key)
        .map_err(|e| CallSdkError::Decryption(format!("Failed to create cipher: {}", e)))?;

    cipher
        .decrypt(XNonce::from_slice(nonce), ciphertext)
        .map_err(|e| CallSdkError::Decryption(format!("XChaCha20-Poly1305 failed: {}", e)))
}

/// Encrypt under a fresh random nonce; output is `nonce || ciphertext`.
pub fn seal_prepended(key: &[u8; KEY_SIZE], plaintext: &[u8]) -> Result<Vec<u8>> {
    let nonce_bytes = generate_random_bytes(NONCE_SIZE);
    let mut nonce = [0u8; NONCE_SIZE];
    nonce.copy_from_slice(&nonce_bytes);

    let ciphertext = seal(key, &nonce, plaintext)?;

    let mut result = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    result.extend_from_slice(&nonce);
    result.extend_from_slice(&ciphertext);
    Ok(result)
}

/// Decrypt a `nonce || ciphertext` blob produced by [`seal_prepended`].
pub fn open_prepended(key: &[u8; KEY_SIZE], data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < NONCE_SIZE {
        return Err(CallSdkError::Decryption("Data too short".to_string()));
    }

    let (nonce_bytes, ciphertext) = data.split_at(NONCE_SIZE);
    let mut nonce = [0u8; NONCE_SIZE];
    nonce.copy_from_slice(nonce_bytes);

    open(key, &nonce, ciphertext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_open_round_trip() {
        let key = [7u8; KEY_SIZE];
        let nonce = [9u8; NONCE_SIZE];
        let plaintext = b"capture state update";

        let ciphertext = seal(&key, &nonce, plaintext).unwrap();
        let opened = open(&key, &nonce, &ciphertext).unwrap();
        assert_eq!(opened, plaintext);
    }

    #[test]
    fn open_rejects_tampered_ciphertext() {
        let key = [7u8; KEY_SIZE];
        let nonce = [9u8; NONCE_SIZE];

        let mut ciphertext = seal(&key, &nonce, b"payload").unwrap();
        ciphertext[0] ^= 0xff;

        assert!(matches!(
            open(&key, &nonce, &ciphertext),
            Err(CallSdkError::Decryption(_))
        ));
    }

    #[test]
    fn prepended_round_trip_and_short_input() {
        let key = [1u8; KEY_SIZE];

        let blob = seal_prepended(&key, b"hello").unwrap();
        assert_eq!(open_prepended(&key, &blob).unwrap(), b"hello");

        assert!(matches!(
            open_prepended(&key, &blob[..NONCE_SIZE - 1]),
            Err(CallSdkError::Decryption(_))
        ));
    }
}
