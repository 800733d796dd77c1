//! # AES-256-GCM Sealing of Viewing Keys
//!
//! A note record never carries its viewing key in the clear. The session
//! holder seals the decrypted key under its session key and hands clients
//! the sealed form; only a `noteWithViewingKey` round trip through the
//! connection gateway turns it back into usable key material.
//!
//! ## Wire format
//!
//! Binary: `nonce (12 bytes) || ciphertext || tag (16 bytes)`.
//! On records the sealed blob is rendered as `0x`-prefixed lowercase hex.
//!
//! The note id is bound as additional authenticated data, so a sealed key
//! copied onto a different record fails to open.

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use rand::RngCore;
use thiserror::Error;

use crate::config::{AES_KEY_LENGTH, AES_NONCE_LENGTH, HEX_PREFIX};

/// Errors that can occur while sealing or opening a viewing key.
///
/// Deliberately coarse: callers learn that opening failed, not why.
#[derive(Debug, Error)]
pub enum EncryptionError {
    #[error("encryption failed")]
    EncryptFailed,

    #[error("decryption failed -- wrong key or corrupted ciphertext")]
    DecryptFailed,

    #[error("ciphertext too short: must be at least {AES_NONCE_LENGTH} bytes")]
    CiphertextTooShort,

    #[error("sealed payload is not valid hex")]
    InvalidEncoding,
}

/// Encrypt `plaintext` under `key`, authenticating `aad`.
///
/// Returns `nonce || ciphertext` with a fresh random 96-bit nonce.
pub fn encrypt(
    key: &[u8; AES_KEY_LENGTH],
    plaintext: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>, EncryptionError> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| EncryptionError::EncryptFailed)?;

    let mut nonce_bytes = [0u8; AES_NONCE_LENGTH];
    rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(
            nonce,
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|_| EncryptionError::EncryptFailed)?;

    let mut out = Vec::with_capacity(AES_NONCE_LENGTH + ciphertext.len());
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypt data produced by [`encrypt`] with the same key and `aad`.
pub fn decrypt(
    key: &[u8; AES_KEY_LENGTH],
    data: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>, EncryptionError> {
    if data.len() < AES_NONCE_LENGTH {
        return Err(EncryptionError::CiphertextTooShort);
    }

    let (nonce_bytes, ciphertext) = data.split_at(AES_NONCE_LENGTH);
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| EncryptionError::DecryptFailed)?;
    let nonce = Nonce::from_slice(nonce_bytes);

    cipher
        .decrypt(
            nonce,
            Payload {
                msg: ciphertext,
                aad,
            },
        )
        .map_err(|_| EncryptionError::DecryptFailed)
}

/// Seal `plaintext` and render it as `0x`-prefixed hex.
pub fn seal_hex(
    key: &[u8; AES_KEY_LENGTH],
    plaintext: &[u8],
    aad: &[u8],
) -> Result<String, EncryptionError> {
    let sealed = encrypt(key, plaintext, aad)?;
    Ok(format!("{HEX_PREFIX}{}", hex::encode(sealed)))
}

/// Open a blob produced by [`seal_hex`]. The `0x` prefix is optional.
pub fn open_hex(
    key: &[u8; AES_KEY_LENGTH],
    sealed: &str,
    aad: &[u8],
) -> Result<Vec<u8>, EncryptionError> {
    let digits = sealed.strip_prefix(HEX_PREFIX).unwrap_or(sealed);
    let data = hex::decode(digits).map_err(|_| EncryptionError::InvalidEncoding)?;
    decrypt(key, &data, aad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AES_TAG_LENGTH;

    fn test_key() -> [u8; 32] {
        let mut key = [0u8; 32];
        for (i, byte) in key.iter_mut().enumerate() {
            *byte = i as u8;
        }
        key
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let key = test_key();
        let sealed = encrypt(&key, b"viewing key bytes", b"note-1").unwrap();
        let recovered = decrypt(&key, &sealed, b"note-1").unwrap();
        assert_eq!(recovered, b"viewing key bytes");
    }

    #[test]
    fn ciphertext_length() {
        let key = test_key();
        let plaintext = [7u8; 40];
        let sealed = encrypt(&key, &plaintext, b"").unwrap();
        assert_eq!(sealed.len(), AES_NONCE_LENGTH + plaintext.len() + AES_TAG_LENGTH);
    }

    #[test]
    fn wrong_key_fails() {
        let key = test_key();
        let sealed = encrypt(&key, b"secret", b"note-1").unwrap();

        let mut wrong_key = test_key();
        wrong_key[0] ^= 0xFF;
        assert!(decrypt(&wrong_key, &sealed, b"note-1").is_err());
    }

    #[test]
    fn key_moved_to_another_note_fails() {
        let key = test_key();
        let sealed = encrypt(&key, b"secret", b"note-1").unwrap();
        assert!(matches!(
            decrypt(&key, &sealed, b"note-2"),
            Err(EncryptionError::DecryptFailed)
        ));
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let key = test_key();
        let mut sealed = encrypt(&key, b"secret", b"").unwrap();
        sealed[AES_NONCE_LENGTH] ^= 0x01;
        assert!(decrypt(&key, &sealed, b"").is_err());
    }

    #[test]
    fn too_short_is_rejected() {
        let key = test_key();
        assert!(matches!(
            decrypt(&key, &[0u8; 4], b""),
            Err(EncryptionError::CiphertextTooShort)
        ));
    }

    #[test]
    fn nonces_are_fresh() {
        let key = test_key();
        let a = encrypt(&key, b"same", b"").unwrap();
        let b = encrypt(&key, b"same", b"").unwrap();
        assert_ne!(&a[..AES_NONCE_LENGTH], &b[..AES_NONCE_LENGTH]);
    }

    #[test]
    fn hex_seal_has_prefix_and_opens() {
        let key = test_key();
        let sealed = seal_hex(&key, b"abc", b"note-9").unwrap();
        assert!(sealed.starts_with("0x"));
        assert_eq!(open_hex(&key, &sealed, b"note-9").unwrap(), b"abc");
        // Prefix is optional on the way in.
        assert_eq!(open_hex(&key, &sealed[2..], b"note-9").unwrap(), b"abc");
    }

    #[test]
    fn hex_open_rejects_garbage() {
        let key = test_key();
        assert!(matches!(
            open_hex(&key, "0xnot-hex", b""),
            Err(EncryptionError::InvalidEncoding)
        ));
    }
}
