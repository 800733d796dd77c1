//! Decrypted viewing key codec.
//!
//! A decrypted viewing key is everything needed to rebuild a note's
//! commitment: the blinding factor and the value. On the wire it is
//! `0x`-prefixed hex of
//!
//! ```text
//! blinding (32 bytes, compressed Fr) || value (8 bytes, big-endian u64)
//! ```

use std::fmt;

use ark_bn254::Fr;
use ark_ff::UniformRand;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::rand::Rng;
use thiserror::Error;

use crate::config::{
    HEX_PREFIX, VIEWING_KEY_BLINDING_LENGTH, VIEWING_KEY_LENGTH, VIEWING_KEY_VALUE_LENGTH,
};

/// Reasons a decrypted viewing key fails to parse.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewingKeyError {
    #[error("viewing key is not valid hex")]
    InvalidHex,

    #[error("viewing key must be {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("viewing key blinding is not a canonical field element")]
    InvalidBlinding,
}

/// The plaintext opening of a note: `(value, blinding)`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ViewingKey {
    value: u64,
    blinding: Fr,
}

impl ViewingKey {
    pub fn new(value: u64, blinding: Fr) -> Self {
        Self { value, blinding }
    }

    /// A key for `value` with a fresh random blinding factor.
    pub fn random<R: Rng + ?Sized>(value: u64, rng: &mut R) -> Self {
        Self {
            value,
            blinding: Fr::rand(rng),
        }
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn blinding(&self) -> Fr {
        self.blinding
    }

    /// Encode to the fixed 40-byte layout.
    pub fn to_bytes(&self) -> [u8; VIEWING_KEY_LENGTH] {
        let mut out = [0u8; VIEWING_KEY_LENGTH];
        let mut blinding = Vec::with_capacity(VIEWING_KEY_BLINDING_LENGTH);
        // A BN254 scalar always compresses to exactly 32 bytes.
        self.blinding
            .serialize_compressed(&mut blinding)
            .expect("Fr serialization must not fail");
        out[..VIEWING_KEY_BLINDING_LENGTH].copy_from_slice(&blinding);
        out[VIEWING_KEY_BLINDING_LENGTH..].copy_from_slice(&self.value.to_be_bytes());
        out
    }

    /// Decode from the fixed 40-byte layout.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ViewingKeyError> {
        if bytes.len() != VIEWING_KEY_LENGTH {
            return Err(ViewingKeyError::InvalidLength {
                expected: VIEWING_KEY_LENGTH,
                got: bytes.len(),
            });
        }

        let (blinding_bytes, value_bytes) = bytes.split_at(VIEWING_KEY_BLINDING_LENGTH);
        let blinding = Fr::deserialize_compressed(blinding_bytes)
            .map_err(|_| ViewingKeyError::InvalidBlinding)?;

        let mut value = [0u8; VIEWING_KEY_VALUE_LENGTH];
        value.copy_from_slice(value_bytes);

        Ok(Self {
            value: u64::from_be_bytes(value),
            blinding,
        })
    }

    /// `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("{HEX_PREFIX}{}", hex::encode(self.to_bytes()))
    }

    /// Parse hex with or without the `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, ViewingKeyError> {
        let digits = s.strip_prefix(HEX_PREFIX).unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|_| ViewingKeyError::InvalidHex)?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Debug for ViewingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewingKey")
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn hex_round_trip_preserves_opening() {
        let mut rng = StdRng::seed_from_u64(7);
        let key = ViewingKey::random(1_234, &mut rng);

        let encoded = key.to_hex();
        assert!(encoded.starts_with("0x"));
        assert_eq!(encoded.len(), 2 + 2 * VIEWING_KEY_LENGTH);
        assert_eq!(ViewingKey::from_hex(&encoded).unwrap(), key);
    }

    #[test]
    fn value_is_big_endian_tail() {
        let key = ViewingKey::new(0x0102, Fr::from(5u64));
        let bytes = key.to_bytes();
        assert_eq!(&bytes[VIEWING_KEY_LENGTH - 2..], &[0x01, 0x02]);
    }

    #[test]
    fn prefix_is_optional() {
        let key = ViewingKey::new(9, Fr::from(11u64));
        let encoded = key.to_hex();
        assert_eq!(ViewingKey::from_hex(&encoded[2..]).unwrap(), key);
    }

    #[test]
    fn rejects_bad_hex() {
        assert_eq!(
            ViewingKey::from_hex("0xzz"),
            Err(ViewingKeyError::InvalidHex)
        );
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(
            ViewingKey::from_hex("0xabcd"),
            Err(ViewingKeyError::InvalidLength {
                expected: VIEWING_KEY_LENGTH,
                got: 2
            })
        );
    }

    #[test]
    fn rejects_non_canonical_blinding() {
        // All-ones exceeds the BN254 scalar modulus.
        let mut bytes = [0xffu8; VIEWING_KEY_LENGTH];
        bytes[VIEWING_KEY_BLINDING_LENGTH..].copy_from_slice(&5u64.to_be_bytes());
        assert_eq!(
            ViewingKey::from_bytes(&bytes),
            Err(ViewingKeyError::InvalidBlinding)
        );
    }

    #[test]
    fn debug_output_hides_blinding() {
        let key = ViewingKey::new(3, Fr::from(123_456_789u64));
        let rendered = format!("{key:?}");
        assert!(rendered.contains("value: 3"));
        assert!(!rendered.contains("blinding"));
    }
}
