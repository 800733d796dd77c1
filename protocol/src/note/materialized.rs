//! The canonical cryptographic note handed to the prover.
//!
//! A [`MaterializedNote`] is always rebuilt from a decrypted viewing key and
//! an owner address. It is transient: produced per call, never cached, and
//! owned by whoever asked for it.

use std::fmt;

use ark_bn254::Fr;
use ark_std::rand::Rng;

use crate::config::{HEX_PREFIX, NOTE_HASH_DOMAIN, NOTE_HASH_LENGTH};
use crate::crypto::hash::domain_separated_hash;
use crate::zkp::commitment::{self, Commitment, PedersenParams};

use super::viewing_key::{ViewingKey, ViewingKeyError};

// ---------------------------------------------------------------------------
// NoteHash
// ---------------------------------------------------------------------------

/// Content-addressed identifier of a materialized note.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteHash([u8; NOTE_HASH_LENGTH]);

impl NoteHash {
    /// Derive the hash from a commitment's compressed bytes.
    pub fn of(commitment: &Commitment) -> Self {
        Self(domain_separated_hash(NOTE_HASH_DOMAIN, &commitment.to_bytes()))
    }

    pub fn as_bytes(&self) -> &[u8; NOTE_HASH_LENGTH] {
        &self.0
    }

    /// `0x`-prefixed lowercase hex, 66 characters.
    pub fn to_hex(&self) -> String {
        format!("{HEX_PREFIX}{}", hex::encode(self.0))
    }
}

impl fmt::Display for NoteHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for NoteHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NoteHash({})", self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// MaterializedNote
// ---------------------------------------------------------------------------

/// A note with its opening, commitment and hash.
///
/// Holds secret material (the blinding factor). `Debug` prints only the
/// value, owner and hash.
#[derive(Clone, PartialEq, Eq)]
pub struct MaterializedNote {
    key: ViewingKey,
    owner: String,
    commitment: Commitment,
    note_hash: NoteHash,
}

impl MaterializedNote {
    /// Build a note from a decrypted viewing key (hex) and owner address.
    pub fn from_viewing_key(viewing_key: &str, owner: &str) -> Result<Self, ViewingKeyError> {
        let key = ViewingKey::from_hex(viewing_key)?;
        Ok(Self::from_key(key, owner))
    }

    /// Build a note from an already parsed viewing key.
    pub fn from_key(key: ViewingKey, owner: impl Into<String>) -> Self {
        let commitment = commitment::commit(PedersenParams::canonical(), key.value(), key.blinding());
        let note_hash = NoteHash::of(&commitment);
        Self {
            key,
            owner: owner.into(),
            commitment,
            note_hash,
        }
    }

    /// A brand new note for `value` with a fresh blinding factor.
    pub fn create<R: Rng + ?Sized>(value: u64, owner: impl Into<String>, rng: &mut R) -> Self {
        Self::from_key(ViewingKey::random(value, rng), owner)
    }

    pub fn value(&self) -> u64 {
        self.key.value()
    }

    pub fn blinding(&self) -> Fr {
        self.key.blinding()
    }

    /// Owner address; empty when the session did not report one.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn commitment(&self) -> &Commitment {
        &self.commitment
    }

    pub fn note_hash(&self) -> NoteHash {
        self.note_hash
    }

    pub fn viewing_key(&self) -> ViewingKey {
        self.key
    }
}

impl fmt::Debug for MaterializedNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaterializedNote")
            .field("value", &self.value())
            .field("owner", &self.owner)
            .field("note_hash", &self.note_hash)
            .finish_non_exhaustive()
    }
}
