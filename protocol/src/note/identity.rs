//! # Note Identity
//!
//! The public, opaque view of a confidential note as the session holder
//! reports it. A [`NoteIdentity`] is built once from a flat [`NoteRecord`]
//! and never mutated; a changed note is a new identity built from a fresh
//! fetch.
//!
//! The session-local `id` is kept apart from the semantic fields. Those are
//! copied from a fixed set of recognized names; anything else on the record
//! is dropped during deserialization.

use serde::{Deserialize, Serialize};

use super::error::NoteError;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Lifecycle state reported by the protocol. This crate only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoteStatus {
    /// Created on chain, spendable.
    Active,
    /// Submitted but not yet confirmed.
    Pending,
    /// Consumed by a join-split; no longer spendable or shareable.
    Destroyed,
    /// Any state this client does not know about.
    #[serde(other)]
    Unknown,
}

/// An account reference as it appears on records and gateway responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: String,
}

/// The asset (zero-knowledge token contract) a note denominates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_token_address: Option<String>,
}

/// Flat note record as returned by the session holder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_hash: Option<String>,
    /// Left untyped on the wire: only a non-negative integer counts as a
    /// well-formed amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewing_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Account>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<Asset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NoteStatus>,
}

// ---------------------------------------------------------------------------
// NoteIdentity
// ---------------------------------------------------------------------------

/// The semantic fields of a note, without its session handle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteData {
    pub note_hash: Option<String>,
    pub value: Option<u64>,
    pub viewing_key: Option<String>,
    pub owner: Option<Account>,
    pub asset: Option<Asset>,
    pub status: Option<NoteStatus>,
}

/// Immutable view of a note plus its session-local handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteIdentity {
    id: String,
    data: NoteData,
}

impl NoteIdentity {
    pub fn new(id: impl Into<String>, data: NoteData) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Split a record into its handle and its recognized data fields.
    pub fn from_record(record: NoteRecord) -> Self {
        let NoteRecord {
            id,
            note_hash,
            value,
            viewing_key,
            owner,
            asset,
            status,
        } = record;

        Self {
            id,
            data: NoteData {
                note_hash,
                value: value.as_ref().and_then(serde_json::Value::as_u64),
                viewing_key,
                owner,
                asset,
                status,
            },
        }
    }

    /// Parse a JSON record. Unknown fields are ignored.
    pub fn from_json(json: &str) -> Result<Self, NoteError> {
        let record: NoteRecord = serde_json::from_str(json)
            .map_err(|e| NoteError::InvalidInput(format!("malformed note record: {e}")))?;
        Ok(Self::from_record(record))
    }

    /// Session-local handle, distinct from the note hash.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn data(&self) -> &NoteData {
        &self.data
    }

    pub fn note_hash(&self) -> Option<&str> {
        self.data.note_hash.as_deref()
    }

    pub fn value(&self) -> Option<u64> {
        self.data.value
    }

    pub fn viewing_key(&self) -> Option<&str> {
        self.data.viewing_key.as_deref()
    }

    pub fn owner(&self) -> Option<&Account> {
        self.data.owner.as_ref()
    }

    pub fn asset(&self) -> Option<&Asset> {
        self.data.asset.as_ref()
    }

    pub fn status(&self) -> Option<NoteStatus> {
        self.data.status
    }

    /// The value is a well-formed amount.
    pub fn is_valid(&self) -> bool {
        self.data.value.is_some()
    }

    /// A non-empty viewing key is present, so the value can be revealed.
    pub fn is_visible(&self) -> bool {
        self.data
            .viewing_key
            .as_deref()
            .is_some_and(|key| !key.is_empty())
    }

    pub fn is_destroyed(&self) -> bool {
        self.data.status == Some(NoteStatus::Destroyed)
    }
}

impl From<NoteRecord> for NoteIdentity {
    fn from(record: NoteRecord) -> Self {
        Self::from_record(record)
    }
}
