//! In-process session holder.
//!
//! [`InMemoryGateway`] plays the privileged side of the connection: it keeps
//! each note's viewing key sealed under a session key, opens it on
//! `noteWithViewingKey`, and records access grants. The CLI demo runs
//! against it, and the test suites use its call log to assert exactly which
//! queries the core issued.
//!
//! Test hooks ([`InMemoryGateway::revoke_viewing_key`],
//! [`InMemoryGateway::set_status`], [`InMemoryGateway::set_offline`]) model
//! the remote side changing underneath a client.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use rand::RngCore;
use serde_json::Value;
use uuid::Uuid;

use crate::config::AES_KEY_LENGTH;
use crate::crypto::encryption::{self, EncryptionError};
use crate::note::{Account, Asset, MaterializedNote, NoteRecord, NoteStatus, ViewingKey};

use super::{
    ConnectionGateway, GatewayError, GrantNoteAccessRequest, GrantNoteAccessResponse,
    KeyOwner, NoteKeyMaterial, NoteWithViewingKeyRequest, NoteWithViewingKeyResponse, Operation,
};

/// One query as it reached the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayCall {
    pub operation: Operation,
    pub payload: Value,
}

/// A recorded access grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrant {
    pub address: String,
    pub granted_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct StoredNote {
    record: NoteRecord,
    grants: Vec<AccessGrant>,
}

/// Session holder backed by process memory.
pub struct InMemoryGateway {
    session_key: [u8; AES_KEY_LENGTH],
    notes: DashMap<String, StoredNote>,
    calls: Mutex<Vec<GatewayCall>>,
    offline: AtomicBool,
}

impl InMemoryGateway {
    /// A gateway with a fresh random session key.
    pub fn new() -> Self {
        let mut session_key = [0u8; AES_KEY_LENGTH];
        rand::rngs::OsRng.fill_bytes(&mut session_key);
        Self::with_session_key(session_key)
    }

    pub fn with_session_key(session_key: [u8; AES_KEY_LENGTH]) -> Self {
        Self {
            session_key,
            notes: DashMap::new(),
            calls: Mutex::new(Vec::new()),
            offline: AtomicBool::new(false),
        }
    }

    /// Register a note owned by `owner` in `asset` and return the record a
    /// client would receive for it.
    ///
    /// The record carries the sealed viewing key, the revealed value, the
    /// note hash and an `ACTIVE` status.
    pub fn register_note(
        &self,
        key: &ViewingKey,
        owner: &str,
        asset: &str,
    ) -> Result<NoteRecord, EncryptionError> {
        let id = Uuid::new_v4().to_string();
        let note = MaterializedNote::from_key(*key, owner);
        let sealed = encryption::seal_hex(&self.session_key, &key.to_bytes(), id.as_bytes())?;

        let record = NoteRecord {
            id: id.clone(),
            note_hash: Some(note.note_hash().to_hex()),
            value: Some(Value::from(key.value())),
            viewing_key: Some(sealed),
            owner: Some(Account {
                address: owner.to_string(),
            }),
            asset: Some(Asset {
                address: asset.to_string(),
                linked_token_address: None,
            }),
            status: Some(NoteStatus::Active),
        };

        tracing::debug!(note = %id, "registered note");
        self.notes.insert(
            id,
            StoredNote {
                record: record.clone(),
                grants: Vec::new(),
            },
        );
        Ok(record)
    }

    /// Store a record as-is. Its `viewingKey`, if any, must have been sealed
    /// under this gateway's session key for the record's id.
    pub fn insert_record(&self, record: NoteRecord) {
        self.notes.insert(
            record.id.clone(),
            StoredNote {
                record,
                grants: Vec::new(),
            },
        );
    }

    /// The current record for `id`, as a fresh fetch would return it.
    pub fn record(&self, id: &str) -> Option<NoteRecord> {
        self.notes.get(id).map(|entry| entry.record.clone())
    }

    pub fn set_status(&self, id: &str, status: NoteStatus) {
        if let Some(mut entry) = self.notes.get_mut(id) {
            entry.record.status = Some(status);
        }
    }

    /// Drop the sealed key so later `noteWithViewingKey` queries release
    /// no key material.
    pub fn revoke_viewing_key(&self, id: &str) {
        if let Some(mut entry) = self.notes.get_mut(id) {
            entry.record.viewing_key = None;
        }
    }

    /// While offline every query fails with a transport error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn grants(&self, id: &str) -> Vec<AccessGrant> {
        self.notes
            .get(id)
            .map(|entry| entry.grants.clone())
            .unwrap_or_default()
    }

    fn note_with_viewing_key(&self, payload: Value) -> Result<Option<Value>, GatewayError> {
        let request: NoteWithViewingKeyRequest =
            serde_json::from_value(payload).map_err(|e| GatewayError::MalformedPayload {
                operation: Operation::NoteWithViewingKey,
                reason: e.to_string(),
            })?;

        let Some(entry) = self.notes.get(&request.id) else {
            return Ok(None);
        };

        let decrypted_viewing_key = entry.record.viewing_key.as_deref().and_then(|sealed| {
            match encryption::open_hex(&self.session_key, sealed, request.id.as_bytes()) {
                Ok(bytes) => Some(format!("0x{}", hex::encode(bytes))),
                Err(e) => {
                    tracing::warn!(note = %request.id, error = %e, "sealed viewing key did not open");
                    None
                }
            }
        });

        let response = NoteWithViewingKeyResponse {
            note: Some(NoteKeyMaterial {
                decrypted_viewing_key,
                owner: entry.record.owner.as_ref().map(|owner| KeyOwner {
                    address: Some(owner.address.clone()),
                }),
            }),
        };
        Ok(Some(encode(Operation::NoteWithViewingKey, &response)?))
    }

    fn grant_note_access(&self, payload: Value) -> Result<Option<Value>, GatewayError> {
        let request: GrantNoteAccessRequest =
            serde_json::from_value(payload).map_err(|e| GatewayError::MalformedPayload {
                operation: Operation::GrantNoteAccess,
                reason: e.to_string(),
            })?;

        let Some(mut entry) = self.notes.get_mut(&request.id) else {
            return Ok(None);
        };

        let allowed = entry.record.status != Some(NoteStatus::Destroyed)
            && entry.record.viewing_key.is_some();

        if allowed {
            let granted_at = Utc::now();
            for address in request.addresses {
                if !entry.grants.iter().any(|g| g.address == address) {
                    entry.grants.push(AccessGrant {
                        address,
                        granted_at,
                    });
                }
            }
        } else {
            tracing::debug!(note = %request.id, "refusing grant on unshareable note");
        }

        let response = GrantNoteAccessResponse {
            success: Some(allowed),
        };
        Ok(Some(encode(Operation::GrantNoteAccess, &response)?))
    }
}

impl Default for InMemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

fn encode<T: serde::Serialize>(operation: Operation, value: &T) -> Result<Value, GatewayError> {
    serde_json::to_value(value).map_err(|e| GatewayError::Rejected {
        operation,
        reason: e.to_string(),
    })
}

#[async_trait]
impl ConnectionGateway for InMemoryGateway {
    async fn query(
        &self,
        operation: Operation,
        payload: Value,
    ) -> Result<Option<Value>, GatewayError> {
        self.calls.lock().push(GatewayCall {
            operation,
            payload: payload.clone(),
        });

        if self.offline.load(Ordering::SeqCst) {
            return Err(GatewayError::Transport("session holder offline".into()));
        }

        match operation {
            Operation::NoteWithViewingKey => self.note_with_viewing_key(payload),
            Operation::GrantNoteAccess => self.grant_note_access(payload),
        }
    }
}
