//! # Connection Gateway
//!
//! The single channel through which this crate asks a privileged session
//! holder for secret material. Everything about transport (RPC, message
//! port, in-process call), retries and timeouts belongs to the
//! implementation; the core issues at most one query per operation and only
//! distinguishes "got a usable response" from "got nothing usable".
//!
//! ## Operations
//!
//! | Operation            | Payload             | Response                                          |
//! |----------------------|---------------------|---------------------------------------------------|
//! | `noteWithViewingKey` | `{id}`              | `{note: {decryptedViewingKey, owner: {address}}}` |
//! | `grantNoteAccess`    | `{id, addresses[]}` | `{success}`                                       |
//!
//! A transport error, an absent response, and a response that does not
//! decode are all collapsed into `None` by the typed helpers below, with a
//! `warn!` so the cause is not lost.

pub mod memory;

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{OP_GRANT_NOTE_ACCESS, OP_NOTE_WITH_VIEWING_KEY};

pub use memory::InMemoryGateway;

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Operations the core issues against the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Fetch the decrypted viewing key and owner of a note.
    #[serde(rename = "noteWithViewingKey")]
    NoteWithViewingKey,
    /// Share a note's viewing key with a list of addresses.
    #[serde(rename = "grantNoteAccess")]
    GrantNoteAccess,
}

impl Operation {
    /// Wire name of the operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::NoteWithViewingKey => OP_NOTE_WITH_VIEWING_KEY,
            Operation::GrantNoteAccess => OP_GRANT_NOTE_ACCESS,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures a gateway implementation may report.
///
/// The core never surfaces these to its callers; they are logged and
/// treated as an empty response.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The channel to the session holder is unavailable.
    #[error("gateway transport failed: {0}")]
    Transport(String),

    /// The session holder refused the request.
    #[error("gateway rejected {operation}: {reason}")]
    Rejected { operation: Operation, reason: String },

    /// The payload did not match the operation's request shape.
    #[error("malformed {operation} payload: {reason}")]
    MalformedPayload { operation: Operation, reason: String },
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Asynchronous request/response channel to the session holder.
///
/// Implementations should return `Ok(None)` when they have nothing for the
/// request (unknown note, revoked key) and reserve `Err` for failures of the
/// channel itself. The core treats both the same way.
#[async_trait]
pub trait ConnectionGateway: Send + Sync {
    async fn query(
        &self,
        operation: Operation,
        payload: serde_json::Value,
    ) -> Result<Option<serde_json::Value>, GatewayError>;
}

// ---------------------------------------------------------------------------
// Request / Response shapes
// ---------------------------------------------------------------------------

/// Payload of `noteWithViewingKey`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteWithViewingKeyRequest {
    pub id: String,
}

/// Response of `noteWithViewingKey`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteWithViewingKeyResponse {
    #[serde(default)]
    pub note: Option<NoteKeyMaterial>,
}

/// The secret half of a note as released by the session holder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteKeyMaterial {
    #[serde(default)]
    pub decrypted_viewing_key: Option<String>,
    #[serde(default)]
    pub owner: Option<KeyOwner>,
}

/// Owner block of released key material. Sessions may send `owner: {}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyOwner {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Payload of `grantNoteAccess`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantNoteAccessRequest {
    pub id: String,
    pub addresses: Vec<String>,
}

/// Response of `grantNoteAccess`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantNoteAccessResponse {
    #[serde(default)]
    pub success: Option<bool>,
}

// ---------------------------------------------------------------------------
// Typed helpers
// ---------------------------------------------------------------------------

/// Issue one typed query. Every failure mode collapses to `None`.
pub(crate) async fn query_typed<Req, Resp>(
    gateway: &dyn ConnectionGateway,
    operation: Operation,
    request: &Req,
) -> Option<Resp>
where
    Req: Serialize + ?Sized,
    Resp: DeserializeOwned,
{
    let payload = match serde_json::to_value(request) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(%operation, error = %e, "failed to encode gateway payload");
            return None;
        }
    };

    tracing::debug!(%operation, "dispatching gateway query");

    let response = match gateway.query(operation, payload).await {
        Ok(Some(response)) => response,
        Ok(None) => {
            tracing::debug!(%operation, "gateway returned no response");
            return None;
        }
        Err(e) => {
            tracing::warn!(%operation, error = %e, "gateway query failed");
            return None;
        }
    };

    match serde_json::from_value(response) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            tracing::warn!(%operation, error = %e, "gateway response did not decode");
            None
        }
    }
}

/// Fetch the key material for note `id`, if the session releases it.
pub async fn fetch_key_material(
    gateway: &dyn ConnectionGateway,
    id: &str,
) -> Option<NoteKeyMaterial> {
    let request = NoteWithViewingKeyRequest { id: id.to_string() };
    let response: NoteWithViewingKeyResponse =
        query_typed(gateway, Operation::NoteWithViewingKey, &request).await?;
    response.note
}

/// Ask the session to share note `id` with `addresses`.
pub async fn request_access_grant(
    gateway: &dyn ConnectionGateway,
    id: &str,
    addresses: Vec<String>,
) -> Option<GrantNoteAccessResponse> {
    let request = GrantNoteAccessRequest {
        id: id.to_string(),
        addresses,
    };
    query_typed(gateway, Operation::GrantNoteAccess, &request).await
}
