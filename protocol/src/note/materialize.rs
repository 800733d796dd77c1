//! # Note Materializer
//!
//! Turns whatever the caller holds into the single form the prover
//! accepts. Two inputs are accepted for every operand:
//!
//! - [`NoteInput::Materialized`] - already canonical, passed through.
//! - [`NoteInput::Proxy`] - a [`NoteIdentity`]; it must be valid and
//!   visible, and is exported through the connection gateway.
//!
//! Export is never cached here. Two exports against an unchanged session
//! yield equal notes; a session whose key material changed in between
//! yields different ones.

use crate::gateway::{self, ConnectionGateway, Operation};

use super::error::NoteError;
use super::identity::NoteIdentity;
use super::materialized::MaterializedNote;

/// A note operand in either accepted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteInput {
    Proxy(NoteIdentity),
    Materialized(MaterializedNote),
}

impl NoteInput {
    pub fn is_materialized(&self) -> bool {
        matches!(self, NoteInput::Materialized(_))
    }
}

impl From<NoteIdentity> for NoteInput {
    fn from(note: NoteIdentity) -> Self {
        NoteInput::Proxy(note)
    }
}

impl From<&NoteIdentity> for NoteInput {
    fn from(note: &NoteIdentity) -> Self {
        NoteInput::Proxy(note.clone())
    }
}

impl From<MaterializedNote> for NoteInput {
    fn from(note: MaterializedNote) -> Self {
        NoteInput::Materialized(note)
    }
}

impl From<&MaterializedNote> for NoteInput {
    fn from(note: &MaterializedNote) -> Self {
        NoteInput::Materialized(note.clone())
    }
}

impl NoteIdentity {
    /// Export this note for use in proofs.
    ///
    /// Issues exactly one `noteWithViewingKey` query when the note is
    /// visible, and none otherwise. The materialized note is built from
    /// the released `decryptedViewingKey` and `owner.address` (empty when
    /// the session reports no owner).
    pub async fn try_export(
        &self,
        gateway: &dyn ConnectionGateway,
    ) -> Result<MaterializedNote, NoteError> {
        if !self.is_visible() {
            tracing::debug!(note = %self.id(), "export refused: note not visible");
            return Err(NoteError::NotVisible(self.id().to_string()));
        }

        let upstream_empty = || NoteError::UpstreamEmpty {
            operation: Operation::NoteWithViewingKey,
        };

        let material = gateway::fetch_key_material(gateway, self.id())
            .await
            .ok_or_else(upstream_empty)?;

        let viewing_key = material
            .decrypted_viewing_key
            .filter(|key| !key.is_empty())
            .ok_or_else(upstream_empty)?;

        let owner = material
            .owner
            .and_then(|owner| owner.address)
            .unwrap_or_default();

        MaterializedNote::from_viewing_key(&viewing_key, &owner).map_err(|e| {
            tracing::warn!(note = %self.id(), error = %e, "released viewing key is malformed");
            NoteError::InvalidInput(format!("viewing key for note {}: {e}", self.id()))
        })
    }

    /// Fail-closed [`NoteIdentity::try_export`]: `None` whatever the cause.
    pub async fn export(&self, gateway: &dyn ConnectionGateway) -> Option<MaterializedNote> {
        self.try_export(gateway).await.ok()
    }
}

/// Resolve an operand to its materialized form.
///
/// A proxy must carry a well-formed value before it is exported.
pub async fn resolve(
    input: &NoteInput,
    gateway: &dyn ConnectionGateway,
) -> Result<MaterializedNote, NoteError> {
    match input {
        NoteInput::Materialized(note) => Ok(note.clone()),
        NoteInput::Proxy(identity) => {
            if !identity.is_valid() {
                return Err(NoteError::InvalidInput(format!(
                    "note {} has no well-formed value",
                    identity.id()
                )));
            }
            identity.try_export(gateway).await
        }
    }
}
