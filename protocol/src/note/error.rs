//! Result kinds for note operations.
//!
//! Every public note operation returns `Result<_, NoteError>`. The variants
//! are a closed set so callers can tell "not allowed" apart from "the remote
//! side had nothing". Callers that only care whether something came back
//! can use the fail-closed wrappers ([`super::NoteIdentity::export`],
//! [`super::NoteIdentity::grant_access`]) or `Result::ok`.

use thiserror::Error;

use crate::gateway::Operation;
use crate::proof::ProverError;

/// Why a note operation produced no value.
#[derive(Debug, Error)]
pub enum NoteError {
    /// The note carries no viewing key, so nothing about it can be proved
    /// or shared.
    #[error("note {0} is not visible")]
    NotVisible(String),

    /// The note has been consumed and accepts no new access grants.
    #[error("note {0} is destroyed")]
    Destroyed(String),

    /// The connection gateway returned nothing usable (no response, a
    /// transport failure, or a response missing the required field).
    #[error("connection gateway returned no usable {operation} response")]
    UpstreamEmpty {
        /// The operation that came back empty.
        operation: Operation,
    },

    /// An argument or record could not be turned into a note operand.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The prover refused or failed to build the proof.
    #[error("proof construction failed: {0}")]
    Prover(#[from] ProverError),
}

impl NoteError {
    /// True for failures decided locally, before any remote call.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            NoteError::NotVisible(_) | NoteError::Destroyed(_) | NoteError::InvalidInput(_)
        )
    }

    /// True when a remote collaborator had nothing usable to give.
    pub fn is_upstream(&self) -> bool {
        matches!(self, NoteError::UpstreamEmpty { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_is_disjoint() {
        let cases = [
            NoteError::NotVisible("n".into()),
            NoteError::Destroyed("n".into()),
            NoteError::InvalidInput("bad".into()),
            NoteError::UpstreamEmpty {
                operation: Operation::NoteWithViewingKey,
            },
            NoteError::Prover(ProverError::Backend("boom".into())),
        ];

        for err in &cases {
            assert!(!(err.is_precondition() && err.is_upstream()), "{err}");
        }
        assert!(cases[0].is_precondition());
        assert!(cases[3].is_upstream());
        assert!(!cases[4].is_precondition() && !cases[4].is_upstream());
    }

    #[test]
    fn upstream_message_names_operation() {
        let err = NoteError::UpstreamEmpty {
            operation: Operation::GrantNoteAccess,
        };
        assert!(err.to_string().contains("grantNoteAccess"));
    }
}
