//! The prover seam: request shape, error type and entry point trait.

use async_trait::async_trait;
use thiserror::Error;

use crate::note::{MaterializedNote, NoteInput};

use super::relation::Relation;

/// Optional arguments to a comparison.
#[derive(Debug, Clone, Default)]
pub struct CompareOptions {
    /// Proof sender. The prover substitutes its own default when `None`
    /// or empty.
    pub sender: Option<String>,
    /// Helper note that makes the equation exact. The prover synthesizes
    /// one when `None`; see [`Relation::remainder_value`] for the value it
    /// must carry.
    pub remainder_note: Option<NoteInput>,
}

impl CompareOptions {
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    pub fn with_remainder(mut self, remainder: impl Into<NoteInput>) -> Self {
        self.remainder_note = Some(remainder.into());
        self
    }
}

/// Normalized request handed to the prover.
///
/// The original note is always materialized. Comparison and remainder are
/// forwarded in whatever form the caller supplied them.
#[derive(Debug, Clone)]
pub struct PrivateRangeRequest {
    pub relation: Relation,
    pub original_note: MaterializedNote,
    pub comparison_note: NoteInput,
    pub remainder_note: Option<NoteInput>,
    pub sender: Option<String>,
}

/// Failures reported by a prover.
#[derive(Debug, Error)]
pub enum ProverError {
    /// The operand values do not satisfy the relation (or a supplied
    /// remainder carries the wrong value).
    #[error("relation {relation} does not hold: {reason}")]
    Unsatisfiable { relation: Relation, reason: String },

    /// A comparison or remainder operand could not be materialized.
    #[error("{role} note could not be materialized: {reason}")]
    Operand { role: &'static str, reason: String },

    /// The proving backend itself failed.
    #[error("proving backend failed: {0}")]
    Backend(String),
}

/// Range-proof construction entry point.
#[async_trait]
pub trait RangeProver: Send + Sync {
    /// The proof artifact this prover produces.
    type Proof: Send;

    async fn prove_private_range(
        &self,
        request: PrivateRangeRequest,
    ) -> Result<Self::Proof, ProverError>;
}
