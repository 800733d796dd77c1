//! # Comparison Proof Orchestrator
//!
//! Coordinates one comparison proof:
//!
//! ```text
//! visible? ──no──► NotVisible            (no gateway, no prover)
//!    │yes
//! export original via gateway ──empty──► UpstreamEmpty   (no prover)
//!    │
//! PrivateRangeRequest { relation, original, comparison, remainder, sender }
//!    │
//! prover.prove_private_range ──► proof | ProverError
//! ```
//!
//! Stateless: each call is independent and may run concurrently with any
//! other. The orchestrator never computes remainder values; it only makes
//! sure the relation tag handed to the prover is the one the caller asked
//! for.
//!
//! Comparisons return `Result` only; `.ok()` is their fail-closed form,
//! matching `export` and `grant_access`.

use std::sync::Arc;

use crate::gateway::ConnectionGateway;
use crate::note::{NoteError, NoteIdentity, NoteInput};

use super::relation::Relation;
use super::request::{CompareOptions, PrivateRangeRequest, RangeProver};

/// Builds comparison proofs for notes against an injected gateway and
/// prover.
pub struct ProofOrchestrator<P> {
    gateway: Arc<dyn ConnectionGateway>,
    prover: Arc<P>,
}

impl<P> Clone for ProofOrchestrator<P> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            prover: Arc::clone(&self.prover),
        }
    }
}

impl<P: RangeProver> ProofOrchestrator<P> {
    pub fn new(gateway: Arc<dyn ConnectionGateway>, prover: Arc<P>) -> Self {
        Self { gateway, prover }
    }

    pub fn gateway(&self) -> &dyn ConnectionGateway {
        self.gateway.as_ref()
    }

    pub fn prover(&self) -> &P {
        &self.prover
    }

    /// Prove `relation` between `note` and `comparison`.
    pub async fn compare(
        &self,
        relation: Relation,
        note: &NoteIdentity,
        comparison: impl Into<NoteInput>,
        options: CompareOptions,
    ) -> Result<P::Proof, NoteError> {
        if !note.is_visible() {
            tracing::debug!(note = %note.id(), %relation, "comparison refused: note not visible");
            return Err(NoteError::NotVisible(note.id().to_string()));
        }

        // A key revoked between the visibility check and this fetch surfaces
        // as UpstreamEmpty; the prover never sees an empty original.
        let original_note = note.try_export(self.gateway()).await?;

        let request = PrivateRangeRequest {
            relation,
            original_note,
            comparison_note: comparison.into(),
            remainder_note: options.remainder_note,
            sender: options.sender,
        };

        tracing::debug!(
            note = %note.id(),
            %relation,
            comparison_materialized = request.comparison_note.is_materialized(),
            remainder_supplied = request.remainder_note.is_some(),
            "requesting range proof"
        );

        let proof = self.prover.prove_private_range(request).await?;
        tracing::info!(note = %note.id(), %relation, "range proof constructed");
        Ok(proof)
    }

    /// Prove the note's value equals the comparison note's.
    /// A supplied remainder must be worth zero.
    pub async fn equal(
        &self,
        note: &NoteIdentity,
        comparison: impl Into<NoteInput>,
        options: CompareOptions,
    ) -> Result<P::Proof, NoteError> {
        self.compare(Relation::Equal, note, comparison, options).await
    }

    /// Prove the note's value is strictly greater.
    /// A supplied remainder must be worth `note − comparison`.
    pub async fn greater_than(
        &self,
        note: &NoteIdentity,
        comparison: impl Into<NoteInput>,
        options: CompareOptions,
    ) -> Result<P::Proof, NoteError> {
        self.compare(Relation::GreaterThan, note, comparison, options)
            .await
    }

    /// Prove the note's value is strictly less.
    /// A supplied remainder must be worth `comparison − note`.
    pub async fn less_than(
        &self,
        note: &NoteIdentity,
        comparison: impl Into<NoteInput>,
        options: CompareOptions,
    ) -> Result<P::Proof, NoteError> {
        self.compare(Relation::LessThan, note, comparison, options).await
    }

    /// Prove the note's value is greater than or equal.
    /// A supplied remainder must be worth `note − comparison`.
    pub async fn greater_than_or_equal_to(
        &self,
        note: &NoteIdentity,
        comparison: impl Into<NoteInput>,
        options: CompareOptions,
    ) -> Result<P::Proof, NoteError> {
        self.compare(Relation::GreaterThanOrEqual, note, comparison, options)
            .await
    }

    /// Prove the note's value is less than or equal.
    /// A supplied remainder must be worth `comparison − note`.
    pub async fn less_than_or_equal_to(
        &self,
        note: &NoteIdentity,
        comparison: impl Into<NoteInput>,
        options: CompareOptions,
    ) -> Result<P::Proof, NoteError> {
        self.compare(Relation::LessThanOrEqual, note, comparison, options)
            .await
    }
}
