//! # Comparison Proofs
//!
//! The orchestration side of private range proofs. This module knows which
//! relation is being claimed and which notes take part; it does not know
//! how the proof is built. [`RangeProver`] is the seam: the reference
//! Groth16 implementation lives in [`crate::zkp::LocalRangeProver`], and
//! tests plug in doubles that record what they were asked for.
//!
//! ```text
//! relation.rs     - Relation tags and the remainder each one implies
//! request.rs      - CompareOptions, PrivateRangeRequest, RangeProver
//! orchestrator.rs - ProofOrchestrator: preconditions + dispatch
//! ```

pub mod orchestrator;
pub mod relation;
pub mod request;

pub use orchestrator::ProofOrchestrator;
pub use relation::Relation;
pub use request::{CompareOptions, PrivateRangeRequest, ProverError, RangeProver};
