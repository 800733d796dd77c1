//! # Zero-Knowledge Proof Module
//!
//! The reference proving backend for comparison proofs: Groth16 over BN254.
//! Every note commits to its value twice under the same opening, once on
//! the curve (what its hash is derived from) and once in the scalar field
//! (what the circuit constrains).
//!
//! ## Architecture
//!
//! ```text
//! commitment.rs   - Pedersen commitment scheme (canonical params, commit, verify)
//! circuit.rs      - R1CS relation circuit (RangeRelationCircuit)
//! prover.rs       - Groth16 proof generation (LocalRangeProver, RangeProof)
//! verifier.rs     - Groth16 proof verification (RangeVerifier)
//! ```
//!
//! ## Security Model
//!
//! - **Commitment hiding**: information-theoretically hiding under DLOG.
//! - **Commitment binding**: computationally binding under DLOG on BN254/G1.
//! - **Soundness**: Groth16 knowledge-soundness in the generic group model.
//! - **Range check**: 64-bit decomposition with boolean enforcement on every
//!   limb, applied to the smaller operand and to the shifted remainder.
//!
//! The setup is local and per-process. A deployment that needs
//! third-party verifiable proofs should load keys from an MPC ceremony
//! instead of calling [`LocalRangeProver::setup`].

pub mod circuit;
pub mod commitment;
pub mod prover;
pub mod verifier;

pub use circuit::RangeRelationCircuit;
pub use commitment::{Commitment, PedersenParams};
pub use prover::{synthesize_remainder, LocalRangeProver, RangeProof};
pub use verifier::RangeVerifier;

/// Number of bits used for range checks. Covers the full `u64` value domain.
pub const RANGE_BITS: usize = 64;
