//! # Groth16 Range Verification
//!
//! The verifier side of the comparison proof. A verifier sees only
//! commitments and the relation tag; it never learns a value.

use anyhow::{Context, Result};
use ark_bn254::Bn254;
use ark_groth16::{Groth16, VerifyingKey};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::SNARK;

use crate::proof::Relation;

use super::circuit;
use super::commitment::{Commitment, PedersenParams};
use super::prover::RangeProof;

/// Holds the Groth16 verification key for the relation circuit.
pub struct RangeVerifier {
    vk: VerifyingKey<Bn254>,
    params: PedersenParams,
}

impl RangeVerifier {
    pub(crate) fn from_vk(vk: VerifyingKey<Bn254>, params: PedersenParams) -> Self {
        Self { vk, params }
    }

    pub fn pedersen_params(&self) -> &PedersenParams {
        &self.params
    }

    /// Verify a proof against the statement it carries.
    pub fn verify(&self, proof: &RangeProof) -> Result<bool> {
        self.verify_statement(
            proof,
            proof.relation(),
            proof.original_commitment(),
            proof.comparison_commitment(),
            proof.remainder_note().commitment(),
        )
    }

    /// Verify a proof against an explicit statement.
    ///
    /// Returns `Ok(false)` when the proof does not attest this relation over
    /// these commitments.
    pub fn verify_statement(
        &self,
        proof: &RangeProof,
        relation: Relation,
        original: &Commitment,
        comparison: &Commitment,
        remainder: &Commitment,
    ) -> Result<bool> {
        let ark_proof = proof.to_ark_proof().context("failed to deserialize proof")?;
        let inputs = circuit::public_inputs(relation, original, comparison, remainder);

        let valid = Groth16::<Bn254>::verify(&self.vk, &inputs, &ark_proof)
            .context("Groth16 verification algorithm failed")?;

        tracing::debug!(%relation, valid, "range proof checked");
        Ok(valid)
    }

    pub fn vk_to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.vk
            .serialize_compressed(&mut buf)
            .expect("VK serialization must not fail");
        buf
    }

    pub fn vk_from_bytes(data: &[u8], params: PedersenParams) -> Result<Self> {
        let vk = VerifyingKey::<Bn254>::deserialize_compressed(data)
            .context("failed to deserialize verification key")?;
        Ok(Self { vk, params })
    }
}
