//! # Groth16 Range Prover
//!
//! [`LocalRangeProver`] is the reference [`RangeProver`]: it runs the
//! relation circuit locally. The workflow is:
//!
//! 1. **Setup**: `LocalRangeProver::setup(rng, gateway, sender)` once. This
//!    produces the proving key and a [`RangeVerifier`] holding the matching
//!    verification key. Both are bound to the canonical Pedersen generators.
//!
//! 2. **Prove**: each request resolves its comparison (and remainder, if one
//!    was supplied) through the gateway, synthesizes a remainder otherwise,
//!    checks the witness against the circuit and invokes `Groth16::prove`.
//!
//! 3. The resulting [`RangeProof`] carries the compressed proof bytes and
//!    every public value a verifier needs.

use std::sync::Arc;

use anyhow::Context;
use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, ProvingKey};
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystem};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::SNARK;
use ark_std::rand::{CryptoRng, Rng};
use async_trait::async_trait;

use crate::config::PROOF_TRANSCRIPT_DOMAIN;
use crate::crypto::hash::domain_separated_hash_multi;
use crate::gateway::ConnectionGateway;
use crate::note::{self, MaterializedNote, NoteInput};
use crate::proof::{PrivateRangeRequest, ProverError, RangeProver, Relation};

use super::circuit::RangeRelationCircuit;
use super::commitment::{Commitment, PedersenParams};
use super::verifier::RangeVerifier;

// ---------------------------------------------------------------------------
// LocalRangeProver
// ---------------------------------------------------------------------------

/// Holds the Groth16 proving key for the relation circuit.
pub struct LocalRangeProver {
    pk: ProvingKey<Bn254>,
    params: PedersenParams,
    gateway: Arc<dyn ConnectionGateway>,
    default_sender: String,
}

impl LocalRangeProver {
    /// Run the Groth16 setup for the relation circuit.
    ///
    /// `gateway` resolves proxy operands; `default_sender` is used when a
    /// request names none.
    pub fn setup<R: Rng + CryptoRng>(
        rng: &mut R,
        gateway: Arc<dyn ConnectionGateway>,
        default_sender: impl Into<String>,
    ) -> Result<(Self, RangeVerifier), ProverError> {
        let params = PedersenParams::canonical().clone();
        let blank = RangeRelationCircuit::blank(&params);

        let (pk, vk) = Groth16::<Bn254>::circuit_specific_setup(blank, rng)
            .map_err(|e| ProverError::Backend(format!("circuit setup failed: {e}")))?;

        tracing::debug!("relation circuit keys generated");

        let prover = Self {
            pk,
            params: params.clone(),
            gateway,
            default_sender: default_sender.into(),
        };
        Ok((prover, RangeVerifier::from_vk(vk, params)))
    }

    pub fn pedersen_params(&self) -> &PedersenParams {
        &self.params
    }

    pub fn default_sender(&self) -> &str {
        &self.default_sender
    }

    /// Build a proof from fully materialized operands.
    pub fn prove_materialized(
        &self,
        relation: Relation,
        original: &MaterializedNote,
        comparison: &MaterializedNote,
        remainder: Option<MaterializedNote>,
        sender: impl Into<String>,
    ) -> Result<RangeProof, ProverError> {
        let mut rng = ark_std::rand::thread_rng();

        let remainder = match remainder {
            Some(remainder) => {
                let expected = expected_remainder(relation, original, comparison)?;
                if remainder.value() != expected {
                    return Err(ProverError::Unsatisfiable {
                        relation,
                        reason: "supplied remainder does not balance the equation".into(),
                    });
                }
                remainder
            }
            None => synthesize_remainder(relation, original, comparison, &mut rng)?,
        };

        let circuit =
            RangeRelationCircuit::new(&self.params, relation, original, comparison, &remainder);

        // ark-groth16 panics on an unsatisfiable witness, so check first.
        let cs = ConstraintSystem::<Fr>::new_ref();
        circuit
            .clone()
            .generate_constraints(cs.clone())
            .map_err(|e| ProverError::Backend(format!("constraint synthesis failed: {e}")))?;
        let satisfied = cs
            .is_satisfied()
            .map_err(|e| ProverError::Backend(format!("constraint check failed: {e}")))?;
        if !satisfied {
            return Err(ProverError::Unsatisfiable {
                relation,
                reason: "operands do not open under the circuit's commitment parameters".into(),
            });
        }

        let proof = Groth16::<Bn254>::prove(&self.pk, circuit, &mut rng)
            .map_err(|e| ProverError::Backend(format!("Groth16 proof generation failed: {e}")))?;

        let mut bytes = Vec::new();
        proof
            .serialize_compressed(&mut bytes)
            .map_err(|e| ProverError::Backend(format!("proof serialization failed: {e}")))?;

        Ok(RangeProof {
            relation,
            bytes,
            original: original.commitment().clone(),
            comparison: comparison.commitment().clone(),
            remainder,
            sender: sender.into(),
        })
    }
}

#[async_trait]
impl RangeProver for LocalRangeProver {
    type Proof = RangeProof;

    async fn prove_private_range(
        &self,
        request: PrivateRangeRequest,
    ) -> Result<RangeProof, ProverError> {
        let PrivateRangeRequest {
            relation,
            original_note,
            comparison_note,
            remainder_note,
            sender,
        } = request;

        let gateway = self.gateway.as_ref();
        let comparison = resolve_operand("comparison", &comparison_note, gateway);
        let remainder = async {
            match &remainder_note {
                Some(input) => resolve_operand("remainder", input, gateway).await.map(Some),
                None => Ok(None),
            }
        };
        let (comparison, remainder) = futures::try_join!(comparison, remainder)?;

        let sender = sender
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.default_sender.clone());

        let proof =
            self.prove_materialized(relation, &original_note, &comparison, remainder, sender)?;
        tracing::debug!(%relation, size = proof.size(), "range proof generated");
        Ok(proof)
    }
}

async fn resolve_operand(
    role: &'static str,
    input: &NoteInput,
    gateway: &dyn ConnectionGateway,
) -> Result<MaterializedNote, ProverError> {
    note::resolve(input, gateway)
        .await
        .map_err(|e| ProverError::Operand {
            role,
            reason: e.to_string(),
        })
}

fn expected_remainder(
    relation: Relation,
    original: &MaterializedNote,
    comparison: &MaterializedNote,
) -> Result<u64, ProverError> {
    relation
        .remainder_value(original.value(), comparison.value())
        .ok_or_else(|| ProverError::Unsatisfiable {
            relation,
            reason: "operand values do not satisfy the relation".into(),
        })
}

/// Create the remainder note that balances `relation` between the two
/// operands. It is owned by the original note's owner.
pub fn synthesize_remainder<R: Rng + ?Sized>(
    relation: Relation,
    original: &MaterializedNote,
    comparison: &MaterializedNote,
    rng: &mut R,
) -> Result<MaterializedNote, ProverError> {
    let value = expected_remainder(relation, original, comparison)?;
    Ok(MaterializedNote::create(value, original.owner(), rng))
}

// ---------------------------------------------------------------------------
// RangeProof
// ---------------------------------------------------------------------------

/// A Groth16 comparison proof with its public statement.
#[derive(Clone, Debug)]
pub struct RangeProof {
    relation: Relation,
    bytes: Vec<u8>,
    original: Commitment,
    comparison: Commitment,
    remainder: MaterializedNote,
    sender: String,
}

impl RangeProof {
    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn original_commitment(&self) -> &Commitment {
        &self.original
    }

    pub fn comparison_commitment(&self) -> &Commitment {
        &self.comparison
    }

    /// The remainder note, including its opening. Share only its
    /// commitment with verifiers.
    pub fn remainder_note(&self) -> &MaterializedNote {
        &self.remainder
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Raw compressed proof bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Digest binding the relation tag, proof bytes, public commitments and
    /// sender together.
    pub fn transcript_digest(&self) -> [u8; 32] {
        let original = self.original.to_bytes();
        let comparison = self.comparison.to_bytes();
        let remainder = self.remainder.commitment().to_bytes();
        domain_separated_hash_multi(
            PROOF_TRANSCRIPT_DOMAIN,
            &[
                self.relation.tag().as_bytes(),
                &self.bytes,
                &original,
                &comparison,
                &remainder,
                self.sender.as_bytes(),
            ],
        )
    }

    pub(crate) fn to_ark_proof(&self) -> anyhow::Result<ark_groth16::Proof<Bn254>> {
        ark_groth16::Proof::<Bn254>::deserialize_compressed(&self.bytes[..])
            .context("proof deserialization failed")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::InMemoryGateway;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    fn prover() -> LocalRangeProver {
        let mut rng = StdRng::seed_from_u64(42);
        let (prover, _verifier) =
            LocalRangeProver::setup(&mut rng, Arc::new(InMemoryGateway::new()), "0xdefault")
                .unwrap();
        prover
    }

    fn note(value: u64, seed: u64) -> MaterializedNote {
        MaterializedNote::create(value, "0xowner", &mut StdRng::seed_from_u64(seed))
    }

    #[test]
    fn synthesized_remainder_carries_the_difference() {
        let mut rng = StdRng::seed_from_u64(7);
        let remainder =
            synthesize_remainder(Relation::LessThan, &note(30, 1), &note(100, 2), &mut rng)
                .unwrap();
        assert_eq!(remainder.value(), 70);
        assert_eq!(remainder.owner(), "0xowner");
    }

    #[test]
    fn synthesis_refuses_false_relations() {
        let mut rng = StdRng::seed_from_u64(7);
        let err = synthesize_remainder(Relation::Equal, &note(3, 1), &note(4, 2), &mut rng)
            .unwrap_err();
        assert!(matches!(
            err,
            ProverError::Unsatisfiable {
                relation: Relation::Equal,
                ..
            }
        ));
    }

    #[test]
    fn proof_is_compact() {
        let proof = prover()
            .prove_materialized(Relation::GreaterThan, &note(100, 1), &note(30, 2), None, "0xs")
            .unwrap();
        assert!(proof.size() > 100);
        assert!(proof.size() < 400);
        assert_eq!(proof.relation(), Relation::GreaterThan);
        assert_eq!(proof.remainder_note().value(), 70);
    }

    #[test]
    fn wrong_supplied_remainder_is_rejected() {
        let err = prover()
            .prove_materialized(
                Relation::GreaterThan,
                &note(100, 1),
                &note(30, 2),
                Some(note(71, 3)),
                "0xs",
            )
            .unwrap_err();
        assert!(matches!(err, ProverError::Unsatisfiable { .. }));
    }

    #[test]
    fn transcript_digest_covers_sender() {
        let prover = prover();
        let original = note(10, 1);
        let comparison = note(10, 2);
        let remainder = note(0, 3);

        let a = prover
            .prove_materialized(Relation::Equal, &original, &comparison, Some(remainder), "0xa")
            .unwrap();
        let mut b = a.clone();
        b.sender = "0xb".into();

        assert_ne!(a.transcript_digest(), b.transcript_digest());
        assert_eq!(a.transcript_digest(), a.clone().transcript_digest());
    }
}
