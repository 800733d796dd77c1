//! # Range Relation R1CS Circuit
//!
//! The statement proved inside the Groth16 SNARK is:
//!
//! ```text
//! "I know openings (v_L, r_L), (v_S, r_S), (v_R, r_R) such that:
//!     1. v_X * g + r_X * h = c_X      for X in {L, S, R}
//!     2. v_L = v_S + v_R              (exact balance)
//!     3. v_S        in [0, 2^64)
//!     4. v_R - strict in [0, 2^64)    (remainder >= 1 when strict)
//!     5. exact => v_R = 0"
//! ```
//!
//! `L` is the larger side of the equation and `S` the smaller. Which note
//! sits on which side depends on the relation; see [`arrange`]. The two
//! flags are public boolean inputs, so one proving key serves all five
//! relations and a verifier can tell which one a proof claims.
//!
//! ## Public inputs (in order)
//!
//! | index | value |
//! |-------|-------|
//! | 0     | scalar commitment of the larger side |
//! | 1     | scalar commitment of the smaller side |
//! | 2     | scalar commitment of the remainder |
//! | 3     | `strict` flag |
//! | 4     | `exact` flag |

use ark_bn254::Fr;
use ark_ff::PrimeField;
use ark_r1cs_std::{
    alloc::AllocVar,
    boolean::Boolean,
    eq::EqGadget,
    fields::{fp::FpVar, FieldVar},
};
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use crate::note::MaterializedNote;
use crate::proof::Relation;

use super::commitment::{Commitment, PedersenParams};
use super::RANGE_BITS;

// ---------------------------------------------------------------------------
// Circuit definition
// ---------------------------------------------------------------------------

/// Opening of one commitment, as field elements.
#[derive(Clone, Copy, Debug)]
pub struct OperandWitness {
    pub value: Fr,
    pub blinding: Fr,
    pub commitment: Fr,
}

impl OperandWitness {
    pub fn of(note: &MaterializedNote) -> Self {
        Self {
            value: Fr::from(note.value()),
            blinding: note.blinding(),
            commitment: note.commitment().scalar,
        }
    }
}

/// Groth16 circuit proving a comparison relation between two committed
/// notes through a committed remainder.
///
/// Witness slots are `None` during key generation.
#[derive(Clone)]
pub struct RangeRelationCircuit {
    pub g_scalar: Fr,
    pub h_scalar: Fr,

    pub larger: Option<OperandWitness>,
    pub smaller: Option<OperandWitness>,
    pub remainder: Option<OperandWitness>,

    pub strict: Option<bool>,
    pub exact: Option<bool>,
}

impl RangeRelationCircuit {
    /// Populate the circuit for `relation` between `original` and
    /// `comparison`.
    pub fn new(
        params: &PedersenParams,
        relation: Relation,
        original: &MaterializedNote,
        comparison: &MaterializedNote,
        remainder: &MaterializedNote,
    ) -> Self {
        let (larger, smaller) = arrange(relation, original, comparison);
        Self {
            g_scalar: params.g_scalar,
            h_scalar: params.h_scalar,
            larger: Some(OperandWitness::of(larger)),
            smaller: Some(OperandWitness::of(smaller)),
            remainder: Some(OperandWitness::of(remainder)),
            strict: Some(relation.is_strict()),
            exact: Some(relation.is_exact()),
        }
    }

    /// Blank circuit for CRS generation.
    pub fn blank(params: &PedersenParams) -> Self {
        Self {
            g_scalar: params.g_scalar,
            h_scalar: params.h_scalar,
            larger: None,
            smaller: None,
            remainder: None,
            strict: None,
            exact: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Constraint synthesizer
// ---------------------------------------------------------------------------

impl ConstraintSynthesizer<Fr> for RangeRelationCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        // 1. Public inputs. Allocation order fixes the verifier's input vector.
        let larger_c = commitment_input(&cs, self.larger)?;
        let smaller_c = commitment_input(&cs, self.smaller)?;
        let remainder_c = commitment_input(&cs, self.remainder)?;

        let strict = Boolean::<Fr>::new_input(ark_relations::ns!(cs, "strict"), || {
            self.strict.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let exact = Boolean::<Fr>::new_input(ark_relations::ns!(cs, "exact"), || {
            self.exact.ok_or(SynthesisError::AssignmentMissing)
        })?;

        // 2. Openings.
        let g_var = FpVar::<Fr>::new_constant(ark_relations::ns!(cs, "g_scalar"), self.g_scalar)?;
        let h_var = FpVar::<Fr>::new_constant(ark_relations::ns!(cs, "h_scalar"), self.h_scalar)?;

        let larger_v = open(&cs, self.larger, &larger_c, &g_var, &h_var)?;
        let smaller_v = open(&cs, self.smaller, &smaller_c, &g_var, &h_var)?;
        let remainder_v = open(&cs, self.remainder, &remainder_c, &g_var, &h_var)?;

        // 3. Balance.
        (&smaller_v + &remainder_v).enforce_equal(&larger_v)?;

        // 4. Ranges. The smaller side keeps the sum from wrapping the field.
        enforce_u64(&cs, &smaller_v, self.smaller.map(|w| w.value))?;

        let strict_fp = FpVar::<Fr>::from(strict.clone());
        let shifted = &remainder_v - &strict_fp;
        let shifted_value = match (self.remainder, self.strict) {
            (Some(w), Some(s)) => Some(w.value - Fr::from(s as u64)),
            _ => None,
        };
        enforce_u64(&cs, &shifted, shifted_value)?;

        // 5. Equality pins the remainder to zero.
        remainder_v.conditional_enforce_equal(&FpVar::<Fr>::zero(), &exact)?;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn commitment_input(
    cs: &ConstraintSystemRef<Fr>,
    witness: Option<OperandWitness>,
) -> Result<FpVar<Fr>, SynthesisError> {
    FpVar::<Fr>::new_input(ark_relations::ns!(cs, "commitment"), || {
        witness
            .map(|w| w.commitment)
            .ok_or(SynthesisError::AssignmentMissing)
    })
}

/// Allocate the opening of `commitment` and return the value variable.
fn open(
    cs: &ConstraintSystemRef<Fr>,
    witness: Option<OperandWitness>,
    commitment: &FpVar<Fr>,
    g: &FpVar<Fr>,
    h: &FpVar<Fr>,
) -> Result<FpVar<Fr>, SynthesisError> {
    let value = FpVar::<Fr>::new_witness(ark_relations::ns!(cs, "value"), || {
        witness
            .map(|w| w.value)
            .ok_or(SynthesisError::AssignmentMissing)
    })?;
    let blinding = FpVar::<Fr>::new_witness(ark_relations::ns!(cs, "blinding"), || {
        witness
            .map(|w| w.blinding)
            .ok_or(SynthesisError::AssignmentMissing)
    })?;

    (&value * g + &blinding * h).enforce_equal(commitment)?;
    Ok(value)
}

/// Enforce `0 <= var < 2^RANGE_BITS` by bit decomposition.
fn enforce_u64(
    cs: &ConstraintSystemRef<Fr>,
    var: &FpVar<Fr>,
    value: Option<Fr>,
) -> Result<(), SynthesisError> {
    let bits = value.map(low_bits);

    let mut reconstructed = FpVar::<Fr>::zero();
    let mut power_of_two = FpVar::<Fr>::one();
    let two = FpVar::<Fr>::constant(Fr::from(2u64));

    for i in 0..RANGE_BITS {
        let bit = Boolean::<Fr>::new_witness(ark_relations::ns!(cs, "range_bit"), || {
            bits.as_ref()
                .map(|bits| bits[i])
                .ok_or(SynthesisError::AssignmentMissing)
        })?;
        reconstructed += FpVar::<Fr>::from(bit) * &power_of_two;
        power_of_two *= &two;
    }

    reconstructed.enforce_equal(var)
}

/// Little-endian low [`RANGE_BITS`] bits of a field element. A value
/// outside the range yields bits that do not recompose to it.
fn low_bits(value: Fr) -> Vec<bool> {
    value
        .into_bigint()
        .0
        .iter()
        .flat_map(|limb| (0..64).map(move |i| (limb >> i) & 1 == 1))
        .take(RANGE_BITS)
        .collect()
}

/// Order the operands as (larger side, smaller side) for `relation`.
pub fn arrange<'a, T>(relation: Relation, original: &'a T, comparison: &'a T) -> (&'a T, &'a T) {
    if relation.original_is_larger() {
        (original, comparison)
    } else {
        (comparison, original)
    }
}

/// The public input vector the verifier expects for this claim.
///
/// Must match the allocation order in `generate_constraints`.
pub fn public_inputs(
    relation: Relation,
    original: &Commitment,
    comparison: &Commitment,
    remainder: &Commitment,
) -> Vec<Fr> {
    let (larger, smaller) = arrange(relation, original, comparison);
    vec![
        larger.scalar,
        smaller.scalar,
        remainder.scalar,
        Fr::from(relation.is_strict() as u64),
        Fr::from(relation.is_exact() as u64),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ark_relations::r1cs::ConstraintSystem;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    fn note(value: u64, seed: u64) -> MaterializedNote {
        MaterializedNote::create(value, "", &mut StdRng::seed_from_u64(seed))
    }

    fn satisfied(circuit: RangeRelationCircuit) -> bool {
        let cs = ConstraintSystem::<Fr>::new_ref();
        circuit.generate_constraints(cs.clone()).unwrap();
        cs.is_satisfied().unwrap()
    }

    fn check(relation: Relation, original: u64, comparison: u64, remainder: u64) -> bool {
        let params = PedersenParams::canonical();
        satisfied(RangeRelationCircuit::new(
            params,
            relation,
            &note(original, 1),
            &note(comparison, 2),
            &note(remainder, 3),
        ))
    }

    #[test]
    fn greater_than_with_surplus() {
        assert!(check(Relation::GreaterThan, 100, 30, 70));
    }

    #[test]
    fn less_than_with_deficit() {
        assert!(check(Relation::LessThan, 30, 100, 70));
    }

    #[test]
    fn equal_with_zero_remainder() {
        assert!(check(Relation::Equal, 42, 42, 0));
    }

    #[test]
    fn non_strict_accepts_zero_remainder() {
        assert!(check(Relation::GreaterThanOrEqual, 5, 5, 0));
        assert!(check(Relation::LessThanOrEqual, 5, 5, 0));
    }

    #[test]
    fn strict_rejects_zero_remainder() {
        assert!(!check(Relation::GreaterThan, 5, 5, 0));
        assert!(!check(Relation::LessThan, 5, 5, 0));
    }

    #[test]
    fn wrong_remainder_breaks_balance() {
        assert!(!check(Relation::GreaterThan, 100, 30, 69));
        assert!(!check(Relation::Equal, 42, 41, 1));
    }

    #[test]
    fn wrong_direction_is_unsatisfiable() {
        // 30 > 100 would need a remainder of -70.
        let remainder_value = 0u64.wrapping_sub(70);
        assert!(!check(Relation::GreaterThan, 30, 100, remainder_value));
    }

    #[test]
    fn opening_must_match_commitment() {
        let params = PedersenParams::canonical();
        let mut circuit = RangeRelationCircuit::new(
            params,
            Relation::GreaterThan,
            &note(100, 1),
            &note(30, 2),
            &note(70, 3),
        );
        if let Some(larger) = circuit.larger.as_mut() {
            larger.commitment = note(100, 9).commitment().scalar;
        }
        assert!(!satisfied(circuit));
    }

    #[test]
    fn public_inputs_follow_relation_direction() {
        let original = note(30, 1);
        let comparison = note(100, 2);
        let remainder = note(70, 3);

        let inputs = public_inputs(
            Relation::LessThan,
            original.commitment(),
            comparison.commitment(),
            remainder.commitment(),
        );
        assert_eq!(inputs.len(), 5);
        assert_eq!(inputs[0], comparison.commitment().scalar);
        assert_eq!(inputs[1], original.commitment().scalar);
        assert_eq!(inputs[2], remainder.commitment().scalar);
        assert_eq!(inputs[3], Fr::from(1u64));
        assert_eq!(inputs[4], Fr::from(0u64));
    }

    #[test]
    fn constraint_count_is_bounded() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        RangeRelationCircuit::new(
            PedersenParams::canonical(),
            Relation::GreaterThanOrEqual,
            &note(1000, 1),
            &note(500, 2),
            &note(500, 3),
        )
        .generate_constraints(cs.clone())
        .unwrap();

        let n = cs.num_constraints();
        assert!(n > 100, "too few constraints ({n})");
        assert!(n < 400, "too many constraints ({n})");
    }
}
