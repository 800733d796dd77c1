//! # Pedersen Commitments over BN254
//!
//! Every materialized note carries a commitment to its value `v` under its
//! blinding factor `r`, in two forms that share the same witness:
//!
//! ```text
//! C = v * G + r * H          (curve form, on BN254/G1)
//! c = v * g + r * h   mod p  (scalar form, in Fr)
//! ```
//!
//! The curve form is what a note hash is derived from. The scalar form is
//! what the relation circuit constrains, because native Fr arithmetic costs
//! two R1CS gates per commitment while curve arithmetic over Fq inside an Fr
//! circuit would cost thousands.
//!
//! ## Canonical parameters
//!
//! Viewing keys only carry `(v, r)`, so every party that materializes a note
//! must agree on the generators. [`PedersenParams::canonical`] derives them
//! from [`crate::config::PEDERSEN_DOMAIN`] and caches the result for the
//! lifetime of the process.

use std::ops::Mul;
use std::sync::OnceLock;

use ark_bn254::{Fr, G1Affine, G1Projective};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::UniformRand;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::rand::{rngs::StdRng, Rng, SeedableRng};

use crate::config::PEDERSEN_DOMAIN;
use crate::crypto::hash::blake3_hash;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Public parameters for the Pedersen commitment scheme.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct PedersenParams {
    /// Curve generator for the value component.
    pub g: G1Affine,
    /// Curve generator for the blinding component.
    pub h: G1Affine,
    /// Scalar generator for the value component.
    pub g_scalar: Fr,
    /// Scalar generator for the blinding component.
    pub h_scalar: Fr,
}

/// A Pedersen commitment in both curve and scalar form.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Commitment {
    /// `C = v * G + r * H` on BN254/G1.
    pub point: G1Affine,
    /// `c = v * g_scalar + r * h_scalar` in Fr.
    pub scalar: Fr,
}

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

static CANONICAL_PARAMS: OnceLock<PedersenParams> = OnceLock::new();

impl PedersenParams {
    /// Generate fresh parameters from `rng`.
    pub fn setup<R: Rng>(rng: &mut R) -> Self {
        let g = G1Projective::rand(rng).into_affine();
        let h = G1Projective::rand(rng).into_affine();
        let g_scalar = Fr::rand(rng);
        let h_scalar = Fr::rand(rng);

        debug_assert!(!g.is_zero(), "EC generator g must not be identity");
        debug_assert!(!h.is_zero(), "EC generator h must not be identity");

        Self {
            g,
            h,
            g_scalar,
            h_scalar,
        }
    }

    /// Derive parameters deterministically from a domain tag.
    ///
    /// The tag is hashed into a 32-byte seed for a `StdRng`, which then runs
    /// [`PedersenParams::setup`]. Same tag, same generators, on every host.
    pub fn derive(domain: &str) -> Self {
        let seed = blake3_hash(domain.as_bytes());
        let mut rng = StdRng::from_seed(seed);
        Self::setup(&mut rng)
    }

    /// The process-wide parameters every materialized note commits under.
    pub fn canonical() -> &'static Self {
        CANONICAL_PARAMS.get_or_init(|| Self::derive(PEDERSEN_DOMAIN))
    }

    /// Serialize parameters to compressed bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        self.serialize_compressed(&mut buf)
            .expect("PedersenParams serialization must not fail");
        buf
    }

    /// Deserialize parameters from compressed bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ark_serialize::SerializationError> {
        Self::deserialize_compressed(data)
    }
}

// ---------------------------------------------------------------------------
// Commit / Verify
// ---------------------------------------------------------------------------

/// Compute the commitment to `value` under `blinding` in both forms.
pub fn commit(params: &PedersenParams, value: u64, blinding: Fr) -> Commitment {
    let v = Fr::from(value);
    let point = (params.g.mul(v) + params.h.mul(blinding)).into_affine();
    let scalar = v * params.g_scalar + blinding * params.h_scalar;
    Commitment { point, scalar }
}

/// Check that `commitment` opens to `(value, blinding)` under `params`.
///
/// Reveals the opening; only for audits and tests.
pub fn verify_commitment(
    params: &PedersenParams,
    commitment: &Commitment,
    value: u64,
    blinding: Fr,
) -> bool {
    let expected = commit(params, value, blinding);
    commitment.point == expected.point && commitment.scalar == expected.scalar
}

impl Commitment {
    /// Serialize commitment to compressed bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        self.serialize_compressed(&mut buf)
            .expect("Commitment serialization must not fail");
        buf
    }

    /// Deserialize commitment from compressed bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ark_serialize::SerializationError> {
        Self::deserialize_compressed(data)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::test_rng;

    #[test]
    fn commitment_deterministic() {
        let mut rng = test_rng();
        let params = PedersenParams::setup(&mut rng);
        let r = Fr::rand(&mut rng);

        assert_eq!(commit(&params, 100, r), commit(&params, 100, r));
    }

    #[test]
    fn different_values_different_commitments() {
        let mut rng = test_rng();
        let params = PedersenParams::setup(&mut rng);
        let r = Fr::rand(&mut rng);

        assert_ne!(commit(&params, 100, r), commit(&params, 101, r));
    }

    #[test]
    fn different_blindings_different_commitments() {
        let mut rng = test_rng();
        let params = PedersenParams::setup(&mut rng);
        let r1 = Fr::rand(&mut rng);
        let r2 = Fr::rand(&mut rng);

        assert_ne!(commit(&params, 100, r1), commit(&params, 100, r2));
    }

    #[test]
    fn opening_checks_value_and_blinding() {
        let mut rng = test_rng();
        let params = PedersenParams::setup(&mut rng);
        let r = Fr::rand(&mut rng);
        let c = commit(&params, 42, r);

        assert!(verify_commitment(&params, &c, 42, r));
        assert!(!verify_commitment(&params, &c, 43, r));
        assert!(!verify_commitment(&params, &c, 42, r + Fr::from(1u64)));
    }

    #[test]
    fn derive_is_deterministic_per_domain() {
        let a = PedersenParams::derive("shade/test/one");
        let b = PedersenParams::derive("shade/test/one");
        let c = PedersenParams::derive("shade/test/two");

        assert_eq!(a, b);
        assert_ne!(a.g, c.g);
        assert_ne!(a.g_scalar, c.g_scalar);
    }

    #[test]
    fn canonical_matches_configured_domain() {
        assert_eq!(
            PedersenParams::canonical(),
            &PedersenParams::derive(PEDERSEN_DOMAIN)
        );
    }

    #[test]
    fn commitments_are_additively_homomorphic() {
        let params = PedersenParams::canonical();
        let mut rng = test_rng();
        let (r1, r2) = (Fr::rand(&mut rng), Fr::rand(&mut rng));

        let sum = commit(params, 70, r1);
        let part = commit(params, 30, r2);
        let total = commit(params, 100, r1 + r2);

        assert_eq!((sum.point + part.point).into_affine(), total.point);
        assert_eq!(sum.scalar + part.scalar, total.scalar);
    }

    #[test]
    fn params_bytes_round_trip() {
        let params = PedersenParams::canonical();
        let restored = PedersenParams::from_bytes(&params.to_bytes()).unwrap();
        assert_eq!(params, &restored);
    }

    #[test]
    fn commitment_bytes_round_trip() {
        let mut rng = test_rng();
        let c = commit(PedersenParams::canonical(), 999, Fr::rand(&mut rng));
        assert_eq!(Commitment::from_bytes(&c.to_bytes()).unwrap(), c);
    }
}
