//! End-to-end comparison proofs: in-memory session holder, orchestrator and
//! the Groth16 prover, checked by the matching verifier.

use std::sync::Arc;

use ark_std::rand::{rngs::StdRng, SeedableRng};

use shade_protocol::gateway::InMemoryGateway;
use shade_protocol::note::{MaterializedNote, NoteError, NoteIdentity, ViewingKey};
use shade_protocol::proof::{CompareOptions, ProofOrchestrator, ProverError, Relation};
use shade_protocol::zkp::{LocalRangeProver, RangeVerifier};

const OWNER: &str = "0x1111111111111111111111111111111111111111";
const ASSET: &str = "0x2222222222222222222222222222222222222222";
const SENDER: &str = "0x4444444444444444444444444444444444444444";

struct Setup {
    gateway: Arc<InMemoryGateway>,
    orchestrator: ProofOrchestrator<LocalRangeProver>,
    verifier: RangeVerifier,
}

fn setup() -> Setup {
    let gateway = Arc::new(InMemoryGateway::new());
    let mut rng = StdRng::seed_from_u64(2026);
    let (prover, verifier) = LocalRangeProver::setup(&mut rng, gateway.clone(), SENDER).unwrap();
    Setup {
        orchestrator: ProofOrchestrator::new(gateway.clone(), Arc::new(prover)),
        gateway,
        verifier,
    }
}

fn register(gateway: &InMemoryGateway, value: u64, seed: u64) -> NoteIdentity {
    let key = ViewingKey::random(value, &mut StdRng::seed_from_u64(seed));
    NoteIdentity::from_record(gateway.register_note(&key, OWNER, ASSET).unwrap())
}

fn materialized(value: u64, seed: u64) -> MaterializedNote {
    MaterializedNote::create(value, OWNER, &mut StdRng::seed_from_u64(seed))
}

#[tokio::test]
async fn greater_than_synthesizes_surplus_and_verifies() {
    let s = setup();
    let note = register(&s.gateway, 100, 1);

    let proof = s
        .orchestrator
        .greater_than(&note, materialized(30, 2), CompareOptions::default())
        .await
        .unwrap();

    assert_eq!(proof.relation(), Relation::GreaterThan);
    assert_eq!(proof.remainder_note().value(), 70);
    assert_eq!(proof.sender(), SENDER);
    assert!(s.verifier.verify(&proof).unwrap());
}

#[tokio::test]
async fn less_than_against_a_proxy_comparison() {
    let s = setup();
    let note = register(&s.gateway, 30, 1);
    let bigger = register(&s.gateway, 100, 2);

    let proof = s
        .orchestrator
        .less_than(&note, &bigger, CompareOptions::default().with_sender(OWNER))
        .await
        .unwrap();

    assert_eq!(proof.remainder_note().value(), 70);
    assert_eq!(proof.sender(), OWNER);
    assert!(s.verifier.verify(&proof).unwrap());
}

#[tokio::test]
async fn equal_and_non_strict_relations_verify() {
    let s = setup();
    let note = register(&s.gateway, 42, 1);

    for relation in [
        Relation::Equal,
        Relation::GreaterThanOrEqual,
        Relation::LessThanOrEqual,
    ] {
        let proof = s
            .orchestrator
            .compare(relation, &note, materialized(42, 2), CompareOptions::default())
            .await
            .unwrap();
        assert_eq!(proof.remainder_note().value(), 0);
        assert!(s.verifier.verify(&proof).unwrap(), "{relation} must verify");
    }
}

#[tokio::test]
async fn supplied_remainder_is_used() {
    let s = setup();
    let note = register(&s.gateway, 100, 1);
    let remainder = materialized(70, 3);

    let proof = s
        .orchestrator
        .greater_than_or_equal_to(
            &note,
            materialized(30, 2),
            CompareOptions::default().with_remainder(&remainder),
        )
        .await
        .unwrap();

    assert_eq!(proof.remainder_note(), &remainder);
    assert!(s.verifier.verify(&proof).unwrap());
}

#[tokio::test]
async fn wrong_supplied_remainder_is_unsatisfiable() {
    let s = setup();
    let note = register(&s.gateway, 100, 1);

    let err = s
        .orchestrator
        .greater_than(
            &note,
            materialized(30, 2),
            CompareOptions::default().with_remainder(materialized(69, 3)),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        NoteError::Prover(ProverError::Unsatisfiable {
            relation: Relation::GreaterThan,
            ..
        })
    ));
}

#[tokio::test]
async fn false_relation_is_reported_not_proved() {
    let s = setup();
    let note = register(&s.gateway, 30, 1);

    let err = s
        .orchestrator
        .greater_than(&note, materialized(100, 2), CompareOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        NoteError::Prover(ProverError::Unsatisfiable { .. })
    ));
}

#[tokio::test]
async fn proof_does_not_verify_under_another_relation() {
    let s = setup();
    let note = register(&s.gateway, 100, 1);
    let comparison = materialized(30, 2);

    let proof = s
        .orchestrator
        .greater_than(&note, &comparison, CompareOptions::default())
        .await
        .unwrap();

    let ok = s
        .verifier
        .verify_statement(
            &proof,
            Relation::LessThan,
            proof.original_commitment(),
            comparison.commitment(),
            proof.remainder_note().commitment(),
        )
        .unwrap();
    assert!(!ok);
}

#[tokio::test]
async fn invisible_proxy_comparison_is_an_operand_error() {
    let s = setup();
    let note = register(&s.gateway, 100, 1);
    let hidden = NoteIdentity::from_json(r#"{"id":"hidden","value":1}"#).unwrap();

    let err = s
        .orchestrator
        .greater_than(&note, hidden, CompareOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        NoteError::Prover(ProverError::Operand {
            role: "comparison",
            ..
        })
    ));
}
