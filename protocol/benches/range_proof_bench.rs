// Comparison proof benchmarks.
//
// Covers note materialization (commitment + hash), Groth16 setup, proof
// generation and verification for the relation circuit over BN254.

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};

use ark_std::rand::{rngs::StdRng, SeedableRng};

use shade_protocol::gateway::InMemoryGateway;
use shade_protocol::note::{MaterializedNote, ViewingKey};
use shade_protocol::proof::Relation;
use shade_protocol::zkp::LocalRangeProver;

fn bench_materialize(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let key = ViewingKey::random(1_000_000, &mut rng).to_hex();

    c.bench_function("note/materialize_from_viewing_key", |b| {
        b.iter(|| MaterializedNote::from_viewing_key(&key, "").unwrap());
    });
}

fn bench_setup(c: &mut Criterion) {
    c.bench_function("zkp/groth16_setup", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(42);
            LocalRangeProver::setup(&mut rng, Arc::new(InMemoryGateway::new()), "").unwrap()
        });
    });
}

fn bench_prove(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let (prover, _verifier) =
        LocalRangeProver::setup(&mut rng, Arc::new(InMemoryGateway::new()), "").unwrap();
    let original = MaterializedNote::create(10_000, "", &mut rng);
    let comparison = MaterializedNote::create(500, "", &mut rng);

    c.bench_function("zkp/groth16_prove_gt", |b| {
        b.iter(|| {
            prover
                .prove_materialized(Relation::GreaterThan, &original, &comparison, None, "")
                .unwrap()
        });
    });
}

fn bench_verify(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let (prover, verifier) =
        LocalRangeProver::setup(&mut rng, Arc::new(InMemoryGateway::new()), "").unwrap();
    let original = MaterializedNote::create(10_000, "", &mut rng);
    let comparison = MaterializedNote::create(500, "", &mut rng);
    let proof = prover
        .prove_materialized(Relation::GreaterThan, &original, &comparison, None, "")
        .unwrap();

    c.bench_function("zkp/groth16_verify", |b| {
        b.iter(|| verifier.verify(&proof).unwrap());
    });
}

criterion_group!(
    benches,
    bench_materialize,
    bench_setup,
    bench_prove,
    bench_verify
);
criterion_main!(benches);
