use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::thread_rng;
use sigma_or_proofs::test_utils::test_group;
use sigma_or_proofs::{
    decimal_to_group_element, positional_instance_encoding, OrWitness, SchnorrProof,
    SigmaComposer,
};

fn bench_or_prove_verify(c: &mut Criterion) {
    let group = test_group();
    let ring = group.scalar_ring();
    let composer: SigmaComposer = SigmaComposer::new(b"bench", ring.clone());
    let mut rng = thread_rng();

    let mut prove = c.benchmark_group("OR proof prove");
    for branches in [1usize, 2, 4, 8].iter() {
        let x = ring.random(&mut rng);
        let proofs = vec![SchnorrProof::discrete_logarithm(&group); *branches];
        let mut instances: Vec<_> = (1..*branches)
            .map(|_| vec![group.exp_generator(&ring.random(&mut rng))])
            .collect();
        instances.push(vec![group.exp_generator(&x)]);
        let witness = OrWitness::new(branches - 1, x);

        prove.bench_with_input(BenchmarkId::new("branches", branches), branches, |b, _| {
            b.iter(|| {
                composer.prove_or(
                    black_box(&proofs),
                    positional_instance_encoding,
                    black_box(&instances),
                    &witness,
                    &mut rng,
                )
            })
        });
    }
    prove.finish();

    let mut verify = c.benchmark_group("OR proof verify");
    for branches in [1usize, 2, 4, 8].iter() {
        let x = ring.random(&mut rng);
        let proofs = vec![SchnorrProof::discrete_logarithm(&group); *branches];
        let mut instances: Vec<_> = (1..*branches)
            .map(|_| vec![group.exp_generator(&ring.random(&mut rng))])
            .collect();
        instances.push(vec![group.exp_generator(&x)]);
        let transcript = composer
            .prove_or(
                &proofs,
                positional_instance_encoding,
                &instances,
                &OrWitness::new(branches - 1, x),
                &mut rng,
            )
            .unwrap();

        verify.bench_with_input(BenchmarkId::new("branches", branches), branches, |b, _| {
            b.iter(|| {
                composer.verify_or(
                    black_box(&proofs),
                    positional_instance_encoding,
                    black_box(&instances),
                    black_box(&transcript),
                )
            })
        });
    }
    verify.finish();
}

fn bench_decimal_to_group_element(c: &mut Criterion) {
    let group = test_group();
    let value = "39590333251755468522804720036126349054828422197015039728130770980651836253334";
    c.bench_function("decimal to group element", |b| {
        b.iter(|| decimal_to_group_element(black_box(value), &group))
    });
}

criterion_group!(benches, bench_or_prove_verify, bench_decimal_to_group_element);
criterion_main!(benches);
