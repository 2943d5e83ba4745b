//! Benchmark for native speed of Rescue-Prime
//! `cargo bench --bench rp_native`
#[macro_use]
extern crate criterion;
use std::time::Duration;

use ark_std::{test_rng, UniformRand};
use criterion::Criterion;
use jf_rescue_prime::{presets::bls12_381_width3, Permutation, RescuePrimeConfig, SecurityLevel};

type Fr = ark_bls12_381::Fr;

// BLS12-381 scalar field, state size = 3
fn bls3(c: &mut Criterion) {
    let mut group = c.benchmark_group("Rescue-Prime over (Bls12_381::Fr, m=3)");
    group.sample_size(10).measurement_time(Duration::new(20, 0));
    let perm = bls12_381_width3().unwrap();
    let rng = &mut test_rng();

    group.bench_function("1k iter", |b| {
        b.iter(|| {
            let mut input = vec![Fr::rand(rng), Fr::rand(rng), Fr::rand(rng)];
            for _ in 0..1000 {
                input = perm.eval(&input).unwrap();
            }
        })
    });
    group.finish();
}

// parameter derivation: round estimation, MDS and round constants
fn setup(c: &mut Criterion) {
    let mut group = c.benchmark_group("Rescue-Prime setup over Bls12_381::Fr");
    group.sample_size(10).measurement_time(Duration::new(10, 0));

    for (m, capacity) in [(3, 1), (8, 4), (12, 4)] {
        group.bench_function(format!("m={}", m), |b| {
            b.iter(|| {
                let config =
                    RescuePrimeConfig::<Fr>::new(m, capacity, SecurityLevel::Bits128, 5).unwrap();
                Permutation::new(config).unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bls3, setup);

criterion_main!(benches);
