//! Benchmark for firefly field generation.
//!
//! Run with: cargo bench --package portal_core --bench particle_field_benchmark
//!
//! Generation runs once at startup, so the interesting number is how far the
//! count can grow before startup notices.

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use portal_core::{AnimationState, ManualClock, ParticleField};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn benchmark_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("particle_field_generate");
    for count in [50_usize, 1_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut rng = StdRng::seed_from_u64(42);
            b.iter(|| black_box(ParticleField::generate_with(black_box(count), &mut rng)));
        });
    }
    group.finish();
}

fn benchmark_thread_rng(c: &mut Criterion) {
    c.bench_function("particle_field_thread_rng_50", |b| {
        b.iter(|| black_box(ParticleField::generate(black_box(50))));
    });
}

fn benchmark_animation_sample(c: &mut Criterion) {
    let mut state = AnimationState::new(2.0);
    let mut clock = ManualClock::new(0.0);

    c.bench_function("animation_sample", |b| {
        b.iter(|| {
            clock.advance(1.0 / 120.0);
            black_box(state.sample(&mut clock))
        });
    });
}

criterion_group!(
    benches,
    benchmark_generate,
    benchmark_thread_rng,
    benchmark_animation_sample
);
criterion_main!(benches);
