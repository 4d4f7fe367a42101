//! Variant assignment benchmarks
//!
//! - Weighted selection over growing variant lists
//! - Fresh assignment (draw + store write + event)
//! - Sticky assignment (store read only)
//!
//! Toyota Way: Measure before optimizing (Genchi Genbutsu)

use boostly::events::MemoryEventSink;
use boostly::experiment::{
    select_variant, ExperimentRegistry, Variant, VariantAssigner, HERO_CTA_TEXT,
};
use boostly::kv::MemoryKvStore;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Evenly weighted variant list of the given size
#[allow(clippy::cast_precision_loss)]
fn even_variants(count: usize) -> Vec<Variant> {
    (0..count)
        .map(|i| Variant::new(format!("variant_{i}"), 1.0 / count as f64))
        .collect()
}

fn bench_select_variant(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_variant");

    for size in &[2usize, 3, 10, 100] {
        let variants = even_variants(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| select_variant(black_box(&variants), black_box(0.999)));
        });
    }

    group.finish();
}

fn bench_assign(c: &mut Criterion) {
    let mut group = c.benchmark_group("assign");
    let registry = ExperimentRegistry::landing_defaults();

    group.bench_function("fresh", |b| {
        let sink = MemoryEventSink::new();
        let mut rng_seed = 0u64;
        b.iter(|| {
            let store = MemoryKvStore::new();
            rng_seed += 1;
            let mut assigner = VariantAssigner::new(
                registry.clone(),
                &store,
                &sink,
                StdRng::seed_from_u64(rng_seed),
            );
            black_box(assigner.variant(HERO_CTA_TEXT).unwrap());
            sink.clear();
        });
    });

    group.bench_function("sticky", |b| {
        let store = MemoryKvStore::new();
        let sink = MemoryEventSink::new();
        let mut assigner = VariantAssigner::new(
            registry.clone(),
            &store,
            &sink,
            StdRng::seed_from_u64(42),
        );
        assigner.variant(HERO_CTA_TEXT).unwrap();
        b.iter(|| black_box(assigner.variant(HERO_CTA_TEXT).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_select_variant, bench_assign);
criterion_main!(benches);
