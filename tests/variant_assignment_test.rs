//! Variant assignment tests
//!
//! Stability, distribution and persistence of the weighted A/B bucketing.

use boostly::events::{EventName, MemoryEventSink};
use boostly::experiment::{
    select_variant, Experiment, ExperimentRegistry, VariantAssigner, HERO_CTA_TEXT,
    PRICING_HIGHLIGHT,
};
use boostly::kv::{FileKvStore, KvStore, MemoryKvStore};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

const HERO_LABELS: [&str; 3] = ["Start free trial", "Try Boostly free", "Get started now"];

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_empty_store_assigns_and_persists_hero_cta() {
    let store = MemoryKvStore::new();
    let sink = MemoryEventSink::new();
    let mut assigner = VariantAssigner::new(
        ExperimentRegistry::landing_defaults(),
        &store,
        &sink,
        StdRng::seed_from_u64(2026),
    );

    let first = assigner.variant(HERO_CTA_TEXT).unwrap().unwrap();
    assert!(HERO_LABELS.contains(&first.as_str()));
    assert_eq!(store.get("ab_hero_cta_text").unwrap(), Some(first.clone()));

    let second = assigner.variant(HERO_CTA_TEXT).unwrap().unwrap();
    assert_eq!(first, second);

    let events = sink.events_named(EventName::AbTestAssigned);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].payload["test"], "hero_cta_text");
    assert_eq!(events[0].payload["variant"], first.as_str());
}

#[test]
fn test_experiments_are_independent() {
    let store = MemoryKvStore::new();
    let sink = MemoryEventSink::new();
    let mut assigner = VariantAssigner::new(
        ExperimentRegistry::landing_defaults(),
        &store,
        &sink,
        StdRng::seed_from_u64(5),
    );

    assigner.variant(HERO_CTA_TEXT).unwrap();
    let pricing = assigner.variant(PRICING_HIGHLIGHT).unwrap().unwrap();

    assert!(["most_popular", "best_value", "recommended"].contains(&pricing.as_str()));
    assert_eq!(store.len(), 2);
    assert_eq!(sink.count(EventName::AbTestAssigned), 2);
}

#[test]
fn test_unknown_experiment_returns_none() {
    let store = MemoryKvStore::new();
    let sink = MemoryEventSink::new();
    let mut assigner = VariantAssigner::new(
        ExperimentRegistry::new(),
        &store,
        &sink,
        StdRng::seed_from_u64(5),
    );

    assert_eq!(assigner.variant(HERO_CTA_TEXT).unwrap(), None);
    assert!(store.is_empty());
    assert!(sink.is_empty());
}

#[test]
fn test_stored_variant_outside_registry_is_kept() {
    // Registry changed after the visitor was bucketed
    let store = MemoryKvStore::with_entries([("ab_hero_cta_text", "Book a demo")]);
    let sink = MemoryEventSink::new();
    let mut assigner = VariantAssigner::new(
        ExperimentRegistry::landing_defaults(),
        &store,
        &sink,
        StdRng::seed_from_u64(5),
    );

    let assignment = assigner.assign(HERO_CTA_TEXT).unwrap().unwrap();
    assert_eq!(assignment.variant(), "Book a demo");
    assert!(!assignment.is_fresh());
}

#[test]
fn test_assignment_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("local-storage.json");

    let first = {
        let store = FileKvStore::open(&path).unwrap();
        let sink = MemoryEventSink::new();
        let mut assigner = VariantAssigner::new(
            ExperimentRegistry::landing_defaults(),
            &store,
            &sink,
            StdRng::seed_from_u64(1),
        );
        assigner.variant(PRICING_HIGHLIGHT).unwrap().unwrap()
    };

    let store = FileKvStore::open(&path).unwrap();
    let sink = MemoryEventSink::new();
    // Different seed: only the stored value can explain a match
    let mut assigner = VariantAssigner::new(
        ExperimentRegistry::landing_defaults(),
        &store,
        &sink,
        StdRng::seed_from_u64(999),
    );
    assert_eq!(assigner.variant(PRICING_HIGHLIGHT).unwrap(), Some(first));
    assert!(sink.is_empty());
}

// =============================================================================
// Distribution
// =============================================================================

#[test]
fn test_fresh_visitors_follow_declared_weights() {
    const VISITORS: usize = 10_000;
    let registry = ExperimentRegistry::landing_defaults();
    let sink = MemoryEventSink::new();
    let mut rng = StdRng::seed_from_u64(0xB005_71E5);
    let mut counts: HashMap<String, usize> = HashMap::new();

    for _ in 0..VISITORS {
        // Each visitor has their own empty store
        let store = MemoryKvStore::new();
        let mut assigner = VariantAssigner::new(
            registry.clone(),
            &store,
            &sink,
            StdRng::seed_from_u64(rng.gen()),
        );
        let variant = assigner.variant(HERO_CTA_TEXT).unwrap().unwrap();
        *counts.entry(variant).or_default() += 1;
    }

    let expected = registry.get(HERO_CTA_TEXT).unwrap();
    for variant in expected.variants() {
        #[allow(clippy::cast_precision_loss)]
        let share = counts.get(variant.label()).copied().unwrap_or(0) as f64 / VISITORS as f64;
        // ~5 standard deviations at n = 10k
        assert!(
            (share - variant.weight()).abs() < 0.025,
            "{}: observed {share}, declared {}",
            variant.label(),
            variant.weight()
        );
    }
}

#[test]
fn test_uniform_grid_matches_weights_exactly() {
    let experiment =
        Experiment::from_pairs("grid", [("a", 0.5), ("b", 0.25), ("c", 0.25)]).unwrap();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for i in 0..10_000_u32 {
        let r = f64::from(i) / 10_000.0;
        let variant = select_variant(experiment.variants(), r).unwrap();
        *counts.entry(variant.label()).or_default() += 1;
    }

    // Interval ends are inclusive, so each boundary point lands left
    assert_eq!(counts["a"], 5001);
    assert_eq!(counts["b"], 2500);
    assert_eq!(counts["c"], 2499);
}
