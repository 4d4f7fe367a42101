//! Variant Assigner - sticky weighted bucketing of visitors

use super::{ExperimentRegistry, Variant};
use crate::events::{EventName, EventSink};
use crate::kv::{keys, KvStore};
use crate::Result;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Outcome of evaluating an experiment for the current visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantAssignment {
    experiment: String,
    variant: String,
    fresh: bool,
}

impl VariantAssignment {
    /// Get the experiment name.
    #[must_use]
    pub fn experiment(&self) -> &str {
        &self.experiment
    }

    /// Get the assigned variant label.
    #[must_use]
    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// Consume the assignment, keeping only the label.
    #[must_use]
    pub fn into_variant(self) -> String {
        self.variant
    }

    /// `true` if the variant was drawn by this evaluation, `false` if it was
    /// read back from the store.
    #[must_use]
    pub const fn is_fresh(&self) -> bool {
        self.fresh
    }
}

/// Pick the variant whose cumulative-weight interval contains `r`.
///
/// Walks `variants` in declaration order and returns the first one whose
/// running weight sum is `>= r`. If rounding leaves `r` above the final
/// sum, the last variant is returned. Returns `None` only for an empty
/// slice.
#[must_use]
pub fn select_variant(variants: &[Variant], r: f64) -> Option<&Variant> {
    let mut cumulative = 0.0;
    for variant in variants {
        cumulative += variant.weight();
        if r <= cumulative {
            return Some(variant);
        }
    }
    variants.last()
}

/// Assigns visitors to experiment variants and remembers the choice.
///
/// The first evaluation of an experiment draws a variant, persists it under
/// `ab_<experiment>` and records `ab_test_assigned`. Later evaluations
/// return the stored label with no side effects.
///
/// # Example
///
/// ```rust
/// use boostly::events::MemoryEventSink;
/// use boostly::experiment::{ExperimentRegistry, VariantAssigner};
/// use boostly::kv::MemoryKvStore;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// # fn example() -> boostly::Result<()> {
/// let store = MemoryKvStore::new();
/// let sink = MemoryEventSink::new();
/// let mut assigner = VariantAssigner::new(
///     ExperimentRegistry::landing_defaults(),
///     &store,
///     &sink,
///     StdRng::seed_from_u64(7),
/// );
///
/// let first = assigner.variant("hero_cta_text")?.unwrap();
/// let again = assigner.variant("hero_cta_text")?.unwrap();
/// assert_eq!(first, again);
/// assert_eq!(sink.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct VariantAssigner<S, E, R> {
    registry: ExperimentRegistry,
    store: S,
    sink: E,
    rng: R,
}

impl<S, E, R> VariantAssigner<S, E, R>
where
    S: KvStore,
    E: EventSink,
    R: RngCore,
{
    /// Create an assigner over the given registry and collaborators.
    pub const fn new(registry: ExperimentRegistry, store: S, sink: E, rng: R) -> Self {
        Self {
            registry,
            store,
            sink,
            rng,
        }
    }

    /// Get the experiment registry.
    #[must_use]
    pub const fn registry(&self) -> &ExperimentRegistry {
        &self.registry
    }

    /// Evaluate an experiment for the current visitor.
    ///
    /// Returns `Ok(None)` when `experiment` is not in the registry.
    ///
    /// # Errors
    ///
    /// Propagates key-value store failures.
    pub fn assign(&mut self, experiment: &str) -> Result<Option<VariantAssignment>> {
        let Some(definition) = self.registry.get(experiment) else {
            tracing::debug!(experiment, "unknown experiment, no assignment");
            return Ok(None);
        };

        let key = keys::ab_test(experiment);
        // An empty value is no assignment and gets re-bucketed
        if let Some(stored) = self.store.get(&key)?.filter(|v| !v.is_empty()) {
            return Ok(Some(VariantAssignment {
                experiment: experiment.to_string(),
                variant: stored,
                fresh: false,
            }));
        }

        let r: f64 = self.rng.gen();
        let Some(selected) = select_variant(definition.variants(), r) else {
            // Experiments are validated non-empty on construction.
            return Ok(None);
        };
        let variant = selected.label().to_string();

        self.store.set(&key, &variant)?;
        self.sink.record(
            EventName::AbTestAssigned,
            serde_json::json!({ "test": experiment, "variant": variant }),
        );
        tracing::debug!(experiment, variant = %variant, r, "assigned new variant");

        Ok(Some(VariantAssignment {
            experiment: experiment.to_string(),
            variant,
            fresh: true,
        }))
    }

    /// Evaluate an experiment and return only the variant label.
    ///
    /// # Errors
    ///
    /// Propagates key-value store failures.
    pub fn variant(&mut self, experiment: &str) -> Result<Option<String>> {
        Ok(self
            .assign(experiment)?
            .map(VariantAssignment::into_variant))
    }
}
