//! Experiment Registry - the configured set of live experiments

use super::Experiment;
use crate::{Error, Result};
use rustc_hash::FxHashMap;

/// Name of the hero call-to-action copy experiment.
pub const HERO_CTA_TEXT: &str = "hero_cta_text";

/// Name of the pricing badge experiment.
pub const PRICING_HIGHLIGHT: &str = "pricing_highlight";

/// Lookup table of experiments by name.
///
/// The registry is plain configuration handed to the assigner; there is no
/// global experiment list.
#[derive(Debug, Clone, Default)]
pub struct ExperimentRegistry {
    experiments: FxHashMap<String, Experiment>,
}

impl ExperimentRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The experiments running on the Boostly landing page.
    #[must_use]
    pub fn landing_defaults() -> Self {
        let mut registry = Self::new();
        for experiment in default_experiments() {
            registry.insert(experiment);
        }
        registry
    }

    /// Parse a registry from a JSON array of experiments.
    ///
    /// ```rust
    /// use boostly::experiment::ExperimentRegistry;
    ///
    /// let registry = ExperimentRegistry::from_json(r#"[
    ///     {"name": "footer_copy", "variants": [
    ///         {"label": "short", "weight": 0.5},
    ///         {"label": "long", "weight": 0.5}
    ///     ]}
    /// ]"#)?;
    /// assert!(registry.get("footer_copy").is_some());
    /// # Ok::<(), boostly::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] for malformed JSON or invalid weights, and
    /// [`Error::InvalidInput`] when a name is declared twice.
    pub fn from_json(json: &str) -> Result<Self> {
        let experiments: Vec<Experiment> = serde_json::from_str(json)?;
        let mut registry = Self::new();
        for experiment in experiments {
            if registry.get(experiment.name()).is_some() {
                return Err(Error::InvalidInput(format!(
                    "experiment '{}' declared twice",
                    experiment.name()
                )));
            }
            registry.insert(experiment);
        }
        Ok(registry)
    }

    /// Add or replace an experiment.
    pub fn insert(&mut self, experiment: Experiment) {
        self.experiments
            .insert(experiment.name().to_string(), experiment);
    }

    /// Get an experiment by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Experiment> {
        self.experiments.get(name)
    }

    /// Experiment names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.experiments.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of experiments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.experiments.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
    }
}

fn default_experiments() -> Vec<Experiment> {
    // Weights are literal and sum to one, so construction cannot fail.
    [
        Experiment::from_pairs(
            HERO_CTA_TEXT,
            [
                ("Start free trial", 0.4),
                ("Try Boostly free", 0.3),
                ("Get started now", 0.3),
            ],
        ),
        Experiment::from_pairs(
            PRICING_HIGHLIGHT,
            [
                ("most_popular", 0.5),
                ("best_value", 0.25),
                ("recommended", 0.25),
            ],
        ),
    ]
    .into_iter()
    .filter_map(Result::ok)
    .collect()
}
