//! Experiment definition - named set of weighted variants

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Tolerance applied when checking that weights sum to one.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// One labeled option within an experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    label: String,
    weight: f64,
}

impl Variant {
    /// Create a variant with the given label and weight.
    #[must_use]
    pub fn new(label: impl Into<String>, weight: f64) -> Self {
        Self {
            label: label.into(),
            weight,
        }
    }

    /// Get the variant label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get the variant weight.
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }
}

/// A/B experiment: a name and an ordered list of weighted variants.
///
/// Declaration order matters: it fixes how `[0, 1)` is partitioned into
/// sub-intervals during bucketing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawExperiment", into = "RawExperiment")]
pub struct Experiment {
    name: String,
    variants: Vec<Variant>,
}

impl Experiment {
    /// Create an experiment, checking the weight invariants.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidExperiment`] when the variant list is empty,
    /// a weight is negative or not finite, or the weights do not sum to 1
    /// within [`WEIGHT_SUM_TOLERANCE`].
    pub fn new(name: impl Into<String>, variants: Vec<Variant>) -> Result<Self> {
        let name = name.into();
        let invalid = |reason: String| Error::InvalidExperiment {
            name: name.clone(),
            reason,
        };

        if variants.is_empty() {
            return Err(invalid("no variants declared".to_string()));
        }
        if let Some(bad) = variants
            .iter()
            .find(|v| !v.weight.is_finite() || v.weight < 0.0)
        {
            return Err(invalid(format!(
                "variant '{}' has invalid weight {}",
                bad.label, bad.weight
            )));
        }
        let total: f64 = variants.iter().map(Variant::weight).sum();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(invalid(format!("weights sum to {total}, expected 1.0")));
        }

        Ok(Self { name, variants })
    }

    /// Build from `(label, weight)` pairs.
    ///
    /// # Errors
    ///
    /// Same as [`Experiment::new`].
    pub fn from_pairs<'a>(
        name: impl Into<String>,
        pairs: impl IntoIterator<Item = (&'a str, f64)>,
    ) -> Result<Self> {
        Self::new(
            name,
            pairs
                .into_iter()
                .map(|(label, weight)| Variant::new(label, weight))
                .collect(),
        )
    }

    /// Get the experiment name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the variants in declaration order.
    #[must_use]
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    /// Check whether `label` is one of this experiment's variants.
    #[must_use]
    pub fn has_variant(&self, label: &str) -> bool {
        self.variants.iter().any(|v| v.label == label)
    }
}

/// Unchecked wire shape, validated on the way in.
#[derive(Serialize, Deserialize)]
struct RawExperiment {
    name: String,
    variants: Vec<Variant>,
}

impl TryFrom<RawExperiment> for Experiment {
    type Error = Error;

    fn try_from(raw: RawExperiment) -> Result<Self> {
        Self::new(raw.name, raw.variants)
    }
}

impl From<Experiment> for RawExperiment {
    fn from(experiment: Experiment) -> Self {
        Self {
            name: experiment.name,
            variants: experiment.variants,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experiment_from_pairs() {
        let experiment =
            Experiment::from_pairs("pricing_highlight", [("most_popular", 0.5), ("best_value", 0.5)])
                .unwrap();

        assert_eq!(experiment.name(), "pricing_highlight");
        assert_eq!(experiment.variants().len(), 2);
        assert!(experiment.has_variant("best_value"));
        assert!(!experiment.has_variant("recommended"));
    }

    #[test]
    fn test_experiment_tolerates_rounding() {
        // 0.1 + 0.2 + 0.7 is not exactly 1.0 in binary floating point
        let experiment = Experiment::from_pairs("x", [("a", 0.1), ("b", 0.2), ("c", 0.7)]);
        assert!(experiment.is_ok());
    }

    #[test]
    fn test_experiment_rejects_empty() {
        let err = Experiment::new("empty", vec![]).unwrap_err();
        assert!(err.to_string().contains("no variants"));
    }

    #[test]
    fn test_experiment_rejects_negative_weight() {
        let err = Experiment::from_pairs("neg", [("a", 1.5), ("b", -0.5)]).unwrap_err();
        assert!(err.to_string().contains("invalid weight"));
    }

    #[test]
    fn test_experiment_rejects_bad_sum() {
        let err = Experiment::from_pairs("sum", [("a", 0.5), ("b", 0.4)]).unwrap_err();
        assert!(err.to_string().contains("expected 1.0"));
    }

    #[test]
    fn test_experiment_deserialization_validates() {
        let bad = r#"{"name":"x","variants":[{"label":"a","weight":0.2}]}"#;
        assert!(serde_json::from_str::<Experiment>(bad).is_err());

        let good = r#"{"name":"x","variants":[{"label":"a","weight":1.0}]}"#;
        let experiment: Experiment = serde_json::from_str(good).unwrap();
        assert_eq!(experiment.variants()[0].label(), "a");
    }
}
