//! A/B Experiments
//!
//! Visitors are bucketed into experiment variants by weight, once, and the
//! choice is remembered in the key-value store so a returning visitor always
//! sees the same variant.
//!
//! ## Bucketing
//!
//! ```text
//! weights   0.4        0.3        0.3
//!         [──────────|──────────|──────────)
//!         0         0.4        0.7        1.0
//!                          ▲
//!                          r = 0.55  →  variant #2
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use boostly::experiment::{Experiment, ExperimentRegistry};
//!
//! let mut registry = ExperimentRegistry::new();
//! registry.insert(Experiment::from_pairs(
//!     "signup_button_color",
//!     [("green", 0.5), ("purple", 0.5)],
//! )?);
//! assert_eq!(registry.len(), 1);
//! # Ok::<(), boostly::Error>(())
//! ```

mod assigner;
mod definition;
mod registry;

pub use assigner::{select_variant, VariantAssigner, VariantAssignment};
pub use definition::{Experiment, Variant, WEIGHT_SUM_TOLERANCE};
pub use registry::{ExperimentRegistry, HERO_CTA_TEXT, PRICING_HIGHLIGHT};
