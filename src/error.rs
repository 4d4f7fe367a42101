//! Error types for Boostly
//!
//! Only storage I/O and configuration parsing can fail. Visitor-facing
//! problems (bad form input, unknown experiments, missing trial dates) are
//! ordinary values, never errors.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Boostly error types
#[derive(Error, Debug)]
pub enum Error {
    /// Key-value store backend failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Experiment definition violates the weight invariants
    #[error("Invalid experiment '{name}': {reason}")]
    InvalidExperiment {
        /// Experiment name
        name: String,
        /// What is wrong with it
        reason: String,
    },

    /// Invalid configuration or argument
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
