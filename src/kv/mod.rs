//! Key-Value Store Module
//!
//! The landing page keeps all visitor state (A/B assignments, trial start,
//! theme, cookie consent) in a string-to-string store with browser-local
//! semantics:
//! - last write wins, no transactions
//! - values survive restarts when the backend is durable
//!
//! # Example
//!
//! ```rust
//! use boostly::kv::{KvStore, MemoryKvStore};
//!
//! # fn example() -> boostly::Result<()> {
//! let store = MemoryKvStore::new();
//!
//! store.set("theme", "dark")?;
//! assert_eq!(store.get("theme")?, Some("dark".to_string()));
//!
//! store.delete("theme")?;
//! assert!(!store.exists("theme")?);
//! # Ok(())
//! # }
//! ```

mod file;
mod memory;

pub use file::FileKvStore;
pub use memory::MemoryKvStore;

use crate::Result;

/// Well-known keys persisted by the landing page.
pub mod keys {
    /// `"true"` once the visitor has logged in.
    pub const USER_LOGGED_IN: &str = "userLoggedIn";
    /// ISO-8601 instant the trial started.
    pub const TRIAL_START_DATE: &str = "trialStartDate";
    /// `light` or `dark`.
    pub const THEME: &str = "theme";
    /// `true`, `false` or `custom`.
    pub const COOKIES_ACCEPTED: &str = "cookies-accepted";
    /// `true` or `false`.
    pub const ANALYTICS_COOKIES: &str = "analytics-cookies";
    /// `true` or `false`.
    pub const MARKETING_COOKIES: &str = "marketing-cookies";

    /// Key holding the assigned variant for an experiment.
    #[must_use]
    pub fn ab_test(experiment: &str) -> String {
        format!("ab_{experiment}")
    }
}

/// Key-value store trait abstracting browser local storage.
///
/// Implementations must be usable from shared references so that several
/// page components can hold the same store.
pub trait KvStore {
    /// Get a value by key.
    ///
    /// Returns `None` if the key doesn't exist.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Set a value for a key.
    ///
    /// Overwrites any existing value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a key.
    ///
    /// No-op if the key doesn't exist.
    fn delete(&self, key: &str) -> Result<()>;

    /// Check if a key exists.
    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Get multiple keys in a batch.
    ///
    /// Returns values in the same order as keys. Missing keys return `None`.
    fn batch_get(&self, keys: &[&str]) -> Result<Vec<Option<String>>> {
        keys.iter().map(|key| self.get(key)).collect()
    }

    /// Set multiple key-value pairs in a batch.
    fn batch_set(&self, pairs: &[(&str, &str)]) -> Result<()> {
        for (key, value) in pairs {
            self.set(key, value)?;
        }
        Ok(())
    }
}

impl<S: KvStore + ?Sized> KvStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }

    fn exists(&self, key: &str) -> Result<bool> {
        (**self).exists(key)
    }

    fn batch_get(&self, keys: &[&str]) -> Result<Vec<Option<String>>> {
        (**self).batch_get(keys)
    }

    fn batch_set(&self, pairs: &[(&str, &str)]) -> Result<()> {
        (**self).batch_set(pairs)
    }
}

impl<S: KvStore + ?Sized> KvStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }

    fn exists(&self, key: &str) -> Result<bool> {
        (**self).exists(key)
    }

    fn batch_get(&self, keys: &[&str]) -> Result<Vec<Option<String>>> {
        (**self).batch_get(keys)
    }

    fn batch_set(&self, pairs: &[(&str, &str)]) -> Result<()> {
        (**self).batch_set(pairs)
    }
}
