//! In-memory KV store implementation using `DashMap`.
//!
//! This is the default backend - data is lost on process restart.
//! For persistence, use [`FileKvStore`](super::FileKvStore).

use super::KvStore;
use crate::Result;
use dashmap::DashMap;

/// In-memory key-value store using a concurrent hashmap.
///
/// Uses `DashMap` internally for O(1) average-case operations, so a single
/// store can be shared by every page component and by scheduled tasks.
///
/// # Example
///
/// ```rust
/// use boostly::kv::{KvStore, MemoryKvStore};
///
/// # fn example() -> boostly::Result<()> {
/// let store = MemoryKvStore::new();
/// store.set("cookies-accepted", "true")?;
/// assert_eq!(store.get("cookies-accepted")?, Some("true".to_string()));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MemoryKvStore {
    store: DashMap<String, String>,
}

impl MemoryKvStore {
    /// Create a new in-memory KV store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: DashMap::new(),
        }
    }

    /// Create a store pre-populated with the given entries.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            store: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Get the number of entries in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.store.clear();
    }
}

impl Default for MemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.store.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.store.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.store.remove(key);
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.store.contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_kv_len_and_is_empty() {
        let store = MemoryKvStore::new();

        assert!(store.is_empty());
        assert_eq!(store.len(), 0);

        store.set("key1", "value1").unwrap();
        assert!(!store.is_empty());
        assert_eq!(store.len(), 1);

        store.set("key2", "value2").unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_memory_kv_clear() {
        let store = MemoryKvStore::with_entries([("key1", "value1"), ("key2", "value2")]);
        assert_eq!(store.len(), 2);

        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.get("key1").unwrap(), None);
    }

    #[test]
    fn test_memory_kv_empty_key_and_value() {
        let store = MemoryKvStore::new();

        store.set("", "").unwrap();
        assert_eq!(store.get("").unwrap(), Some(String::new()));
    }

    #[test]
    fn test_memory_kv_concurrent_access() {
        use std::sync::Arc;

        let store = Arc::new(MemoryKvStore::new());
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store.set(&format!("key{i}"), &format!("value{i}")).unwrap();
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        for i in 0..16 {
            assert_eq!(
                store.get(&format!("key{i}")).unwrap(),
                Some(format!("value{i}"))
            );
        }
    }

    #[test]
    fn test_memory_kv_default() {
        let store = MemoryKvStore::default();
        assert!(store.is_empty());
    }
}
