//! File-backed KV store.
//!
//! Keeps the whole store as one JSON object on disk so visitor state
//! survives process restarts, the way browser local storage survives a
//! page reload. Every write rewrites the file through a temporary sibling
//! and an atomic rename. The in-memory view only changes once the file has
//! been replaced, so a failed write leaves both untouched.

use super::KvStore;
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Durable key-value store persisted as a JSON file.
///
/// # Example
///
/// ```rust,no_run
/// use boostly::kv::{FileKvStore, KvStore};
///
/// # fn example() -> boostly::Result<()> {
/// let store = FileKvStore::open("visitor-state.json")?;
/// store.set("theme", "dark")?;
///
/// let reopened = FileKvStore::open("visitor-state.json")?;
/// assert_eq!(reopened.get("theme")?, Some("dark".to_string()));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FileKvStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileKvStore {
    /// Open the store at `path`, creating an empty one if the file is absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and
    /// [`Error::Json`] if it does not hold a JSON object of strings.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), entries = entries.len(), "opened file kv store");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| Error::Storage("file kv store lock poisoned".to_string()))
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.lock()?;
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut entries = self.lock()?;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }

    fn batch_set(&self, pairs: &[(&str, &str)]) -> Result<()> {
        let mut entries = self.lock()?;
        let mut next = entries.clone();
        for (key, value) in pairs {
            next.insert((*key).to_string(), (*value).to_string());
        }
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.lock()?.contains_key(key))
    }
}
