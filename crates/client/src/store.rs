//! Local key-value storage.
//!
//! Mirrors the browser's persistent string store: session identity and
//! profile snapshots live here as JSON strings. Two implementations:
//! [`MemoryStore`] for embedding and tests, [`FileStore`] which persists the
//! whole map to a JSON file after every write.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use thiserror::Error;

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value is not the JSON it should be.
    #[error("Corrupt value under '{key}': {source}")]
    Corrupt {
        /// Offending key.
        key: String,
        /// Parse failure.
        source: serde_json::Error,
    },

    /// A value could not be encoded for storage.
    #[error("Failed to encode value: {0}")]
    Encode(serde_json::Error),

    /// Another thread panicked while holding the store lock.
    #[error("Store lock poisoned")]
    Poisoned,
}

/// String key-value storage shared by sessions and snapshot caches.
///
/// Access is unsynchronised across processes: concurrent writers race and
/// the last write wins.
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Insert or replace a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a value; returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn remove(&self, key: &str) -> Result<bool, StoreError>;
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with entries.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.remove(key).is_some())
    }
}

/// Store persisted as a single JSON object on disk.
#[derive(Debug)]
pub struct FileStore {
    entries: RwLock<HashMap<String, String>>,
    file_path: PathBuf,
}

impl FileStore {
    /// Open the store at `path`, creating parent directories and an empty
    /// file when missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or holds invalid JSON.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let entries = match std::fs::read(&file_path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => HashMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                key: file_path.display().to_string(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                std::fs::write(&file_path, b"{}")?;
                HashMap::new()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            entries: RwLock::new(entries),
            file_path,
        })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(entries).map_err(StoreError::Encode)?;
        std::fs::write(&self.file_path, data)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    // Writes go to disk first; the in-memory map only changes once the file
    // holds the new state.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        if !entries.contains_key(key) {
            return Ok(false);
        }
        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next)?;
        *entries = next;
        Ok(true)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("tripnest_store_{}", uuid::Uuid::new_v4()))
            .join("store.json")
    }

    #[test]
    fn test_memory_store_crud() {
        let store = MemoryStore::new();
        assert_eq!(store.get("accessToken").unwrap(), None);

        store.set("accessToken", "abc").unwrap();
        assert_eq!(store.get("accessToken").unwrap().as_deref(), Some("abc"));

        assert!(store.remove("accessToken").unwrap());
        assert!(!store.remove("accessToken").unwrap());
    }

    #[test]
    fn test_file_store_persists_across_reopen() {
        let path = temp_path();

        let store = FileStore::open(&path).unwrap();
        store.set("hotel_profile", r#"{"id":1}"#).unwrap();
        store.set("accessToken", "t").unwrap();
        store.remove("accessToken").unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("hotel_profile").unwrap().as_deref(),
            Some(r#"{"id":1}"#)
        );
        assert_eq!(reopened.get("accessToken").unwrap(), None);

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_file_store_failed_write_leaves_memory_unchanged() {
        let path = temp_path();
        let store = FileStore::open(&path).unwrap();
        store.set("hotel_profile", r#"{"id":1}"#).unwrap();

        // A directory in place of the file makes every write fail.
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        assert!(matches!(
            store.set("hotel_profile", r#"{"id":2}"#),
            Err(StoreError::Io(_))
        ));
        assert!(store.remove("hotel_profile").is_err());
        assert_eq!(
            store.get("hotel_profile").unwrap().as_deref(),
            Some(r#"{"id":1}"#)
        );

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let path = temp_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }
}
