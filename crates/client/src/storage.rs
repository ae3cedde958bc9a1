//! Persistent client storage.
//!
//! The SDK keeps all durable state (session, refresh credential, cart)
//! behind the [`StorageBackend`] trait so the embedding application decides
//! where it lives: [`MemoryStorage`] for tests and throwaway clients,
//! [`FileStorage`] for the CLI. Backends store opaque strings under fixed
//! keys; serialization policy belongs to the callers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tracing::warn;

/// Fixed keys for the SDK's persisted state.
pub mod keys {
    /// Serialized [`crate::Session`] JSON.
    pub const SESSION: &str = "folio-session";
    /// Opaque refresh credential string.
    pub const REFRESH_CREDENTIAL: &str = "folio-refresh-credential";
    /// Serialized cart JSON.
    pub const CART: &str = "folio-cart";
}

/// Errors that can occur when reading or writing persisted state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file could not be serialized.
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Key-value storage for the SDK's durable state.
///
/// Values are opaque strings. `get` of an absent key is `Ok(None)`;
/// `remove` of an absent key is a no-op.
pub trait StorageBackend: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any existing value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-memory storage backend. State is lost when the value is dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

// =============================================================================
// FileStorage
// =============================================================================

/// File-backed storage: a single JSON object mapping keys to string values.
///
/// The whole map is held in memory and rewritten to disk on every mutation.
/// An unreadable or corrupt state file is treated as empty rather than
/// erroring, matching the self-healing policy for individual entries.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    /// Open (or create on first write) the state file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::load(&path);
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn load(path: &Path) -> HashMap<String, String> {
        let Ok(contents) = std::fs::read_to_string(path) else {
            return HashMap::new();
        };
        match serde_json::from_str(&contents) {
            Ok(entries) => entries,
            Err(error) => {
                warn!(path = %path.display(), %error, "state file is corrupt, starting empty");
                HashMap::new()
            }
        }
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl StorageBackend for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_roundtrip() {
        let storage = MemoryStorage::new();
        assert!(storage.get("k").unwrap().is_none());

        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));

        storage.remove("k").unwrap();
        assert!(storage.get("k").unwrap().is_none());
    }

    #[test]
    fn test_memory_remove_absent_key_is_noop() {
        let storage = MemoryStorage::new();
        storage.remove("missing").unwrap();
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let storage = FileStorage::new(&path);
        storage.set("k", "v").unwrap();
        drop(storage);

        // A fresh handle sees the persisted value.
        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_file_missing_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("absent.json"));
        assert!(storage.get("k").unwrap().is_none());
    }

    #[test]
    fn test_file_corrupt_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "this is not json{{{").unwrap();

        let storage = FileStorage::new(&path);
        assert!(storage.get("k").unwrap().is_none());

        // Writing repairs the file.
        storage.set("k", "v").unwrap();
        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_file_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("state.json");

        let storage = FileStorage::new(&path);
        storage.set("k", "v").unwrap();
        assert!(path.exists());
    }
}
