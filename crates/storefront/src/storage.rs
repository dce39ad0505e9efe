//! Durable named text slots.
//!
//! A slot holds one UTF-8 document, overwritten in full on every write. The
//! cart session keeps its snapshot in a single slot.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from reading or writing a storage slot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The slot name cannot be used as a file name.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// Key/value storage for durable snapshots.
pub trait SnapshotStorage {
    /// Read the slot. `Ok(None)` when it has never been written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the slot exists but cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the slot cannot be written.
    fn write(&mut self, key: &str, contents: &str) -> Result<(), StorageError>;
}

/// Process-local storage, mostly for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
}

impl MemoryStorage {
    /// Create storage with one pre-filled slot.
    #[must_use]
    pub fn with_slot(key: impl Into<String>, contents: impl Into<String>) -> Self {
        let mut slots = HashMap::new();
        slots.insert(key.into(), contents.into());
        Self { slots }
    }

    /// Raw slot contents.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(String::as_str)
    }
}

impl SnapshotStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, contents: &str) -> Result<(), StorageError> {
        self.slots.insert(key.to_owned(), contents.to_owned());
        Ok(())
    }
}

/// One `<key>.json` file per slot inside a data directory.
///
/// The directory is created on first write.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create file storage rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Data directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidKey` for empty keys or keys containing
    /// path separators.
    pub fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\']);
        if !valid {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl SnapshotStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn write(&mut self, key: &str, contents: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        std::fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            source,
        })?;
        std::fs::write(&path, contents).map_err(|source| StorageError::Io { path, source })
    }
}
