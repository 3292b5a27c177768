//! Key-value persistence for preferences.
//!
//! The store only needs synchronous string-blob load/store under a fixed
//! key. `MemoryStorage` backs tests and ephemeral sessions; `FileStorage`
//! keeps one JSON file per key and swaps it in atomically so a crash can
//! never leave a half-written blob behind.

use crate::error::StorageError;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Synchronous key-value blob storage.
pub trait Storage: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn store(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// ─── MemoryStorage ───────────────────────────────────────────────────────────

/// In-memory storage. Contents live for the process lifetime.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().expect("storage lock poisoned").get(key).cloned())
    }

    fn store(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .expect("storage lock poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().expect("storage lock poisoned").remove(key);
        Ok(())
    }
}

// ─── FileStorage ─────────────────────────────────────────────────────────────

/// File-backed storage: one `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // Write-then-rename keeps the blob atomic on the same filesystem.
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.load("missing").unwrap(), None);

        storage.store("key", r#"{"a":1}"#).unwrap();
        assert_eq!(storage.load("key").unwrap().as_deref(), Some(r#"{"a":1}"#));

        storage.remove("key").unwrap();
        assert_eq!(storage.load("key").unwrap(), None);
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        assert_eq!(storage.load("prefs").unwrap(), None);
        storage.store("prefs", "blob-one").unwrap();
        assert_eq!(storage.load("prefs").unwrap().as_deref(), Some("blob-one"));

        // Overwrite replaces the whole record.
        storage.store("prefs", "blob-two").unwrap();
        assert_eq!(storage.load("prefs").unwrap().as_deref(), Some("blob-two"));

        storage.remove("prefs").unwrap();
        assert_eq!(storage.load("prefs").unwrap(), None);
        // Removing again is fine.
        storage.remove("prefs").unwrap();
    }
}
