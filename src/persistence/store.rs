//! Key/value stores for persisted strings

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("store serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key/value storage (LocalStorage-shaped)
pub trait Store {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store for tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON object on disk, rewritten in full on every set.
///
/// Writes go to a sibling `.tmp` file that is then renamed over the target.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open a store file. A missing file is an empty store; an unreadable
    /// or malformed one is logged and treated as empty.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(values) => values,
                Err(e) => {
                    log::warn!("Ignoring malformed store {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                log::warn!("Could not read store {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.values)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn temp_path(name: &str) -> PathBuf {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!(
            "lane_rush_store_{}_{}_{}.json",
            name,
            std::process::id(),
            n
        ))
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("a").ok().flatten(), None);
        store.set("a", "1").ok();
        store.set("a", "2").ok();
        assert_eq!(store.get("a").ok().flatten().as_deref(), Some("2"));
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let path = temp_path("persist");
        {
            let mut store = FileStore::open(&path);
            assert!(store.set("coins", "abc").is_ok());
        }
        let store = FileStore::open(&path);
        assert_eq!(store.path(), path.as_path());
        assert_eq!(store.get("coins").ok().flatten().as_deref(), Some("abc"));
        assert!(!path.with_extension("tmp").exists());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_malformed_file_is_empty_store() {
        let path = temp_path("malformed");
        fs::write(&path, "{ not json").ok();
        let mut store = FileStore::open(&path);
        assert_eq!(store.get("coins").ok().flatten(), None);

        // Writing replaces the broken file
        assert!(store.set("coins", "1").is_ok());
        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("coins").ok().flatten().as_deref(), Some("1"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_directory_reports_error() {
        let path = std::env::temp_dir()
            .join("lane_rush_no_such_dir_for_tests")
            .join("store.json");
        let mut store = FileStore::open(&path);
        assert!(matches!(store.set("k", "v"), Err(StoreError::Io(_))));
    }
}
