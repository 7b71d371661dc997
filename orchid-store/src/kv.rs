//! String key-value store: the device-local persistence layer.
//!
//! [`FileStore`] persists one JSON object at `<home>/.orchid/store.json`.
//! Every mutation rewrites the whole document with the same atomic `.tmp` +
//! rename pattern used for the config directory, so a crash mid-write leaves
//! the previous document intact. [`MemoryStore`] backs tests.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{io_err, StoreError};

/// Snapshot of the store document. Ordered so key listings are stable.
pub type StoreMap = BTreeMap<String, String>;

/// Async-storage style key-value API. Values are JSON-encoded strings.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// All keys, sorted.
    fn all_keys(&self) -> Result<Vec<String>, StoreError>;

    /// Values for `keys`, in the order given; absent keys pair with `None`.
    fn multi_get(&self, keys: &[String]) -> Result<Vec<(String, Option<String>)>, StoreError>;

    fn multi_remove(&self, keys: &[String]) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// `<home>/.orchid/store.json`
pub fn store_path_at(home: &Path) -> PathBuf {
    orchid_core::config::orchid_root(home).join("store.json")
}

/// Store backed by a single JSON document on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store at an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<home>/.orchid/store.json`.
    pub fn at_home(home: &Path) -> Self {
        Self::new(store_path_at(home))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document. An absent or empty file is an empty store.
    pub fn load(&self) -> Result<StoreMap, StoreError> {
        if !self.path.exists() {
            return Ok(StoreMap::new());
        }
        let contents = std::fs::read_to_string(&self.path).map_err(|e| io_err(&self.path, e))?;
        if contents.trim().is_empty() {
            return Ok(StoreMap::new());
        }
        serde_json::from_str(&contents).map_err(|e| StoreError::Corrupt {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Save the document atomically.
    ///
    /// Writes to `<path>.tmp`, restricts it to `0600`, then renames over `<path>`.
    pub fn save(&self, map: &StoreMap) -> Result<(), StoreError> {
        let Some(dir) = self.path.parent() else {
            return Err(io_err(
                &self.path,
                std::io::Error::other("invalid store path"),
            ));
        };
        if !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
            set_dir_permissions(dir)?;
        }

        let json = serde_json::to_string_pretty(map)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
        set_file_permissions(&tmp)?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(io_err(&self.path, e));
        }
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut StoreMap) -> bool) -> Result<(), StoreError> {
        let mut map = self.load()?;
        if f(&mut map) {
            self.save(&map)?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        tracing::debug!(key, "store set");
        self.update(|map| {
            map.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        tracing::debug!(key, "store remove");
        self.update(|map| map.remove(key).is_some())
    }

    fn all_keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.load()?.into_keys().collect())
    }

    fn multi_get(&self, keys: &[String]) -> Result<Vec<(String, Option<String>)>, StoreError> {
        let map = self.load()?;
        Ok(keys
            .iter()
            .map(|k| (k.clone(), map.get(k).cloned()))
            .collect())
    }

    fn multi_remove(&self, keys: &[String]) -> Result<(), StoreError> {
        tracing::debug!(count = keys.len(), "store multi-remove");
        self.update(|map| {
            let mut changed = false;
            for key in keys {
                changed |= map.remove(key).is_some();
            }
            changed
        })
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Process-local store; contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: Mutex<StoreMap>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> StoreMap {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreMap> {
        self.map.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.lock().remove(key);
        Ok(())
    }

    fn all_keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.lock().keys().cloned().collect())
    }

    fn multi_get(&self, keys: &[String]) -> Result<Vec<(String, Option<String>)>, StoreError> {
        let map = self.lock();
        Ok(keys
            .iter()
            .map(|k| (k.clone(), map.get(k).cloned()))
            .collect())
    }

    fn multi_remove(&self, keys: &[String]) -> Result<(), StoreError> {
        let mut map = self.lock();
        for key in keys {
            map.remove(key);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_store_when_file_missing() {
        let home = TempDir::new().unwrap();
        let store = FileStore::at_home(home.path());
        assert!(store.all_keys().unwrap().is_empty());
        assert_eq!(store.get("orchid_1").unwrap(), None);
    }

    #[test]
    fn set_get_remove_persist_across_instances() {
        let home = TempDir::new().unwrap();
        FileStore::at_home(home.path()).set("orchid_1", "{}").unwrap();

        let reopened = FileStore::at_home(home.path());
        assert_eq!(reopened.get("orchid_1").unwrap().as_deref(), Some("{}"));

        reopened.remove("orchid_1").unwrap();
        assert_eq!(FileStore::at_home(home.path()).get("orchid_1").unwrap(), None);
    }

    #[test]
    fn tmp_file_cleaned_up_after_save() {
        let home = TempDir::new().unwrap();
        let store = FileStore::at_home(home.path());
        store.set("k", "v").unwrap();
        let tmp = store.path().with_extension("json.tmp");
        assert!(!tmp.exists(), "tmp file should be removed after atomic rename");
    }

    #[test]
    fn remove_absent_key_does_not_create_file() {
        let home = TempDir::new().unwrap();
        let store = FileStore::at_home(home.path());
        store.remove("nope").unwrap();
        assert!(!store.path().exists());
    }

    #[cfg(unix)]
    #[test]
    fn store_file_is_private() {
        use std::os::unix::fs::PermissionsExt;
        let home = TempDir::new().unwrap();
        let store = FileStore::at_home(home.path());
        store.set("userToken", "t").unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    fn multi_get_preserves_request_order() {
        let store = MemoryStore::new();
        store.set("b", "2").unwrap();
        store.set("a", "1").unwrap();
        let got = store
            .multi_get(&["b".to_string(), "missing".to_string(), "a".to_string()])
            .unwrap();
        assert_eq!(
            got,
            vec![
                ("b".to_string(), Some("2".to_string())),
                ("missing".to_string(), None),
                ("a".to_string(), Some("1".to_string())),
            ]
        );
    }
}
