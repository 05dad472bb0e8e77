//! Persistence for the two durable stores.
//!
//! Inventory and stage progress are the only state that survives a reload.
//! Each is one JSON-array blob under a fixed key; blobs are rewritten
//! synchronously on every mutation. A corrupt or missing blob loads as the
//! empty default - persistence problems never surface to the player.

use crate::items::Inventory;
use crate::progress::StageProgress;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Key for the persisted inventory snapshot.
pub const INVENTORY_KEY: &str = "pangyo_inventory";

/// Key for the persisted completed-stage set.
pub const PROGRESS_KEY: &str = "pangyo_completed_stages";

/// Errors from persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A flat string key-value store.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
}

/// In-memory store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed store holding all keys in one JSON object.
///
/// Every `put` rewrites the file so a crash can lose at most the last
/// mutation.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    map: HashMap<String, String>,
}

impl JsonFileStore {
    /// Open a store at the given path. A missing or unreadable file yields
    /// an empty store.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let map = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "corrupt save file, starting empty");
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self { path, map }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.map.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(&self.map)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

/// Load a value under a key, falling back to the default on any problem.
fn load_or_default<T: DeserializeOwned + Default>(store: &dyn KeyValueStore, key: &str) -> T {
    let Some(blob) = store.get(key) else {
        return T::default();
    };
    match serde_json::from_str(&blob) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "corrupt persisted blob, using default");
            T::default()
        }
    }
}

fn save<T: Serialize>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), PersistError> {
    let blob = serde_json::to_string(value)?;
    store.put(key, &blob)
}

pub fn load_inventory(store: &dyn KeyValueStore) -> Inventory {
    load_or_default(store, INVENTORY_KEY)
}

pub fn save_inventory(
    store: &mut dyn KeyValueStore,
    inventory: &Inventory,
) -> Result<(), PersistError> {
    save(store, INVENTORY_KEY, inventory)
}

pub fn load_progress(store: &dyn KeyValueStore) -> StageProgress {
    load_or_default(store, PROGRESS_KEY)
}

pub fn save_progress(
    store: &mut dyn KeyValueStore,
    progress: &StageProgress,
) -> Result<(), PersistError> {
    save(store, PROGRESS_KEY, progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{stage_reward, DICTIONARY_ID};

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        let mut inventory = Inventory::new();
        inventory.add(stage_reward(1).unwrap().clone());

        save_inventory(&mut store, &inventory).unwrap();
        let restored = load_inventory(&store);
        assert!(restored.has(DICTIONARY_ID));
    }

    #[test]
    fn test_missing_blob_yields_default() {
        let store = MemoryStore::new();
        assert!(load_inventory(&store).is_empty());
        assert!(load_progress(&store).is_empty());
    }

    #[test]
    fn test_corrupt_blob_yields_default() {
        let mut store = MemoryStore::new();
        store.put(INVENTORY_KEY, "{not json").unwrap();
        store.put(PROGRESS_KEY, r#"{"wrong": "shape"}"#).unwrap();

        assert!(load_inventory(&store).is_empty());
        assert!(load_progress(&store).is_empty());
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("save.json");

        {
            let mut store = JsonFileStore::open(&path);
            let mut progress = StageProgress::new();
            progress.mark_complete(1);
            progress.mark_complete(2);
            save_progress(&mut store, &progress).unwrap();
        }

        let store = JsonFileStore::open(&path);
        let progress = load_progress(&store);
        assert!(progress.is_complete(1));
        assert!(progress.is_complete(2));
        assert!(!progress.is_complete(3));
    }

    #[test]
    fn test_file_store_corrupt_file_starts_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("save.json");
        std::fs::write(&path, "garbage!!").unwrap();

        let store = JsonFileStore::open(&path);
        assert!(store.get(INVENTORY_KEY).is_none());
    }
}
