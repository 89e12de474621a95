//! Key-value storage and the task storage adapter.
//!
//! `KeyValueStore` is the narrow get/set/remove capability the task list
//! persists through. `FileStore` keeps every key in one JSON object on disk,
//! `MemoryStore` keeps them in memory. `TaskStorage` serializes the whole task
//! list under a single fixed key.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::Result;
use crate::task::TaskRecord;

/// Key under which the task list is stored.
pub const TASKS_KEY: &str = "tasks";

/// A synchronous string key-value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Key-value store backed by a single JSON object file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    /// Read the whole map. A missing file is an empty map, and so is a file
    /// that does not hold a JSON object of strings.
    fn read_map(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let mut buf = String::new();
        File::open(&self.path)?.read_to_string(&mut buf)?;
        match serde_json::from_str(&buf) {
            Ok(map) => Ok(map),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "store file is not a JSON object, starting fresh"
                );
                Ok(BTreeMap::new())
            }
        }
    }

    /// Write the map using temp file + rename.
    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<()> {
        let tmp = self.path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(map)?;
        let mut f = File::create(&tmp)?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_map()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let mut map = self.read_map()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

/// In-memory key-value store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store doubles for tests elsewhere in the crate.
#[cfg(test)]
pub mod testing {
    use super::KeyValueStore;
    use crate::error::{Error, Result};

    /// Reads as empty and refuses every write.
    #[derive(Debug, Default)]
    pub struct FullDiskStore;

    impl KeyValueStore for FullDiskStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::Io(std::io::Error::other("disk full")))
        }

        fn remove(&mut self, _key: &str) -> Result<()> {
            Err(Error::Io(std::io::Error::other("disk full")))
        }
    }
}

/// Persists the task list under [`TASKS_KEY`].
#[derive(Debug)]
pub struct TaskStorage<S> {
    store: S,
}

impl<S: KeyValueStore> TaskStorage<S> {
    pub fn new(store: S) -> Self {
        TaskStorage { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Overwrite the stored list with `records`.
    pub fn save(&mut self, records: &[TaskRecord]) -> Result<()> {
        let data = serde_json::to_string(records)?;
        self.store.set(TASKS_KEY, &data)?;
        debug!(count = records.len(), "saved tasks");
        Ok(())
    }

    /// Load the stored list. Anything unreadable comes back empty.
    pub fn load(&self) -> Vec<TaskRecord> {
        let raw = match self.store.get(TASKS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "could not read task store, starting empty");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "stored tasks are malformed, starting empty");
                Vec::new()
            }
        }
    }

    /// Remove the stored list entirely.
    pub fn clear(&mut self) -> Result<()> {
        self.store.remove(TASKS_KEY)?;
        debug!("cleared stored tasks");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Task, TaskKind};
    use chrono::{Local, TimeZone};

    fn sample_records() -> Vec<TaskRecord> {
        let at = Local.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut done = Task::with_created("done", TaskKind::Base, at);
        done.completed = true;
        let premium = Task::with_created(
            "shiny",
            TaskKind::Premium { icon_ref: "star.png".into() },
            at,
        );
        vec![done.to_record(), premium.to_record()]
    }

    #[test]
    fn test_load_absent_key_is_empty() {
        let storage = TaskStorage::new(MemoryStore::new());
        assert!(storage.load().is_empty());
    }

    #[test]
    fn test_load_malformed_is_empty() {
        let mut store = MemoryStore::new();
        store.set(TASKS_KEY, "{not json").unwrap();
        let storage = TaskStorage::new(store);
        assert!(storage.load().is_empty());

        let mut store = MemoryStore::new();
        store.set(TASKS_KEY, r#"[{"text": 3}]"#).unwrap();
        assert!(TaskStorage::new(store).load().is_empty());
    }

    #[test]
    fn test_save_then_load_memory() {
        let mut storage = TaskStorage::new(MemoryStore::new());
        let records = sample_records();
        storage.save(&records).unwrap();
        assert_eq!(storage.load(), records);
    }

    #[test]
    fn test_save_overwrites_and_clear_removes() {
        let mut storage = TaskStorage::new(MemoryStore::new());
        storage.save(&sample_records()).unwrap();
        storage.save(&[]).unwrap();
        assert_eq!(storage.store().raw(TASKS_KEY), Some("[]"));
        storage.clear().unwrap();
        assert_eq!(storage.store().raw(TASKS_KEY), None);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let mut storage = TaskStorage::new(FileStore::new(&path));
        let records = sample_records();
        storage.save(&records).unwrap();

        let reopened = TaskStorage::new(FileStore::new(&path));
        assert_eq!(reopened.load(), records);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_file_store_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let mut store = FileStore::new(&path);
        store.set("theme", "dark").unwrap();

        let mut storage = TaskStorage::new(store);
        storage.save(&sample_records()).unwrap();
        storage.clear().unwrap();

        let store = FileStore::new(&path);
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(store.get(TASKS_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_garbage_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "garbage").unwrap();
        let storage = TaskStorage::new(FileStore::new(&path));
        assert!(storage.load().is_empty());
    }
}
