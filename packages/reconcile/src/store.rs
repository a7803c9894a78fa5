//! Pluggable record stores keyed by record identity.
//!
//! The platform does not own a database; persistence is a seam. The
//! in-memory store backs tests and the JSON file store backs local runs,
//! and anything implementing [`RecordStore`] can replace them.

use std::collections::HashMap;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::Reconcilable;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error (file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A previous panic left the store lock poisoned.
    #[error("store lock poisoned")]
    Poisoned,
}

/// Keyed storage for one record family.
pub trait RecordStore<R: Reconcilable>: Send + Sync {
    /// Looks up the record with the given identity key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    fn find_by_key(&self, key: &R::Key) -> Result<Option<R>, StoreError>;

    /// Stores a new record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be written.
    fn create(&self, record: R) -> Result<(), StoreError>;

    /// Replaces the record stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be written.
    fn update(&self, key: &R::Key, record: R) -> Result<(), StoreError>;

    /// Returns every stored record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    fn all(&self) -> Result<Vec<R>, StoreError>;
}

/// In-memory store used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore<R: Reconcilable> {
    records: Mutex<HashMap<R::Key, R>>,
}

impl<R: Reconcilable> MemoryStore<R> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
        }
    }
}

impl<R> RecordStore<R> for MemoryStore<R>
where
    R: Reconcilable + Clone + Send,
    R::Key: Eq + Hash + Clone + Send,
{
    fn find_by_key(&self, key: &R::Key) -> Result<Option<R>, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records.get(key).cloned())
    }

    fn create(&self, record: R) -> Result<(), StoreError> {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        records.insert(record.key(), record);
        Ok(())
    }

    fn update(&self, key: &R::Key, record: R) -> Result<(), StoreError> {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        records.insert(key.clone(), record);
        Ok(())
    }

    fn all(&self) -> Result<Vec<R>, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records.values().cloned().collect())
    }
}

/// File-backed store persisting records as a JSON array.
///
/// The whole collection is rewritten on every mutation. Record counts
/// here are thousands, not millions, so simplicity wins over a real
/// database.
#[derive(Debug)]
pub struct JsonFileStore<R: Reconcilable> {
    path: PathBuf,
    records: Mutex<HashMap<R::Key, R>>,
}

impl<R> JsonFileStore<R>
where
    R: Reconcilable + Clone + Serialize + DeserializeOwned,
    R::Key: Eq + Hash + Clone,
{
    /// Opens (or initializes) a store at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if an existing file cannot be read or
    /// parsed.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let mut records = HashMap::new();
        if path.exists() {
            let body = std::fs::read_to_string(path)?;
            let loaded: Vec<R> = serde_json::from_str(&body)?;
            for record in loaded {
                records.insert(record.key(), record);
            }
        }
        Ok(Self {
            path: path.to_path_buf(),
            records: Mutex::new(records),
        })
    }

    /// Writes the current collection back to disk.
    fn persist(&self, records: &HashMap<R::Key, R>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let collection: Vec<&R> = records.values().collect();
        let body = serde_json::to_string_pretty(&collection)?;
        std::fs::write(&self.path, body)?;
        Ok(())
    }
}

impl<R> RecordStore<R> for JsonFileStore<R>
where
    R: Reconcilable + Clone + Serialize + DeserializeOwned + Send,
    R::Key: Eq + Hash + Clone + Send,
{
    fn find_by_key(&self, key: &R::Key) -> Result<Option<R>, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records.get(key).cloned())
    }

    fn create(&self, record: R) -> Result<(), StoreError> {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        records.insert(record.key(), record);
        self.persist(&records)
    }

    fn update(&self, key: &R::Key, record: R) -> Result<(), StoreError> {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        records.insert(key.clone(), record);
        self.persist(&records)
    }

    fn all(&self) -> Result<Vec<R>, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use relief_map_disaster_models::{DisasterRecord, DisasterType};

    fn disaster(title: &str) -> DisasterRecord {
        DisasterRecord {
            title: title.to_string(),
            description: None,
            location: "Pakistan".to_string(),
            disaster_type: DisasterType::Fl,
            population_affected: 0,
            disaster_time: None,
            latitude: None,
            longitude: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryStore::new();
        let record = disaster("Flood");
        let key = Reconcilable::key(&record);
        store.create(record).unwrap();
        assert!(store.find_by_key(&key).unwrap().is_some());
        assert_eq!(store.all().unwrap().len(), 1);
    }

    #[test]
    fn json_file_store_survives_reopen() {
        let dir = std::env::temp_dir().join(format!("relief-map-store-{}", std::process::id()));
        let path = dir.join("disasters.json");
        let _ = std::fs::remove_file(&path);

        {
            let store: JsonFileStore<DisasterRecord> = JsonFileStore::open(&path).unwrap();
            store.create(disaster("Flood")).unwrap();
            store.create(disaster("Quake")).unwrap();
        }

        let reopened: JsonFileStore<DisasterRecord> = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.all().unwrap().len(), 2);
        let key = Reconcilable::key(&disaster("Flood"));
        assert!(reopened.find_by_key(&key).unwrap().is_some());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn opening_missing_file_yields_empty_store() {
        let path = std::env::temp_dir().join("relief-map-does-not-exist.json");
        let _ = std::fs::remove_file(&path);
        let store: JsonFileStore<DisasterRecord> = JsonFileStore::open(&path).unwrap();
        assert!(store.all().unwrap().is_empty());
    }
}
