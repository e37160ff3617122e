//! Persistence: one JSON file per collection in a data directory.
//! Enables recovery after restart: listings and notifications are read back from disk.

use crate::error::StoreError;
use crate::store::RecordStore;
use crate::types::Collection;
use serde_json::Value;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// File-based store: `<dir>/farmers.json`, `<dir>/buyers.json`, ... each a JSON array.
/// Append writes the whole collection to `.<name>.json.tmp` and renames it over the file,
/// so a crash mid-write leaves the previous contents intact.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    // Serializes read-modify-write of a file so appends do not interleave with each other.
    io: Mutex<()>,
}

impl JsonFileStore {
    /// Uses `dir` as the data directory, creating it if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::Unavailable(format!("{}: {}", dir.display(), e)))?;
        Ok(Self {
            dir,
            io: Mutex::new(()),
        })
    }

    /// Path of the file backing `collection`.
    pub fn path_of(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("{}.json", collection.name()))
    }

    fn read(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        let data = match std::fs::read_to_string(self.path_of(collection)) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(StoreError::Io { collection, source }),
        };
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_str::<Value>(&data).map_err(|source| StoreError::Serialization { collection, source })? {
            Value::Array(records) => Ok(records),
            other => Err(StoreError::Malformed {
                collection,
                reason: format!("expected a JSON array, found {}", json_kind(&other)),
            }),
        }
    }

    fn tmp_path_of(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!(".{}.json.tmp", collection.name()))
    }

    fn write(&self, collection: Collection, records: &[Value]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(records).map_err(|source| StoreError::Serialization { collection, source })?;
        let tmp = self.tmp_path_of(collection);
        let io = |source| StoreError::Io { collection, source };
        {
            let mut file = File::create(&tmp).map_err(io)?;
            file.write_all(json.as_bytes()).map_err(io)?;
            file.sync_all().map_err(io)?;
        }
        std::fs::rename(&tmp, self.path_of(collection)).map_err(io)
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, ()>, StoreError> {
        self.io
            .lock()
            .map_err(|_| StoreError::Unavailable("file store lock poisoned".into()))
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        let _guard = self.guard()?;
        self.read(collection)
    }

    fn append(&self, collection: Collection, record: Value) -> Result<(), StoreError> {
        let _guard = self.guard()?;
        let mut records = self.read(collection)?;
        records.push(record);
        self.write(collection, &records)
    }

    fn clear(&self, collection: Collection) -> Result<(), StoreError> {
        let _guard = self.guard()?;
        match std::fs::remove_file(self.path_of(collection)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { collection, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        assert!(store.load(Collection::Supply).unwrap().is_empty());
    }

    #[test]
    fn append_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = JsonFileStore::open(dir.path()).unwrap();
            store.append(Collection::Demand, json!({ "contact": "a" })).unwrap();
            store.append(Collection::Demand, json!({ "contact": "b" })).unwrap();
        }
        let store = JsonFileStore::open(dir.path()).unwrap();
        let records = store.load(Collection::Demand).unwrap();
        assert_eq!(records, vec![json!({ "contact": "a" }), json!({ "contact": "b" })]);
        assert!(dir.path().join("buyers.json").exists());
    }

    #[test]
    fn non_array_file_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        std::fs::write(store.path_of(Collection::Notification), "{\"oops\": 1}").unwrap();
        let err = store.load(Collection::Notification).unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }

    #[test]
    fn invalid_json_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        std::fs::write(store.path_of(Collection::Supply), "[{").unwrap();
        assert!(matches!(
            store.load(Collection::Supply),
            Err(StoreError::Serialization { .. })
        ));
    }

    #[test]
    fn append_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        store.append(Collection::Supply, json!({ "race": "Nelore" })).unwrap();
        store.append(Collection::Supply, json!({ "race": "Angus" })).unwrap();
        assert!(!store.tmp_path_of(Collection::Supply).exists());
        let on_disk: Value = serde_json::from_str(&std::fs::read_to_string(store.path_of(Collection::Supply)).unwrap()).unwrap();
        assert_eq!(on_disk.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn interrupted_write_keeps_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        store.append(Collection::Demand, json!({ "contact": "a" })).unwrap();
        // Half-written temp file left behind by a crash.
        std::fs::write(store.tmp_path_of(Collection::Demand), "[{\"contact\": ").unwrap();
        assert_eq!(store.load(Collection::Demand).unwrap(), vec![json!({ "contact": "a" })]);

        store.append(Collection::Demand, json!({ "contact": "b" })).unwrap();
        assert_eq!(store.load(Collection::Demand).unwrap().len(), 2);
        assert!(!store.tmp_path_of(Collection::Demand).exists());
    }

    #[test]
    fn clear_removes_file_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        store.append(Collection::Supply, json!({})).unwrap();
        store.clear(Collection::Supply).unwrap();
        store.clear(Collection::Supply).unwrap();
        assert!(store.load(Collection::Supply).unwrap().is_empty());
    }
}
