//! Record store abstraction: named, append-only collections of JSON records.
//!
//! [`RecordStore`] moves raw [`serde_json::Value`] records so that a malformed record
//! stays representable; [`CollectionRecord`] ties each typed record to its
//! [`Collection`] and decodes at this boundary.

use crate::error::StoreError;
use crate::notification::Notification;
use crate::types::{Collection, DemandListing, SupplyListing};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Append-only store keyed by collection.
///
/// A single `load` or `append` must not interleave with itself; nothing stronger
/// is assumed. Callers that need load+append atomicity serialize above the store.
pub trait RecordStore: Send + Sync {
    /// All records of a collection, in append order. Missing collection ⇒ empty.
    fn load(&self, collection: Collection) -> Result<Vec<Value>, StoreError>;

    fn append(&self, collection: Collection, record: Value) -> Result<(), StoreError>;

    /// Drop every record of a collection. Only the debug reset uses this.
    fn clear(&self, collection: Collection) -> Result<(), StoreError>;
}

impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    fn load(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        (**self).load(collection)
    }

    fn append(&self, collection: Collection, record: Value) -> Result<(), StoreError> {
        (**self).append(collection, record)
    }

    fn clear(&self, collection: Collection) -> Result<(), StoreError> {
        (**self).clear(collection)
    }
}

/// A record type that lives in exactly one collection.
pub trait CollectionRecord: Serialize + DeserializeOwned {
    const COLLECTION: Collection;
}

impl CollectionRecord for SupplyListing {
    const COLLECTION: Collection = Collection::Supply;
}

impl CollectionRecord for DemandListing {
    const COLLECTION: Collection = Collection::Demand;
}

impl CollectionRecord for Notification {
    const COLLECTION: Collection = Collection::Notification;
}

/// One record of a lenient load: decoded, or the position and reason it failed.
#[derive(Debug)]
pub enum Candidate<T> {
    Valid(T),
    Malformed { index: usize, reason: String },
}

/// Serialize and append a typed record to its collection.
pub fn append_record<T: CollectionRecord>(store: &dyn RecordStore, record: &T) -> Result<(), StoreError> {
    let value = serde_json::to_value(record).map_err(|source| StoreError::Serialization {
        collection: T::COLLECTION,
        source,
    })?;
    store.append(T::COLLECTION, value)
}

/// Load and decode a whole collection. Any malformed record is a store fault.
pub fn load_records<T: CollectionRecord>(store: &dyn RecordStore) -> Result<Vec<T>, StoreError> {
    store
        .load(T::COLLECTION)?
        .into_iter()
        .map(|v| {
            serde_json::from_value(v).map_err(|source| StoreError::Serialization {
                collection: T::COLLECTION,
                source,
            })
        })
        .collect()
}

/// Load a collection, decoding each record independently. Only the load itself can fail.
pub fn load_candidates<T: CollectionRecord>(store: &dyn RecordStore) -> Result<Vec<Candidate<T>>, StoreError> {
    let raw = store.load(T::COLLECTION)?;
    Ok(raw
        .into_iter()
        .enumerate()
        .map(|(index, v)| match serde_json::from_value(v) {
            Ok(record) => Candidate::Valid(record),
            Err(e) => Candidate::Malformed {
                index,
                reason: e.to_string(),
            },
        })
        .collect())
}

/// In-process store. Clone shares the same backing collections.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    collections: Arc<Mutex<HashMap<Collection, Vec<Value>>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently in `collection`.
    pub fn len(&self, collection: Collection) -> usize {
        self.lock()
            .map(|c| c.get(&collection).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Collection, Vec<Value>>>, StoreError> {
        self.collections
            .lock()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".into()))
    }
}

impl RecordStore for InMemoryStore {
    fn load(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        Ok(self.lock()?.get(&collection).cloned().unwrap_or_default())
    }

    fn append(&self, collection: Collection, record: Value) -> Result<(), StoreError> {
        self.lock()?.entry(collection).or_default().push(record);
        Ok(())
    }

    fn clear(&self, collection: Collection) -> Result<(), StoreError> {
        self.lock()?.remove(&collection);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Location, ListingId};

    fn supply(contact: &str) -> SupplyListing {
        SupplyListing {
            id: ListingId::new_v4(),
            timestamp: 1.0,
            owner_id: None,
            race: "Nelore".into(),
            age: 24,
            sex: "Male".into(),
            quantity: 10,
            location: Location::new("SP", "Campinas"),
            contact: contact.into(),
        }
    }

    #[test]
    fn append_then_load_preserves_order() {
        let store = InMemoryStore::new();
        append_record(&store, &supply("a")).unwrap();
        append_record(&store, &supply("b")).unwrap();
        let loaded: Vec<SupplyListing> = load_records(&store).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].contact, "a");
        assert_eq!(loaded[1].contact, "b");
        assert_eq!(store.len(Collection::Demand), 0);
    }

    #[test]
    fn clone_shares_storage() {
        let store = InMemoryStore::new();
        let other = store.clone();
        append_record(&store, &supply("a")).unwrap();
        assert_eq!(other.len(Collection::Supply), 1);
    }

    #[test]
    fn lenient_load_reports_malformed_record() {
        let store = InMemoryStore::new();
        append_record(&store, &supply("a")).unwrap();
        store
            .append(Collection::Supply, serde_json::json!({ "race": "Nelore" }))
            .unwrap();
        let candidates: Vec<Candidate<SupplyListing>> = load_candidates(&store).unwrap();
        assert!(matches!(candidates[0], Candidate::Valid(_)));
        assert!(matches!(candidates[1], Candidate::Malformed { index: 1, .. }));

        let strict: Result<Vec<SupplyListing>, _> = load_records(&store);
        assert!(matches!(strict, Err(StoreError::Serialization { .. })));
    }

    #[test]
    fn clear_empties_collection() {
        let store = InMemoryStore::new();
        append_record(&store, &supply("a")).unwrap();
        store.clear(Collection::Supply).unwrap();
        assert_eq!(store.len(Collection::Supply), 0);
    }
}
