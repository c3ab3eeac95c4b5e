//! Typed record layer over an [`ObjectStore`].
//!
//! Layout:
//! - `databases/<database_id>`
//! - `collections/<database_id>/<collection_id>`

use crate::error::CoreResult;
use crate::model::{Collection, Database};
use crate::types::{CollectionId, DatabaseId};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;
use vecmeta_codec::{decode_record, encode_record};
use vecmeta_storage::{join_key, ObjectStore};

/// Namespace holding database records.
pub const DATABASES_NAMESPACE: &str = "databases";

/// Namespace holding collection records.
pub const COLLECTIONS_NAMESPACE: &str = "collections";

/// Key of a database record.
#[must_use]
pub fn database_key(id: DatabaseId) -> String {
    join_key(&[DATABASES_NAMESPACE, &id.as_i64().to_string()])
}

/// Key of a collection record.
#[must_use]
pub fn collection_key(db_id: DatabaseId, collection_id: CollectionId) -> String {
    join_key(&[
        COLLECTIONS_NAMESPACE,
        &db_id.as_i64().to_string(),
        &collection_id.as_i64().to_string(),
    ])
}

/// A record that failed to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFailure {
    /// Key of the record.
    pub key: String,
    /// Decoding error message.
    pub error: String,
}

/// Result of scanning every record in the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Database records that decoded.
    pub databases: usize,
    /// Collection records that decoded.
    pub collections: usize,
    /// Records that did not decode.
    pub failures: Vec<RecordFailure>,
}

impl ScanReport {
    /// Returns true if every record decoded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Encodes catalog records and maps them onto object store keys.
#[derive(Clone)]
pub struct MetaStore {
    store: Arc<dyn ObjectStore>,
}

impl MetaStore {
    /// Wraps a store, creating the record namespaces.
    ///
    /// # Errors
    ///
    /// Returns an error if a namespace cannot be created.
    pub fn open(store: Arc<dyn ObjectStore>) -> CoreResult<Self> {
        store.ensure_namespace(DATABASES_NAMESPACE)?;
        store.ensure_namespace(COLLECTIONS_NAMESPACE)?;
        Ok(Self { store })
    }

    /// Persists a database record.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the write fails.
    pub fn save_database(&self, database: &Database) -> CoreResult<()> {
        let key = database_key(database.id);
        let bytes = encode_record(database)?;
        self.store.put(&key, &bytes)?;
        debug!(key = %key, bytes = bytes.len(), "database record written");
        Ok(())
    }

    /// Persists a collection record.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the write fails.
    pub fn save_collection(&self, collection: &Collection) -> CoreResult<()> {
        let key = collection_key(collection.db_id, collection.collection_id);
        let bytes = encode_record(collection)?;
        self.store.put(&key, &bytes)?;
        debug!(key = %key, bytes = bytes.len(), "collection record written");
        Ok(())
    }

    /// Loads every database record.
    ///
    /// # Errors
    ///
    /// Returns an error if listing fails or any record is undecodable.
    pub fn load_databases(&self) -> CoreResult<Vec<Database>> {
        self.load_all(DATABASES_NAMESPACE)
    }

    /// Loads every collection record.
    ///
    /// # Errors
    ///
    /// Returns an error if listing fails or any record is undecodable.
    pub fn load_collections(&self) -> CoreResult<Vec<Collection>> {
        self.load_all(COLLECTIONS_NAMESPACE)
    }

    /// Decodes every record without stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns an error only if listing a namespace fails.
    pub fn scan(&self) -> CoreResult<ScanReport> {
        let mut report = ScanReport::default();
        for (key, bytes) in self.store.list_all(DATABASES_NAMESPACE)? {
            match decode_record::<Database>(&bytes) {
                Ok(_) => report.databases += 1,
                Err(e) => report.failures.push(RecordFailure {
                    key,
                    error: e.to_string(),
                }),
            }
        }
        for (key, bytes) in self.store.list_all(COLLECTIONS_NAMESPACE)? {
            match decode_record::<Collection>(&bytes) {
                Ok(_) => report.collections += 1,
                Err(e) => report.failures.push(RecordFailure {
                    key,
                    error: e.to_string(),
                }),
            }
        }
        Ok(report)
    }

    fn load_all<T: DeserializeOwned>(&self, namespace: &str) -> CoreResult<Vec<T>> {
        let entries = self.store.list_all(namespace)?;
        let mut records = Vec::with_capacity(entries.len());
        for (key, bytes) in entries {
            debug!(key = %key, "loading record");
            records.push(decode_record(&bytes)?);
        }
        Ok(records)
    }
}

impl std::fmt::Debug for MetaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetaStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DEFAULT_DB_ID;
    use vecmeta_storage::InMemoryObjectStore;

    #[test]
    fn keys_follow_layout() {
        assert_eq!(database_key(DatabaseId::new(1)), "databases/1");
        assert_eq!(
            collection_key(DatabaseId::new(1), CollectionId::new(449)),
            "collections/1/449"
        );
    }

    #[test]
    fn database_survives_store() {
        let store = MetaStore::open(Arc::new(InMemoryObjectStore::new())).unwrap();
        let db = Database::default_database(7);
        store.save_database(&db).unwrap();

        let loaded = store.load_databases().unwrap();
        assert_eq!(loaded, vec![db]);
        assert!(store.load_collections().unwrap().is_empty());
    }

    #[test]
    fn every_database_is_loaded() {
        let store = MetaStore::open(Arc::new(InMemoryObjectStore::new())).unwrap();
        for id in 1..=3 {
            let mut db = Database::default_database(0);
            db.id = DatabaseId::new(id);
            db.name = format!("db{id}");
            store.save_database(&db).unwrap();
        }
        assert_eq!(store.load_databases().unwrap().len(), 3);
    }

    #[test]
    fn write_failure_propagates() {
        let backing = Arc::new(InMemoryObjectStore::new());
        let store = MetaStore::open(backing.clone()).unwrap();
        backing.set_fail_writes(true);
        assert!(store.save_database(&Database::default_database(0)).is_err());
        backing.set_fail_writes(false);
        assert!(store.load_databases().unwrap().is_empty());
    }

    #[test]
    fn scan_reports_corrupt_records() {
        let backing = Arc::new(InMemoryObjectStore::new());
        let store = MetaStore::open(backing.clone()).unwrap();
        store
            .save_database(&Database::default_database(0))
            .unwrap();
        backing.put("collections/1/5", b"not cbor").unwrap();

        let report = store.scan().unwrap();
        assert_eq!(report.databases, 1);
        assert_eq!(report.collections, 0);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].key, "collections/1/5");
        assert!(!report.is_clean());

        assert!(store.load_collections().is_err());
        assert_eq!(store.load_databases().unwrap()[0].id, DEFAULT_DB_ID);
    }
}
