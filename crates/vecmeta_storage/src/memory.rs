//! In-memory object store for testing.

use crate::error::{StorageError, StorageResult};
use crate::store::{validate_key, ObjectStore};
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// An in-memory object store.
///
/// Suitable for unit tests and ephemeral catalogs. Writes can be made to fail
/// on demand to exercise error paths of callers.
///
/// # Example
///
/// ```rust
/// use vecmeta_storage::{InMemoryObjectStore, ObjectStore};
///
/// let store = InMemoryObjectStore::new();
/// store.put("databases/1", b"record").unwrap();
/// assert_eq!(store.list_all("databases").unwrap().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    records: RwLock<BTreeMap<String, Vec<u8>>>,
    fail_writes: RwLock<bool>,
}

impl InMemoryObjectStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `put` fail with an I/O error (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.write() = fail;
    }

    /// Returns the number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns true if no records are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn ensure_namespace(&self, namespace: &str) -> StorageResult<()> {
        // Namespaces are implicit in key prefixes.
        validate_key(namespace)
    }

    fn put(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        validate_key(key)?;
        if *self.fail_writes.read() {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "injected write failure",
            )));
        }
        self.records.write().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &str) -> StorageResult<Vec<u8>> {
        validate_key(key)?;
        self.records
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::not_found(key))
    }

    fn list_all(&self, namespace: &str) -> StorageResult<Vec<(String, Vec<u8>)>> {
        validate_key(namespace)?;
        let prefix = format!("{namespace}/");
        Ok(self
            .records
            .read()
            .range(prefix.clone()..)
            .take_while(|(k, _)| k.starts_with(&prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_new_is_empty() {
        let store = InMemoryObjectStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn memory_put_get() {
        let store = InMemoryObjectStore::new();
        store.put("databases/1", b"one").unwrap();
        assert_eq!(store.get("databases/1").unwrap(), b"one");
    }

    #[test]
    fn memory_get_missing() {
        let store = InMemoryObjectStore::new();
        assert!(store.get("databases/1").unwrap_err().is_not_found());
    }

    #[test]
    fn memory_list_respects_namespace_boundary() {
        let store = InMemoryObjectStore::new();
        store.put("databases/1", b"a").unwrap();
        store.put("databases_extra/1", b"b").unwrap();
        store.put("collections/1/2", b"c").unwrap();

        let records = store.list_all("databases").unwrap();
        assert_eq!(records, vec![("databases/1".to_string(), b"a".to_vec())]);
    }

    #[test]
    fn memory_injected_failure_keeps_old_record() {
        let store = InMemoryObjectStore::new();
        store.put("databases/1", b"old").unwrap();

        store.set_fail_writes(true);
        assert!(store.put("databases/1", b"new").is_err());
        assert_eq!(store.get("databases/1").unwrap(), b"old");

        store.set_fail_writes(false);
        store.put("databases/1", b"new").unwrap();
        assert_eq!(store.get("databases/1").unwrap(), b"new");
    }

    #[test]
    fn memory_rejects_invalid_key() {
        let store = InMemoryObjectStore::new();
        assert!(matches!(
            store.put("a//b", b"x"),
            Err(StorageError::InvalidKey { .. })
        ));
    }
}
