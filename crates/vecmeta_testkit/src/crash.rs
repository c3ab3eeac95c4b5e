//! Fault injection for the object store.
//!
//! [`FaultyObjectStore`] wraps a store and fails writes on demand, so tests
//! can check that a failed write leaves both the store and the cache in
//! their previous state.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use vecmeta_storage::{ObjectStore, StorageError, StorageResult};

/// An object store wrapper that can fail writes.
pub struct FaultyObjectStore {
    inner: Arc<dyn ObjectStore>,
    fail_after_puts: AtomicUsize,
    puts: AtomicUsize,
    failed: AtomicBool,
}

impl FaultyObjectStore {
    /// Wraps `inner`. Writes succeed until [`Self::fail_after`] is called.
    pub fn new(inner: Arc<dyn ObjectStore>) -> Self {
        Self {
            inner,
            fail_after_puts: AtomicUsize::new(usize::MAX),
            puts: AtomicUsize::new(0),
            failed: AtomicBool::new(false),
        }
    }

    /// Lets `puts` more writes through, then fails every write.
    pub fn fail_after(&self, puts: usize) {
        let done = self.puts.load(Ordering::SeqCst);
        self.fail_after_puts
            .store(done.saturating_add(puts), Ordering::SeqCst);
    }

    /// Clears the failure state.
    pub fn reset(&self) {
        self.fail_after_puts.store(usize::MAX, Ordering::SeqCst);
        self.failed.store(false, Ordering::SeqCst);
    }

    /// Number of successful writes so far.
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// Whether any write has been rejected.
    pub fn has_failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }
}

impl ObjectStore for FaultyObjectStore {
    fn ensure_namespace(&self, namespace: &str) -> StorageResult<()> {
        self.inner.ensure_namespace(namespace)
    }

    fn put(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        if self.puts.load(Ordering::SeqCst) >= self.fail_after_puts.load(Ordering::SeqCst) {
            self.failed.store(true, Ordering::SeqCst);
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("simulated write failure for {key}"),
            )));
        }
        self.inner.put(key, value)?;
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn get(&self, key: &str) -> StorageResult<Vec<u8>> {
        self.inner.get(key)
    }

    fn list_all(&self, namespace: &str) -> StorageResult<Vec<(String, Vec<u8>)>> {
        self.inner.list_all(namespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{create_request, schemas};
    use vecmeta_core::{CatalogService, Coordinator, ErrorCode, LocalIdAllocator};
    use vecmeta_storage::InMemoryObjectStore;

    #[test]
    fn fails_after_budget() {
        let store = FaultyObjectStore::new(Arc::new(InMemoryObjectStore::new()));
        store.fail_after(1);
        assert!(store.put("databases/1", b"a").is_ok());
        assert!(store.put("databases/2", b"b").is_err());
        assert!(store.has_failed());
        assert!(store.get("databases/2").is_err());

        store.reset();
        assert!(store.put("databases/2", b"b").is_ok());
        assert_eq!(store.put_count(), 2);
    }

    #[test]
    fn failed_create_is_invisible() {
        let store = Arc::new(FaultyObjectStore::new(Arc::new(InMemoryObjectStore::new())));
        let coordinator =
            Coordinator::with_store(store.clone(), Arc::new(LocalIdAllocator::sequential(100)))
                .unwrap();

        store.fail_after(0);
        let status = coordinator.create_collection(create_request(&schemas::films()));
        assert_eq!(status.code, ErrorCode::Internal);
        assert!(!coordinator.has_collection("", "films").value);

        store.reset();
        assert!(coordinator
            .create_collection(create_request(&schemas::films()))
            .is_success());
        assert!(coordinator.has_collection("", "films").value);
    }

    #[test]
    fn failed_bootstrap_aborts_open() {
        let store = Arc::new(FaultyObjectStore::new(Arc::new(InMemoryObjectStore::new())));
        store.fail_after(0);
        let result =
            Coordinator::with_store(store.clone(), Arc::new(LocalIdAllocator::sequential(1)));
        assert!(result.is_err());
        assert_eq!(store.put_count(), 0);
    }
}
