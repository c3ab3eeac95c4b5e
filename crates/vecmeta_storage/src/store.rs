//! Object store trait definition and key rules.

use crate::error::{StorageError, StorageResult};

/// Suffix used for in-flight writes. Keys may never end with it.
pub const TEMP_SUFFIX: &str = ".tmp";

/// A durable key/value store of opaque records.
///
/// Object stores do not interpret the bytes they hold. Keys are
/// slash-separated paths whose first segment names the entity namespace,
/// e.g. `databases/1` or `collections/1/4242`.
///
/// # Invariants
///
/// - Once `put` returns `Ok`, every later `get` of that key (including from a
///   reopened store over the same root) returns exactly the written bytes
/// - A failed or interrupted `put` never exposes a partially written record
/// - `list_all` returns one consistent snapshot, sorted by key
/// - Stores must be `Send + Sync` for concurrent access
///
/// # Implementors
///
/// - [`super::FileObjectStore`] - One file per key under a root directory
/// - [`super::InMemoryObjectStore`] - For testing
pub trait ObjectStore: Send + Sync {
    /// Creates the namespace if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the namespace name is invalid or cannot be created.
    fn ensure_namespace(&self, namespace: &str) -> StorageResult<()>;

    /// Stores `value` under `key`, replacing any previous record atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the write fails. On error the
    /// previous record (if any) is still the one visible to `get`.
    fn put(&self, key: &str, value: &[u8]) -> StorageResult<()>;

    /// Reads the record stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if no record exists.
    fn get(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Returns every record below `namespace`, at any depth, sorted by key.
    ///
    /// # Errors
    ///
    /// Returns an error if the namespace cannot be read.
    fn list_all(&self, namespace: &str) -> StorageResult<Vec<(String, Vec<u8>)>>;
}

/// Checks that `key` is a well-formed object key.
///
/// # Errors
///
/// Returns [`StorageError::InvalidKey`] for empty keys, empty or dot
/// segments, backslashes, and keys ending in [`TEMP_SUFFIX`].
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::invalid_key(key, "key is empty"));
    }
    if key.contains('\\') {
        return Err(StorageError::invalid_key(key, "backslash in key"));
    }
    if key.ends_with(TEMP_SUFFIX) {
        return Err(StorageError::invalid_key(key, "reserved temporary suffix"));
    }
    for segment in key.split('/') {
        match segment {
            "" => return Err(StorageError::invalid_key(key, "empty segment")),
            "." | ".." => return Err(StorageError::invalid_key(key, "relative segment")),
            s if s.starts_with('.') => {
                return Err(StorageError::invalid_key(key, "hidden segment"))
            }
            _ => {}
        }
    }
    Ok(())
}

/// Joins key segments with `/`.
#[must_use]
pub fn join_key(segments: &[&str]) -> String {
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_namespaced_keys() {
        assert!(validate_key("databases/1").is_ok());
        assert!(validate_key("collections/1/42").is_ok());
        assert!(validate_key("databases").is_ok());
    }

    #[test]
    fn rejects_malformed_keys() {
        for key in ["", "a//b", "/a", "a/", "a/../b", "./a", "a\\b", "a/b.tmp", "a/.hidden"] {
            assert!(
                matches!(validate_key(key), Err(StorageError::InvalidKey { .. })),
                "{key:?} should be rejected"
            );
        }
    }

    #[test]
    fn join_key_uses_slash() {
        assert_eq!(join_key(&["collections", "1", "7"]), "collections/1/7");
    }
}
