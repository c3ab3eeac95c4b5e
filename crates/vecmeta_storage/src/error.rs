//! Error types for object store operations.

use std::io;
use thiserror::Error;

/// Result type for object store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during object store operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// No record is stored under the key.
    #[error("key not found: {key}")]
    NotFound {
        /// The missing key.
        key: String,
    },

    /// The key is not a valid object key.
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey {
        /// The rejected key.
        key: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Another process holds the storage root lock.
    #[error("storage root locked: another process has exclusive access")]
    Locked,

    /// The storage root is unusable.
    #[error("storage corrupted: {0}")]
    Corrupted(String),
}

impl StorageError {
    /// Creates a not found error.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Creates an invalid key error.
    pub fn invalid_key(key: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason,
        }
    }

    /// Returns true if this error reports a missing key.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
