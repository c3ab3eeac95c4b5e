//! Core type definitions for the catalog.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Raw identifier handed out by an [`crate::IdAllocator`].
pub type UniqueId = i64;

/// Creation timestamp, in seconds since the Unix epoch.
pub type Timestamp = u64;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub UniqueId);

        impl $name {
            /// Creates a new identifier.
            #[must_use]
            pub const fn new(id: UniqueId) -> Self {
                Self(id)
            }

            /// Returns the raw identifier value.
            #[must_use]
            pub const fn as_i64(self) -> UniqueId {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

id_type!(
    /// Identifier of a database.
    DatabaseId,
    "db"
);
id_type!(
    /// Identifier of a collection.
    ///
    /// Allocated once at creation and never reused.
    CollectionId,
    "coll"
);
id_type!(
    /// Identifier of a partition.
    PartitionId,
    "part"
);
id_type!(
    /// Identifier of a field within one collection schema.
    FieldId,
    "field"
);

/// Current time in seconds since the Unix epoch.
#[must_use]
pub fn unix_timestamp() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Outcome code attached to every catalog response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// The operation succeeded.
    #[default]
    Success,
    /// A named database or collection does not exist.
    NotFound,
    /// A collection exists under the name with a different definition.
    AlreadyExists,
    /// The request failed validation.
    InvalidArgument,
    /// A dependency could not serve the request.
    Unavailable,
    /// Unexpected storage, codec or allocator failure.
    Internal,
    /// The operation is not implemented by this catalog.
    NotSupported,
}

/// Structured status returned at the service boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    /// Outcome code.
    pub code: ErrorCode,
    /// Human-readable reason; empty on success.
    pub reason: String,
}

impl Status {
    /// A success status.
    #[must_use]
    pub fn success() -> Self {
        Self::default()
    }

    /// Creates a status with the given code and reason.
    pub fn new(code: ErrorCode, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }

    /// Status for an operation this catalog does not implement.
    #[must_use]
    pub fn not_supported(operation: &str) -> Self {
        Self::from(&CoreError::not_supported(operation))
    }

    /// Returns true if the code is [`ErrorCode::Success`].
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code == ErrorCode::Success
    }

    /// Returns true if the code is [`ErrorCode::NotSupported`].
    #[must_use]
    pub fn is_not_supported(&self) -> bool {
        self.code == ErrorCode::NotSupported
    }
}

impl From<&CoreError> for Status {
    fn from(err: &CoreError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

impl<T> From<&Result<T, CoreError>> for Status {
    fn from(result: &Result<T, CoreError>) -> Self {
        match result {
            Ok(_) => Self::success(),
            Err(e) => Self::from(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_ordering() {
        assert!(CollectionId::new(1) < CollectionId::new(2));
        assert_eq!(PartitionId::new(7).as_i64(), 7);
    }

    #[test]
    fn id_display() {
        assert_eq!(format!("{}", DatabaseId::new(1)), "db:1");
        assert_eq!(format!("{}", CollectionId::new(42)), "coll:42");
    }

    #[test]
    fn status_from_result() {
        let ok: Result<(), CoreError> = Ok(());
        assert!(Status::from(&ok).is_success());

        let err: Result<(), CoreError> = Err(CoreError::collection_not_found("films"));
        let status = Status::from(&err);
        assert_eq!(status.code, ErrorCode::NotFound);
        assert!(status.reason.contains("films"));
    }

    #[test]
    fn not_supported_status() {
        let status = Status::not_supported("DropCollection");
        assert_eq!(status.code, ErrorCode::NotSupported);
        assert!(status.reason.contains("DropCollection"));
    }

    #[test]
    fn timestamp_is_after_2020() {
        assert!(unix_timestamp() > 1_577_836_800);
    }
}
