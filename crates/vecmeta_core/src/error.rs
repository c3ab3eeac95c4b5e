//! Error types for the catalog core.

use crate::types::ErrorCode;
use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in catalog operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Object store error.
    #[error("storage error: {0}")]
    Storage(#[from] vecmeta_storage::StorageError),

    /// Record codec error.
    #[error("codec error: {0}")]
    Codec(#[from] vecmeta_codec::CodecError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Database not found.
    #[error("database not found: {name}")]
    DatabaseNotFound {
        /// Name (or id) of the database.
        name: String,
    },

    /// Collection not found.
    #[error("collection not found: {name}")]
    CollectionNotFound {
        /// Name of the collection.
        name: String,
    },

    /// A collection with this name exists with a different definition.
    #[error("collection {name} already exists with a different definition")]
    CollectionAlreadyExists {
        /// Name of the collection.
        name: String,
    },

    /// The request is malformed or violates a schema rule.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the problem.
        message: String,
    },

    /// A dependency (catalog lookup, allocator) could not serve the request.
    #[error("unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },

    /// Unexpected internal failure.
    #[error("internal error: {message}")]
    Internal {
        /// Description of the failure.
        message: String,
    },

    /// The identifier space is exhausted.
    #[error("identifier space exhausted")]
    IdExhausted,

    /// The operation is part of the catalog surface but not implemented.
    #[error("operation not supported: {operation}")]
    NotSupported {
        /// Name of the operation.
        operation: String,
    },
}

impl CoreError {
    /// Creates a database not found error.
    pub fn database_not_found(name: impl Into<String>) -> Self {
        Self::DatabaseNotFound { name: name.into() }
    }

    /// Creates a collection not found error.
    pub fn collection_not_found(name: impl Into<String>) -> Self {
        Self::CollectionNotFound { name: name.into() }
    }

    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Creates a not supported error.
    pub fn not_supported(operation: impl Into<String>) -> Self {
        Self::NotSupported {
            operation: operation.into(),
        }
    }

    /// Maps this error onto the status code reported to callers.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::DatabaseNotFound { .. } | Self::CollectionNotFound { .. } => ErrorCode::NotFound,
            Self::CollectionAlreadyExists { .. } => ErrorCode::AlreadyExists,
            Self::InvalidArgument { .. } => ErrorCode::InvalidArgument,
            Self::Unavailable { .. } => ErrorCode::Unavailable,
            Self::NotSupported { .. } => ErrorCode::NotSupported,
            Self::Storage(_)
            | Self::Codec(_)
            | Self::Io(_)
            | Self::Internal { .. }
            | Self::IdExhausted => ErrorCode::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_taxonomy() {
        assert_eq!(CoreError::database_not_found("db").code(), ErrorCode::NotFound);
        assert_eq!(
            CoreError::CollectionAlreadyExists { name: "c".into() }.code(),
            ErrorCode::AlreadyExists
        );
        assert_eq!(
            CoreError::invalid_argument("bad").code(),
            ErrorCode::InvalidArgument
        );
        assert_eq!(CoreError::unavailable("x").code(), ErrorCode::Unavailable);
        assert_eq!(CoreError::IdExhausted.code(), ErrorCode::Internal);
        assert_eq!(
            CoreError::not_supported("DropCollection").code(),
            ErrorCode::NotSupported
        );
    }

    #[test]
    fn storage_errors_are_internal() {
        let err: CoreError = vecmeta_storage::StorageError::Locked.into();
        assert_eq!(err.code(), ErrorCode::Internal);
    }

    #[test]
    fn messages_name_the_subject() {
        let err = CoreError::collection_not_found("films");
        assert_eq!(err.to_string(), "collection not found: films");
    }
}
