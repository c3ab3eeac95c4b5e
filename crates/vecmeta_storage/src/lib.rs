//! # VecMeta Storage
//!
//! Durable object store for the VecMeta catalog.
//!
//! This crate provides the lowest-level persistence abstraction. Object
//! stores are **opaque key/value stores**: one record per key, keys grouped
//! by an entity-type namespace (`databases/<id>`,
//! `collections/<db_id>/<collection_id>`).
//!
//! ## Design Principles
//!
//! - Stores hold bytes; they know nothing about record encodings
//! - A successful `put` is durable and atomic (write-temporary-then-rename)
//! - Must be `Send + Sync` for concurrent access
//!
//! ## Available Stores
//!
//! - [`InMemoryObjectStore`] - For testing and ephemeral catalogs
//! - [`FileObjectStore`] - For persistent catalogs, one file per key
//!
//! ## Example
//!
//! ```rust
//! use vecmeta_storage::{InMemoryObjectStore, ObjectStore};
//!
//! let store = InMemoryObjectStore::new();
//! store.put("databases/1", b"hello world").unwrap();
//! assert_eq!(store.get("databases/1").unwrap(), b"hello world");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod file;
mod memory;
mod store;

pub use config::StoreConfig;
pub use error::{StorageError, StorageResult};
pub use file::FileObjectStore;
pub use memory::InMemoryObjectStore;
pub use store::{join_key, validate_key, ObjectStore, TEMP_SUFFIX};
