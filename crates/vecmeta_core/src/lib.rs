//! # VecMeta Core
//!
//! Metadata catalog of a vector-database coordinator.
//!
//! This crate provides:
//! - Identifier allocation ([`IdAllocator`], [`LocalIdAllocator`])
//! - The catalog record model ([`Database`], [`Collection`], [`FieldSchema`], [`Partition`])
//! - A typed record layer over an object store ([`MetaStore`])
//! - The write-through metadata cache ([`MetaCache`])
//! - Schema preparation and partition planning
//! - The collection creation workflow and the [`CatalogService`] surface
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use vecmeta_core::{
//!     CatalogService, CollectionSchema, Coordinator, CreateCollectionRequest, DataType,
//!     FieldSchema, LocalIdAllocator,
//! };
//! use vecmeta_storage::InMemoryObjectStore;
//!
//! let coordinator = Coordinator::with_store(
//!     Arc::new(InMemoryObjectStore::new()),
//!     Arc::new(LocalIdAllocator::new()),
//! )
//! .unwrap();
//!
//! let schema = CollectionSchema::new("films")
//!     .field(FieldSchema::new("id", DataType::Int64).primary_key(true));
//! let status = coordinator.create_collection(CreateCollectionRequest {
//!     collection_name: "films".into(),
//!     schema: vecmeta_codec::encode_record(&schema).unwrap(),
//!     shards_num: 1,
//!     ..Default::default()
//! });
//! assert!(status.is_success());
//! assert!(coordinator.has_collection("", "films").value);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod allocator;
mod cache;
mod config;
mod create_collection;
mod error;
mod meta_store;
mod model;
mod partition;
mod schema;
mod service;
mod types;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use allocator::{FixedClock, IdAllocator, LocalIdAllocator, SystemClock, TimestampOracle};
pub use cache::MetaCache;
pub use config::{Config, DEFAULT_DB_NAME};
pub use create_collection::{CreateCollectionRequest, CreateCollectionTask};
pub use error::{CoreError, CoreResult};
pub use meta_store::{
    collection_key, database_key, MetaStore, RecordFailure, ScanReport, COLLECTIONS_NAMESPACE,
    DATABASES_NAMESPACE,
};
pub use model::{
    find_param, Collection, CollectionSchema, CollectionState, ConsistencyLevel, DataType,
    Database, DatabaseState, DefaultValue, FieldSchema, KeyValue, Partition, PartitionState,
    DEFAULT_DB_ID, DYNAMIC_FIELD_NAME, ROW_ID_FIELD_ID, ROW_ID_FIELD_NAME,
    START_OF_USER_FIELD_ID, TIMESTAMP_FIELD_ID, TIMESTAMP_FIELD_NAME,
};
pub use partition::{assign_partitions, DEFAULT_PARTITION_NAME, MAX_PARTITION_NUM};
pub use schema::{prepare_schema, DIM_KEY, MAX_LENGTH_KEY};
pub use service::{
    BoolResponse, CatalogService, Coordinator, DescribeCollectionResponse, ListDatabasesResponse,
    ShowCollectionsResponse,
};
pub use types::{
    unix_timestamp, CollectionId, DatabaseId, ErrorCode, FieldId, PartitionId, Status, Timestamp,
    UniqueId,
};
