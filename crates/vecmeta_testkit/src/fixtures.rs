//! Test fixtures and catalog helpers.
//!
//! Provides temp-dir backed coordinators that can be reopened, in-memory
//! coordinators, and ready-made schemas and requests.

use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use vecmeta_codec::encode_record;
use vecmeta_core::{
    CollectionSchema, ConsistencyLevel, Coordinator, CreateCollectionRequest, DataType,
    DefaultValue, FieldSchema, KeyValue, LocalIdAllocator, DIM_KEY, MAX_LENGTH_KEY,
};
use vecmeta_storage::InMemoryObjectStore;

/// A file-backed coordinator with automatic cleanup.
pub struct TestCatalog {
    coordinator: Coordinator,
    temp_dir: TempDir,
}

impl TestCatalog {
    /// Creates a coordinator over a fresh temporary directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let coordinator = open_coordinator(temp_dir.path());
        Self {
            coordinator,
            temp_dir,
        }
    }

    /// Drops the coordinator and opens a new one over the same directory.
    pub fn reopen(self) -> Self {
        let Self {
            coordinator,
            temp_dir,
        } = self;
        drop(coordinator);
        let coordinator = open_coordinator(temp_dir.path());
        Self {
            coordinator,
            temp_dir,
        }
    }

    /// Root directory of the object store.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }
}

impl Default for TestCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TestCatalog {
    type Target = Coordinator;

    fn deref(&self) -> &Self::Target {
        &self.coordinator
    }
}

fn open_coordinator(root: &Path) -> Coordinator {
    let config = vecmeta_core::Config::new(root).sync_directory(false);
    Coordinator::open(&config).expect("Failed to open catalog")
}

/// Creates an in-memory coordinator whose ids count up from `start`.
pub fn memory_coordinator(start: i64) -> (Arc<InMemoryObjectStore>, Coordinator) {
    let store = Arc::new(InMemoryObjectStore::new());
    let coordinator = Coordinator::with_store(
        store.clone(),
        Arc::new(LocalIdAllocator::sequential(start)),
    )
    .expect("Failed to open in-memory catalog");
    (store, coordinator)
}

/// Runs a test against a temporary file-backed catalog.
pub fn with_temp_catalog<F, R>(f: F) -> R
where
    F: FnOnce(&Coordinator) -> R,
{
    let catalog = TestCatalog::new();
    f(&catalog)
}

/// Ready-made schemas.
pub mod schemas {
    use super::*;

    /// `films`: int64 primary key, 8-dim float vector, bounded title.
    pub fn films() -> CollectionSchema {
        CollectionSchema::new("films")
            .field(FieldSchema::new("id", DataType::Int64).primary_key(false))
            .field(FieldSchema::new("embedding", DataType::FloatVector).type_param(DIM_KEY, "8"))
            .field(FieldSchema::new("title", DataType::VarChar).type_param(MAX_LENGTH_KEY, "128"))
    }

    /// `films_by_genre`: the `films` fields plus an int64 partition key.
    pub fn films_by_genre() -> CollectionSchema {
        CollectionSchema {
            name: "films_by_genre".to_string(),
            ..films()
        }
        .field(FieldSchema::new("genre", DataType::Int64).partition_key())
    }

    /// A schema with one defaulted field.
    pub fn with_default(name: &str, field: FieldSchema, default: DefaultValue) -> CollectionSchema {
        CollectionSchema::new(name)
            .field(FieldSchema::new("id", DataType::Int64).primary_key(true))
            .field(field.default_value(default))
    }

    /// Decodes a JSON schema, the format operators submit.
    pub fn from_json(json: &str) -> CollectionSchema {
        serde_json::from_str(json).expect("Invalid schema JSON")
    }
}

/// Builds a create request for `schema` in the default database.
pub fn create_request(schema: &CollectionSchema) -> CreateCollectionRequest {
    CreateCollectionRequest {
        db_name: String::new(),
        collection_name: schema.name.clone(),
        schema: encode_record(schema).expect("Failed to encode schema"),
        shards_num: 2,
        consistency_level: ConsistencyLevel::Bounded,
        num_partitions: 0,
        properties: vec![KeyValue::new("collection.ttl.seconds", "3600")],
    }
}

/// Builds a create request for a partition-key schema.
pub fn partitioned_request(schema: &CollectionSchema, num_partitions: i64) -> CreateCollectionRequest {
    CreateCollectionRequest {
        num_partitions,
        ..create_request(schema)
    }
}
