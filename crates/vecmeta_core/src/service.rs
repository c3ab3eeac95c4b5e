//! Catalog service surface.
//!
//! [`CatalogService`] names every operation a coordinator exposes. Only the
//! collection-creation path and cache-resident reads are implemented by
//! [`Coordinator`]; the remaining methods report
//! [`crate::ErrorCode::NotSupported`].

use crate::allocator::{IdAllocator, LocalIdAllocator};
use crate::cache::MetaCache;
use crate::config::{Config, DEFAULT_DB_NAME};
use crate::create_collection::{CreateCollectionRequest, CreateCollectionTask};
use crate::error::CoreResult;
use crate::meta_store::{MetaStore, ScanReport};
use crate::model::{Collection, Database};
use crate::types::Status;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use vecmeta_storage::{FileObjectStore, ObjectStore};

/// Boolean answer plus status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoolResponse {
    /// Outcome of the lookup.
    pub status: Status,
    /// The answer; false whenever the status is not success.
    pub value: bool,
}

/// Result of describing one collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescribeCollectionResponse {
    /// Outcome of the lookup.
    pub status: Status,
    /// The collection record, when found.
    pub collection: Option<Collection>,
}

/// Collections of one database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShowCollectionsResponse {
    /// Outcome of the lookup.
    pub status: Status,
    /// Collection records, ordered by name.
    pub collections: Vec<Collection>,
}

/// All databases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListDatabasesResponse {
    /// Outcome of the lookup.
    pub status: Status,
    /// Database records, ordered by id.
    pub databases: Vec<Database>,
}

fn resolve_db_name(db_name: &str) -> &str {
    if db_name.is_empty() {
        DEFAULT_DB_NAME
    } else {
        db_name
    }
}

/// The catalog operations of a coordinator.
///
/// Implementors override what they support; everything else answers with a
/// `NotSupported` status.
#[allow(unused_variables)]
pub trait CatalogService: Send + Sync {
    /// Creates a collection. Replaying an identical request succeeds.
    fn create_collection(&self, request: CreateCollectionRequest) -> Status {
        Status::not_supported("CreateCollection")
    }

    /// Checks whether a collection exists.
    fn has_collection(&self, db_name: &str, collection_name: &str) -> BoolResponse {
        BoolResponse {
            status: Status::not_supported("HasCollection"),
            value: false,
        }
    }

    /// Returns the record of one collection.
    fn describe_collection(
        &self,
        db_name: &str,
        collection_name: &str,
    ) -> DescribeCollectionResponse {
        DescribeCollectionResponse {
            status: Status::not_supported("DescribeCollection"),
            collection: None,
        }
    }

    /// Lists the collections of a database.
    fn show_collections(&self, db_name: &str) -> ShowCollectionsResponse {
        ShowCollectionsResponse {
            status: Status::not_supported("ShowCollections"),
            collections: Vec::new(),
        }
    }

    /// Lists every database.
    fn list_databases(&self) -> ListDatabasesResponse {
        ListDatabasesResponse {
            status: Status::not_supported("ListDatabases"),
            databases: Vec::new(),
        }
    }

    /// Creates a database.
    fn create_database(&self, db_name: &str) -> Status {
        Status::not_supported("CreateDatabase")
    }

    /// Drops a database.
    fn drop_database(&self, db_name: &str) -> Status {
        Status::not_supported("DropDatabase")
    }

    /// Drops a collection.
    fn drop_collection(&self, db_name: &str, collection_name: &str) -> Status {
        Status::not_supported("DropCollection")
    }

    /// Alters collection properties.
    fn alter_collection(&self, db_name: &str, collection_name: &str) -> Status {
        Status::not_supported("AlterCollection")
    }

    /// Loads a collection for serving.
    fn load_collection(&self, db_name: &str, collection_name: &str) -> Status {
        Status::not_supported("LoadCollection")
    }

    /// Releases a loaded collection.
    fn release_collection(&self, db_name: &str, collection_name: &str) -> Status {
        Status::not_supported("ReleaseCollection")
    }

    /// Creates a partition.
    fn create_partition(&self, db_name: &str, collection_name: &str, partition: &str) -> Status {
        Status::not_supported("CreatePartition")
    }

    /// Drops a partition.
    fn drop_partition(&self, db_name: &str, collection_name: &str, partition: &str) -> Status {
        Status::not_supported("DropPartition")
    }

    /// Checks whether a partition exists.
    fn has_partition(
        &self,
        db_name: &str,
        collection_name: &str,
        partition: &str,
    ) -> BoolResponse {
        BoolResponse {
            status: Status::not_supported("HasPartition"),
            value: false,
        }
    }

    /// Creates an alias for a collection.
    fn create_alias(&self, db_name: &str, collection_name: &str, alias: &str) -> Status {
        Status::not_supported("CreateAlias")
    }

    /// Drops an alias.
    fn drop_alias(&self, db_name: &str, alias: &str) -> Status {
        Status::not_supported("DropAlias")
    }

    /// Points an alias at another collection.
    fn alter_alias(&self, db_name: &str, collection_name: &str, alias: &str) -> Status {
        Status::not_supported("AlterAlias")
    }

    /// Builds an index on a field.
    fn create_index(&self, db_name: &str, collection_name: &str, field_name: &str) -> Status {
        Status::not_supported("CreateIndex")
    }

    /// Drops an index.
    fn drop_index(&self, db_name: &str, collection_name: &str, index_name: &str) -> Status {
        Status::not_supported("DropIndex")
    }

    /// Inserts rows.
    fn insert(&self, db_name: &str, collection_name: &str, rows: &[u8]) -> Status {
        Status::not_supported("Insert")
    }

    /// Deletes rows matching an expression.
    fn delete(&self, db_name: &str, collection_name: &str, expr: &str) -> Status {
        Status::not_supported("Delete")
    }

    /// Runs a vector search.
    fn search(&self, db_name: &str, collection_name: &str, request: &[u8]) -> Status {
        Status::not_supported("Search")
    }

    /// Runs a scalar query.
    fn query(&self, db_name: &str, collection_name: &str, expr: &str) -> Status {
        Status::not_supported("Query")
    }

    /// Flushes pending data of a collection.
    fn flush(&self, db_name: &str, collection_name: &str) -> Status {
        Status::not_supported("Flush")
    }

    /// Creates a credential.
    fn create_credential(&self, username: &str, password: &str) -> Status {
        Status::not_supported("CreateCredential")
    }

    /// Deletes a credential.
    fn delete_credential(&self, username: &str) -> Status {
        Status::not_supported("DeleteCredential")
    }

    /// Creates a role.
    fn create_role(&self, role: &str) -> Status {
        Status::not_supported("CreateRole")
    }

    /// Drops a role.
    fn drop_role(&self, role: &str) -> Status {
        Status::not_supported("DropRole")
    }

    /// Grants a role to a user.
    fn operate_user_role(&self, username: &str, role: &str) -> Status {
        Status::not_supported("OperateUserRole")
    }
}

/// The catalog coordinator: metadata cache plus identifier allocator.
pub struct Coordinator {
    cache: MetaCache,
    store: MetaStore,
    allocator: Arc<dyn IdAllocator>,
}

impl Coordinator {
    /// Opens a coordinator over a file store at `config.root_path`.
    ///
    /// The allocator is advanced past every persisted identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be opened or loaded.
    pub fn open(config: &Config) -> CoreResult<Self> {
        let store = FileObjectStore::open(&config.root_path, config.store_config())?;
        info!(root = %config.root_path.display(), "opening catalog");

        Self::with_store(Arc::new(store), Arc::new(LocalIdAllocator::new()))
    }

    /// Builds a coordinator from its parts.
    ///
    /// The allocator is advanced past every persisted identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be loaded.
    pub fn with_store(
        store: Arc<dyn ObjectStore>,
        allocator: Arc<dyn IdAllocator>,
    ) -> CoreResult<Self> {
        let store = MetaStore::open(store)?;
        let cache = MetaCache::open(store.clone())?;
        allocator.advance_past(cache.max_allocated_id());
        Ok(Self {
            cache,
            store,
            allocator,
        })
    }

    /// The metadata cache.
    #[must_use]
    pub fn cache(&self) -> &MetaCache {
        &self.cache
    }

    /// Decodes every persisted record and reports failures.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be listed.
    pub fn verify(&self) -> CoreResult<ScanReport> {
        self.store.scan()
    }
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl CatalogService for Coordinator {
    fn create_collection(&self, mut request: CreateCollectionRequest) -> Status {
        request.db_name = resolve_db_name(&request.db_name).to_string();
        info!(
            db = %request.db_name,
            collection = %request.collection_name,
            shards = request.shards_num,
            partitions = request.num_partitions,
            "create collection"
        );

        let result = CreateCollectionTask::new(&self.cache, self.allocator.as_ref(), &request)
            .execute();
        if let Err(e) = &result {
            warn!(collection = %request.collection_name, error = %e, "create collection failed");
        }
        Status::from(&result)
    }

    fn has_collection(&self, db_name: &str, collection_name: &str) -> BoolResponse {
        let result = self
            .cache
            .get_collection_by_name(resolve_db_name(db_name), collection_name);
        BoolResponse {
            status: Status::from(&result),
            value: result.is_ok(),
        }
    }

    fn describe_collection(
        &self,
        db_name: &str,
        collection_name: &str,
    ) -> DescribeCollectionResponse {
        let result = self
            .cache
            .get_collection_by_name(resolve_db_name(db_name), collection_name);
        DescribeCollectionResponse {
            status: Status::from(&result),
            collection: result.ok(),
        }
    }

    fn show_collections(&self, db_name: &str) -> ShowCollectionsResponse {
        let result = self.cache.list_collections(resolve_db_name(db_name));
        ShowCollectionsResponse {
            status: Status::from(&result),
            collections: result.unwrap_or_default(),
        }
    }

    fn list_databases(&self) -> ListDatabasesResponse {
        ListDatabasesResponse {
            status: Status::success(),
            databases: self.cache.list_databases(),
        }
    }
}
