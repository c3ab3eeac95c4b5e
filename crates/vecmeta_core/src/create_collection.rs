//! Collection creation workflow.

use crate::allocator::IdAllocator;
use crate::cache::MetaCache;
use crate::error::{CoreError, CoreResult};
use crate::model::{Collection, CollectionState, ConsistencyLevel, KeyValue};
use crate::partition::assign_partitions;
use crate::schema::prepare_schema;
use crate::types::{unix_timestamp, CollectionId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A request to create one collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCollectionRequest {
    /// Owning database; empty means the default database.
    pub db_name: String,
    /// Collection name.
    pub collection_name: String,
    /// CBOR encoding of a [`crate::CollectionSchema`].
    pub schema: Vec<u8>,
    /// Number of shards.
    pub shards_num: i32,
    /// Requested consistency level.
    pub consistency_level: ConsistencyLevel,
    /// Partition count when the schema declares a partition key.
    pub num_partitions: i64,
    /// Ordered free-form properties.
    pub properties: Vec<KeyValue>,
}

/// One run of the creation workflow.
///
/// No lock is held across the steps. Two concurrent identical requests may
/// both allocate identifiers; only one record is persisted.
pub struct CreateCollectionTask<'a> {
    cache: &'a MetaCache,
    allocator: &'a dyn IdAllocator,
    request: &'a CreateCollectionRequest,
}

impl<'a> CreateCollectionTask<'a> {
    /// Creates a task for `request`.
    pub fn new(
        cache: &'a MetaCache,
        allocator: &'a dyn IdAllocator,
        request: &'a CreateCollectionRequest,
    ) -> Self {
        Self {
            cache,
            allocator,
            request,
        }
    }

    /// Runs the workflow.
    ///
    /// Validation happens before the single write, so a failed call leaves
    /// no visible state behind.
    ///
    /// # Errors
    ///
    /// - [`CoreError::Unavailable`] if the database lookup or id allocation fails
    /// - [`CoreError::InvalidArgument`] if the schema or partition count is invalid
    /// - Whatever [`MetaCache::add_collection`] returns
    pub fn execute(&self) -> CoreResult<()> {
        let request = self.request;

        let database = self.cache.get_database_by_name(&request.db_name).map_err(|e| {
            CoreError::unavailable(format!("failed to resolve database {}: {e}", request.db_name))
        })?;

        let collection_id = self
            .allocator
            .alloc_one()
            .map(CollectionId::new)
            .map_err(|e| CoreError::unavailable(format!("failed to allocate collection id: {e}")))?;

        let schema = prepare_schema(&request.schema, &request.collection_name)?;

        let create_time = unix_timestamp();
        let partitions = assign_partitions(
            self.allocator,
            request.num_partitions,
            &schema,
            collection_id,
            create_time,
        )?;

        debug!(
            collection = %schema.name,
            collection_id = %collection_id,
            fields = schema.fields.len(),
            "assembled collection record"
        );

        self.cache.add_collection(Collection {
            tenant_id: database.tenant_id,
            db_id: database.id,
            collection_id,
            name: schema.name,
            description: schema.description,
            auto_id: schema.auto_id,
            fields: schema.fields,
            shards_num: request.shards_num,
            consistency_level: request.consistency_level,
            create_time,
            state: CollectionState::Creating,
            partitions,
            properties: request.properties.clone(),
            enable_dynamic_field: schema.enable_dynamic_field,
        })
    }
}
