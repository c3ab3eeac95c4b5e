//! Metadata cache.
//!
//! The cache is the single source of truth for what exists while the
//! process runs. Reads are served from memory under a shared lock. Writes
//! hold the exclusive lock across the store write and touch the index only
//! after the write succeeded, so observers see either the old state or the
//! fully persisted new one.

use crate::config::DEFAULT_DB_NAME;
use crate::error::{CoreError, CoreResult};
use crate::meta_store::MetaStore;
use crate::model::{Collection, Database};
use crate::types::{unix_timestamp, DatabaseId, UniqueId};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, info, warn};

#[derive(Default)]
struct CacheIndex {
    databases: HashMap<String, Database>,
    collections: HashMap<(DatabaseId, String), Collection>,
}

impl CacheIndex {
    fn database(&self, name: &str) -> CoreResult<&Database> {
        self.databases
            .get(name)
            .ok_or_else(|| CoreError::database_not_found(name))
    }
}

/// In-memory, write-through index over databases and collections.
pub struct MetaCache {
    store: MetaStore,
    index: RwLock<CacheIndex>,
}

impl MetaCache {
    /// Loads every record from `store` and bootstraps the default database.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or the default database cannot be
    /// persisted.
    pub fn open(store: MetaStore) -> CoreResult<Self> {
        let mut index = CacheIndex::default();

        for database in store.load_databases()? {
            index.databases.insert(database.name.clone(), database);
        }

        for collection in store.load_collections()? {
            if !index.databases.values().any(|db| db.id == collection.db_id) {
                warn!(
                    collection = %collection.name,
                    db_id = %collection.db_id,
                    "collection references an unknown database"
                );
            }
            index
                .collections
                .insert((collection.db_id, collection.name.clone()), collection);
        }

        if !index.databases.contains_key(DEFAULT_DB_NAME) {
            let database = Database::default_database(unix_timestamp());
            store.save_database(&database)?;
            info!(db_id = %database.id, "created default database");
            index.databases.insert(database.name.clone(), database);
        }

        info!(
            databases = index.databases.len(),
            collections = index.collections.len(),
            "metadata cache initialized"
        );

        Ok(Self {
            store,
            index: RwLock::new(index),
        })
    }

    /// Adds a collection unless one with the same name already exists in
    /// its database.
    ///
    /// Re-adding a definitionally equal collection succeeds without a write.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::CollectionAlreadyExists`] if the name is taken by
    /// a different definition, [`CoreError::Internal`] if the collection id
    /// already belongs to another collection, or the store error if
    /// persisting fails.
    pub fn add_collection(&self, collection: Collection) -> CoreResult<()> {
        let mut index = self.index.write();
        let key = (collection.db_id, collection.name.clone());

        if let Some(existing) = index.collections.get(&key) {
            if existing.same_definition(&collection) {
                debug!(
                    collection = %collection.name,
                    collection_id = %existing.collection_id,
                    "collection already exists with the same definition"
                );
                return Ok(());
            }
            warn!(
                collection = %collection.name,
                db_id = %collection.db_id,
                "collection name taken by a different definition"
            );
            return Err(CoreError::CollectionAlreadyExists {
                name: collection.name,
            });
        }

        if let Some(owner) = index
            .collections
            .values()
            .find(|c| c.collection_id == collection.collection_id)
        {
            warn!(
                collection = %collection.name,
                collection_id = %collection.collection_id,
                owner = %owner.name,
                "collection id already in use"
            );
            return Err(CoreError::internal(format!(
                "collection id {} of {} is already held by {}",
                collection.collection_id, collection.name, owner.name
            )));
        }

        self.store.save_collection(&collection)?;
        info!(
            collection = %collection.name,
            collection_id = %collection.collection_id,
            db_id = %collection.db_id,
            partitions = collection.partitions.len(),
            "collection added"
        );
        index.collections.insert(key, collection);
        Ok(())
    }

    /// Looks up a database by name.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DatabaseNotFound`] if absent.
    pub fn get_database_by_name(&self, name: &str) -> CoreResult<Database> {
        self.index.read().database(name).cloned()
    }

    /// Looks up a database by id.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DatabaseNotFound`] if absent.
    pub fn get_database_by_id(&self, id: DatabaseId) -> CoreResult<Database> {
        self.index
            .read()
            .databases
            .values()
            .find(|db| db.id == id)
            .cloned()
            .ok_or_else(|| CoreError::database_not_found(id.to_string()))
    }

    /// Looks up a collection by database name and collection name.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DatabaseNotFound`] or
    /// [`CoreError::CollectionNotFound`].
    pub fn get_collection_by_name(&self, db_name: &str, name: &str) -> CoreResult<Collection> {
        let index = self.index.read();
        let db_id = index.database(db_name)?.id;
        index
            .collections
            .get(&(db_id, name.to_string()))
            .cloned()
            .ok_or_else(|| CoreError::collection_not_found(name))
    }

    /// All databases, ordered by id.
    #[must_use]
    pub fn list_databases(&self) -> Vec<Database> {
        let mut databases: Vec<_> = self.index.read().databases.values().cloned().collect();
        databases.sort_by_key(|db| db.id);
        databases
    }

    /// Collections of one database, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DatabaseNotFound`] if the database is absent.
    pub fn list_collections(&self, db_name: &str) -> CoreResult<Vec<Collection>> {
        let index = self.index.read();
        let db_id = index.database(db_name)?.id;
        let mut collections: Vec<_> = index
            .collections
            .iter()
            .filter(|((id, _), _)| *id == db_id)
            .map(|(_, c)| c.clone())
            .collect();
        collections.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(collections)
    }

    /// Number of indexed collections across all databases.
    #[must_use]
    pub fn collection_count(&self) -> usize {
        self.index.read().collections.len()
    }

    /// Largest identifier held by any indexed record.
    #[must_use]
    pub fn max_allocated_id(&self) -> UniqueId {
        let index = self.index.read();
        let databases = index.databases.values().map(|db| db.id.as_i64());
        let collections = index.collections.values().flat_map(|c| {
            std::iter::once(c.collection_id.as_i64())
                .chain(c.partitions.iter().map(|p| p.id.as_i64()))
        });
        databases.chain(collections).max().unwrap_or(0)
    }
}

impl std::fmt::Debug for MetaCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let index = self.index.read();
        f.debug_struct("MetaCache")
            .field("databases", &index.databases.len())
            .field("collections", &index.collections.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        CollectionState, ConsistencyLevel, DataType, FieldSchema, Partition, PartitionState,
        DEFAULT_DB_ID,
    };
    use crate::types::{CollectionId, PartitionId};
    use std::sync::Arc;
    use vecmeta_storage::{InMemoryObjectStore, ObjectStore};

    fn collection(db_id: DatabaseId, name: &str, id: i64) -> Collection {
        Collection {
            tenant_id: String::new(),
            db_id,
            collection_id: CollectionId::new(id),
            name: name.to_string(),
            description: String::new(),
            auto_id: false,
            fields: vec![FieldSchema::new("id", DataType::Int64).primary_key(false)],
            shards_num: 2,
            consistency_level: ConsistencyLevel::Bounded,
            create_time: 1,
            state: CollectionState::Creating,
            partitions: vec![Partition {
                id: PartitionId::new(id + 1),
                name: "default".to_string(),
                collection_id: CollectionId::new(id),
                created_time: 1,
                state: PartitionState::Created,
            }],
            properties: vec![],
            enable_dynamic_field: false,
        }
    }

    fn open_cache() -> (Arc<InMemoryObjectStore>, MetaCache) {
        let backing = Arc::new(InMemoryObjectStore::new());
        let store = MetaStore::open(backing.clone()).unwrap();
        (backing, MetaCache::open(store).unwrap())
    }

    #[test]
    fn open_bootstraps_default_database() {
        let (backing, cache) = open_cache();
        let db = cache.get_database_by_name("default").unwrap();
        assert_eq!(db.id, DEFAULT_DB_ID);
        assert!(backing.get("databases/1").is_ok());
    }

    #[test]
    fn reopen_keeps_single_default_database() {
        let backing = Arc::new(InMemoryObjectStore::new());
        for _ in 0..3 {
            let store = MetaStore::open(backing.clone()).unwrap();
            MetaCache::open(store).unwrap();
        }
        let store = MetaStore::open(backing).unwrap();
        assert_eq!(store.load_databases().unwrap().len(), 1);
    }

    #[test]
    fn add_then_get() {
        let (_, cache) = open_cache();
        cache.add_collection(collection(DEFAULT_DB_ID, "films", 10)).unwrap();
        let found = cache.get_collection_by_name("default", "films").unwrap();
        assert_eq!(found.collection_id, CollectionId::new(10));
        assert_eq!(cache.collection_count(), 1);
    }

    #[test]
    fn identical_add_is_noop() {
        let (backing, cache) = open_cache();
        cache.add_collection(collection(DEFAULT_DB_ID, "films", 10)).unwrap();
        let records = backing.len();
        cache.add_collection(collection(DEFAULT_DB_ID, "films", 20)).unwrap();
        assert_eq!(backing.len(), records);
        let found = cache.get_collection_by_name("default", "films").unwrap();
        assert_eq!(found.collection_id, CollectionId::new(10));
    }

    #[test]
    fn divergent_add_conflicts() {
        let (_, cache) = open_cache();
        cache.add_collection(collection(DEFAULT_DB_ID, "films", 10)).unwrap();
        let mut other = collection(DEFAULT_DB_ID, "films", 20);
        other.shards_num = 4;
        assert!(matches!(
            cache.add_collection(other),
            Err(CoreError::CollectionAlreadyExists { .. })
        ));
        let found = cache.get_collection_by_name("default", "films").unwrap();
        assert_eq!(found.shards_num, 2);
    }

    #[test]
    fn reused_collection_id_rejected() {
        let (backing, cache) = open_cache();
        cache.add_collection(collection(DEFAULT_DB_ID, "films", 10)).unwrap();
        let records = backing.len();
        assert!(matches!(
            cache.add_collection(collection(DEFAULT_DB_ID, "books", 10)),
            Err(CoreError::Internal { .. })
        ));
        assert_eq!(backing.len(), records);

        let reopened = MetaCache::open(MetaStore::open(backing).unwrap()).unwrap();
        assert!(reopened.get_collection_by_name("default", "films").is_ok());
        assert!(reopened.get_collection_by_name("default", "books").is_err());
    }

    #[test]
    fn failed_write_leaves_index_untouched() {
        let (backing, cache) = open_cache();
        backing.set_fail_writes(true);
        assert!(cache.add_collection(collection(DEFAULT_DB_ID, "films", 10)).is_err());
        backing.set_fail_writes(false);
        assert!(matches!(
            cache.get_collection_by_name("default", "films"),
            Err(CoreError::CollectionNotFound { .. })
        ));
        assert_eq!(cache.collection_count(), 0);
    }

    #[test]
    fn same_name_in_different_databases() {
        let backing = Arc::new(InMemoryObjectStore::new());
        let store = MetaStore::open(backing.clone()).unwrap();
        let mut other_db = Database::default_database(0);
        other_db.id = DatabaseId::new(2);
        other_db.name = "analytics".to_string();
        store.save_database(&other_db).unwrap();

        let cache = MetaCache::open(store).unwrap();
        cache.add_collection(collection(DEFAULT_DB_ID, "films", 10)).unwrap();
        let mut second = collection(DatabaseId::new(2), "films", 20);
        second.shards_num = 8;
        cache.add_collection(second).unwrap();

        assert_eq!(
            cache.get_collection_by_name("analytics", "films").unwrap().shards_num,
            8
        );
        assert_eq!(
            cache.get_collection_by_name("default", "films").unwrap().shards_num,
            2
        );
        assert_eq!(cache.list_databases().len(), 2);
        assert_eq!(cache.list_databases()[0].id, DEFAULT_DB_ID);
    }

    #[test]
    fn missing_database_and_collection() {
        let (_, cache) = open_cache();
        assert!(matches!(
            cache.get_database_by_name("nope"),
            Err(CoreError::DatabaseNotFound { .. })
        ));
        assert!(matches!(
            cache.get_collection_by_name("nope", "films"),
            Err(CoreError::DatabaseNotFound { .. })
        ));
        assert!(matches!(
            cache.get_collection_by_name("default", "films"),
            Err(CoreError::CollectionNotFound { .. })
        ));
        assert!(cache.get_database_by_id(DatabaseId::new(9)).is_err());
        assert_eq!(cache.get_database_by_id(DEFAULT_DB_ID).unwrap().name, "default");
    }

    #[test]
    fn list_collections_sorted_by_name() {
        let (_, cache) = open_cache();
        for (name, id) in [("zeta", 30), ("alpha", 10), ("mid", 20)] {
            cache.add_collection(collection(DEFAULT_DB_ID, name, id)).unwrap();
        }
        let names: Vec<_> = cache
            .list_collections("default")
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn orphan_collections_are_indexed() {
        let backing = Arc::new(InMemoryObjectStore::new());
        let store = MetaStore::open(backing.clone()).unwrap();
        store
            .save_collection(&collection(DatabaseId::new(77), "lost", 5))
            .unwrap();
        let cache = MetaCache::open(store).unwrap();
        assert_eq!(cache.collection_count(), 1);
        assert_eq!(cache.max_allocated_id(), 6);
    }

    #[test]
    fn reopen_restores_collections() {
        let backing = Arc::new(InMemoryObjectStore::new());
        let first = MetaCache::open(MetaStore::open(backing.clone()).unwrap()).unwrap();
        let original = collection(DEFAULT_DB_ID, "films", 10);
        first.add_collection(original.clone()).unwrap();
        drop(first);

        let second = MetaCache::open(MetaStore::open(backing).unwrap()).unwrap();
        assert_eq!(
            second.get_collection_by_name("default", "films").unwrap(),
            original
        );
    }
}
