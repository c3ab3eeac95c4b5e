//! Cross-crate integration helpers.
//!
//! [`CatalogHarness`] records every successful creation and can check that
//! the catalog still holds exactly those collections, before or after a
//! reopen.

use crate::fixtures::TestCatalog;
use std::collections::BTreeMap;
use vecmeta_codec::decode_record;
use vecmeta_core::{
    CatalogService, Collection, CollectionSchema, CreateCollectionRequest, Status,
    ROW_ID_FIELD_ID, START_OF_USER_FIELD_ID, TIMESTAMP_FIELD_ID,
};

/// A file-backed catalog plus the requests that succeeded on it.
pub struct CatalogHarness {
    catalog: TestCatalog,
    created: BTreeMap<String, CreateCollectionRequest>,
}

impl CatalogHarness {
    /// Creates a harness over a fresh temporary catalog.
    pub fn new() -> Self {
        Self {
            catalog: TestCatalog::new(),
            created: BTreeMap::new(),
        }
    }

    /// Sends a create request and tracks it when it succeeds.
    pub fn create(&mut self, request: CreateCollectionRequest) -> Status {
        let status = self.catalog.create_collection(request.clone());
        if status.is_success() {
            self.created
                .entry(request.collection_name.clone())
                .or_insert(request);
        }
        status
    }

    /// Reopens the catalog over the same directory.
    pub fn reopen(self) -> Self {
        Self {
            catalog: self.catalog.reopen(),
            created: self.created,
        }
    }

    /// The underlying catalog.
    pub fn catalog(&self) -> &TestCatalog {
        &self.catalog
    }

    /// Number of tracked collections.
    pub fn tracked_count(&self) -> usize {
        self.created.len()
    }

    /// Checks every tracked collection against the catalog.
    pub fn verify_all(&self) {
        let listed = self.catalog.show_collections("").collections;
        assert_eq!(listed.len(), self.created.len(), "collection count mismatch");

        for (name, request) in &self.created {
            let described = self.catalog.describe_collection("", name);
            let collection = described
                .collection
                .unwrap_or_else(|| panic!("collection {name} missing: {:?}", described.status));
            assert_matches_request(&collection, request);
        }
    }
}

impl Default for CatalogHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Asserts that `collection` is what `request` should have produced.
pub fn assert_matches_request(collection: &Collection, request: &CreateCollectionRequest) {
    let schema: CollectionSchema =
        decode_record(&request.schema).expect("request schema should decode");

    assert_eq!(collection.name, request.collection_name);
    assert_eq!(collection.shards_num, request.shards_num);
    assert_eq!(collection.consistency_level, request.consistency_level);
    assert_eq!(collection.properties, request.properties);
    assert_eq!(collection.enable_dynamic_field, schema.enable_dynamic_field);
    assert_eq!(collection.auto_id, schema.auto_id);

    let user_fields = schema.fields.len() + usize::from(schema.enable_dynamic_field);
    assert_eq!(collection.fields.len(), user_fields + 2);
    for (expected, actual) in schema.fields.iter().zip(&collection.fields) {
        assert_eq!(actual.name, expected.name);
        assert_eq!(actual.data_type, expected.data_type);
        assert_eq!(actual.default_value, expected.default_value);
    }
    assert_system_fields(collection);

    let expected_partitions = if schema.partition_key_field().is_some() {
        usize::try_from(request.num_partitions).unwrap_or(0)
    } else {
        1
    };
    assert_eq!(collection.partitions.len(), expected_partitions);
}

/// Asserts the field id layout: user ids from 100, then RowID and Timestamp.
pub fn assert_system_fields(collection: &Collection) {
    let n = collection.fields.len();
    assert!(n >= 2, "collection {} has no system fields", collection.name);

    for (offset, field) in (0..).zip(&collection.fields[..n - 2]) {
        assert_eq!(field.field_id.as_i64(), START_OF_USER_FIELD_ID.as_i64() + offset);
    }
    assert_eq!(collection.fields[n - 2].field_id, ROW_ID_FIELD_ID);
    assert_eq!(collection.fields[n - 1].field_id, TIMESTAMP_FIELD_ID);
    let system = collection
        .fields
        .iter()
        .filter(|f| f.field_id == ROW_ID_FIELD_ID || f.field_id == TIMESTAMP_FIELD_ID)
        .count();
    assert_eq!(system, 2);
}
