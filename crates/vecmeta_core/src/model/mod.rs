//! Catalog records: databases, collections, fields and partitions.
//!
//! Every record derives serde and is persisted through
//! [`vecmeta_codec::encode_record`].

mod collection;
mod database;
mod field;
mod partition;

pub use collection::{Collection, CollectionSchema, CollectionState, ConsistencyLevel};
pub use database::{Database, DatabaseState, DEFAULT_DB_ID};
pub use field::{
    find_param, DataType, DefaultValue, FieldSchema, KeyValue, DYNAMIC_FIELD_NAME,
    ROW_ID_FIELD_ID, ROW_ID_FIELD_NAME, START_OF_USER_FIELD_ID, TIMESTAMP_FIELD_ID,
    TIMESTAMP_FIELD_NAME,
};
pub use partition::{Partition, PartitionState};
