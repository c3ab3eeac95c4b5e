//! Collection records and submitted schemas.

use super::field::{FieldSchema, KeyValue};
use super::partition::Partition;
use crate::error::{CoreError, CoreResult};
use crate::types::{CollectionId, DatabaseId, Timestamp};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle state of a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionState {
    /// Persisted by the creation workflow. Terminal for this catalog.
    #[default]
    Creating,
    /// Ready for use.
    Created,
    /// Being dropped.
    Dropping,
    /// Dropped.
    Dropped,
}

/// Read-freshness guarantee requested for a collection.
///
/// Stored and echoed, never interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsistencyLevel {
    /// Read your writes across all clients.
    Strong,
    /// Read your own writes.
    Session,
    /// Reads lag by a bounded interval.
    #[default]
    Bounded,
    /// No freshness guarantee.
    Eventually,
    /// Caller-defined guarantee.
    Customized,
}

impl FromStr for ConsistencyLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "strong" => Ok(Self::Strong),
            "session" => Ok(Self::Session),
            "bounded" => Ok(Self::Bounded),
            "eventually" => Ok(Self::Eventually),
            "customized" => Ok(Self::Customized),
            _ => Err(CoreError::invalid_argument(format!(
                "unknown consistency level: {s}"
            ))),
        }
    }
}

/// Schema submitted with a create request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionSchema {
    /// Collection name; must match the request.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Whether primary keys are generated.
    pub auto_id: bool,
    /// Field definitions, in declaration order.
    pub fields: Vec<FieldSchema>,
    /// Whether undeclared attributes are kept in a dynamic field.
    pub enable_dynamic_field: bool,
}

impl CollectionSchema {
    /// Creates an empty schema with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Appends a field.
    #[must_use]
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Sets the dynamic-field flag.
    #[must_use]
    pub fn dynamic(mut self, enabled: bool) -> Self {
        self.enable_dynamic_field = enabled;
        self
    }

    /// The partition-key field, if one is declared.
    #[must_use]
    pub fn partition_key_field(&self) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.is_partition_key)
    }
}

/// A persisted collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Tenant owning the database.
    pub tenant_id: String,
    /// Owning database.
    pub db_id: DatabaseId,
    /// Allocated id.
    pub collection_id: CollectionId,
    /// Name, unique within the database.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Whether primary keys are generated.
    pub auto_id: bool,
    /// Normalized fields, system fields last.
    pub fields: Vec<FieldSchema>,
    /// Number of shards.
    pub shards_num: i32,
    /// Requested consistency level.
    pub consistency_level: ConsistencyLevel,
    /// Creation time, seconds since the epoch.
    pub create_time: Timestamp,
    /// Lifecycle state.
    pub state: CollectionState,
    /// Initial partitions, in allocation order.
    pub partitions: Vec<Partition>,
    /// Ordered free-form properties.
    pub properties: Vec<KeyValue>,
    /// Whether a dynamic field is present.
    pub enable_dynamic_field: bool,
}

impl Collection {
    /// Compares the definitions of two collections.
    ///
    /// Identifiers of the collection and its partitions, timestamps and state
    /// are ignored; partitions compare by name only.
    #[must_use]
    pub fn same_definition(&self, other: &Self) -> bool {
        self.tenant_id == other.tenant_id
            && self.db_id == other.db_id
            && self.name == other.name
            && self.description == other.description
            && self.auto_id == other.auto_id
            && self.fields == other.fields
            && self.shards_num == other.shards_num
            && self.consistency_level == other.consistency_level
            && self.properties == other.properties
            && self.enable_dynamic_field == other.enable_dynamic_field
            && self.partition_names().eq(other.partition_names())
    }

    /// Names of the partitions, in order.
    pub fn partition_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.partitions.iter().map(|p| p.name.as_str())
    }

    /// Names of the fields, in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DataType, PartitionState};
    use crate::types::PartitionId;

    fn collection(collection_id: i64, partition_id: i64) -> Collection {
        Collection {
            tenant_id: String::new(),
            db_id: DatabaseId::new(1),
            collection_id: CollectionId::new(collection_id),
            name: "films".into(),
            description: String::new(),
            auto_id: false,
            fields: vec![FieldSchema::new("id", DataType::Int64).primary_key(false)],
            shards_num: 1,
            consistency_level: ConsistencyLevel::Strong,
            create_time: 100,
            state: CollectionState::Creating,
            partitions: vec![Partition {
                id: PartitionId::new(partition_id),
                name: "default".into(),
                collection_id: CollectionId::new(collection_id),
                created_time: 100,
                state: PartitionState::Created,
            }],
            properties: vec![],
            enable_dynamic_field: false,
        }
    }

    #[test]
    fn same_definition_ignores_ids_and_time() {
        let a = collection(10, 11);
        let mut b = collection(20, 21);
        b.create_time = 999;
        b.state = CollectionState::Created;
        assert!(a.same_definition(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn same_definition_sees_field_changes() {
        let a = collection(10, 11);
        let mut b = collection(10, 11);
        b.fields.push(FieldSchema::new("title", DataType::VarChar));
        assert!(!a.same_definition(&b));
    }

    #[test]
    fn same_definition_sees_partition_names() {
        let a = collection(10, 11);
        let mut b = collection(10, 11);
        b.partitions[0].name = "default_0".into();
        assert!(!a.same_definition(&b));
    }

    #[test]
    fn same_definition_sees_properties() {
        let a = collection(10, 11);
        let mut b = collection(10, 11);
        b.properties.push(KeyValue::new("ttl", "60"));
        assert!(!a.same_definition(&b));
    }

    #[test]
    fn consistency_level_parses() {
        assert_eq!(
            "Strong".parse::<ConsistencyLevel>().unwrap(),
            ConsistencyLevel::Strong
        );
        assert_eq!(
            "eventually".parse::<ConsistencyLevel>().unwrap(),
            ConsistencyLevel::Eventually
        );
        assert!("fast".parse::<ConsistencyLevel>().is_err());
    }

    #[test]
    fn partition_key_lookup() {
        let schema = CollectionSchema::new("films")
            .field(FieldSchema::new("id", DataType::Int64).primary_key(false))
            .field(FieldSchema::new("genre", DataType::VarChar).partition_key());
        assert_eq!(schema.partition_key_field().map(|f| f.name.as_str()), Some("genre"));
    }
}
