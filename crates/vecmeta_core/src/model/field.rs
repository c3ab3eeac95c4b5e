//! Field definitions.

use crate::types::FieldId;
use serde::{Deserialize, Serialize};

/// First identifier handed to user fields.
pub const START_OF_USER_FIELD_ID: FieldId = FieldId::new(100);

/// Identifier of the row-id system field.
pub const ROW_ID_FIELD_ID: FieldId = FieldId::new(0);

/// Identifier of the timestamp system field.
pub const TIMESTAMP_FIELD_ID: FieldId = FieldId::new(1);

/// Name of the row-id system field.
pub const ROW_ID_FIELD_NAME: &str = "RowID";

/// Name of the timestamp system field.
pub const TIMESTAMP_FIELD_NAME: &str = "Timestamp";

/// Name of the synthetic field holding dynamic attributes.
pub const DYNAMIC_FIELD_NAME: &str = "$meta";

/// Data type of a field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Unset.
    #[default]
    None,
    /// Boolean.
    Bool,
    /// Signed 8-bit integer.
    Int8,
    /// Signed 16-bit integer.
    Int16,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    /// Unbounded string.
    String,
    /// String bounded by the `max_length` type param.
    VarChar,
    /// Array of scalars.
    Array,
    /// JSON document.
    Json,
    /// Binary vector, `dim` bits.
    BinaryVector,
    /// Float vector, `dim` components.
    FloatVector,
    /// Half-precision float vector.
    Float16Vector,
}

/// Typed default value of a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DefaultValue {
    /// Boolean default.
    Bool(bool),
    /// Default for Int8, Int16 and Int32 fields.
    Int(i32),
    /// Default for Int64 fields.
    Long(i64),
    /// Default for Float fields.
    Float(f32),
    /// Default for Double fields.
    Double(f64),
    /// Default for VarChar fields.
    String(String),
    /// Raw bytes. No field type accepts it.
    Bytes(Vec<u8>),
}

/// One entry of an ordered parameter or property list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyValue {
    /// Key.
    pub key: String,
    /// Value.
    pub value: String,
}

impl KeyValue {
    /// Creates a pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Looks up the first value stored under `key`.
#[must_use]
pub fn find_param<'a>(params: &'a [KeyValue], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|kv| kv.key == key)
        .map(|kv| kv.value.as_str())
}

/// Definition of one field of a collection schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSchema {
    /// Field id, assigned by the schema preparer.
    pub field_id: FieldId,
    /// Field name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Declared data type.
    pub data_type: DataType,
    /// Whether this is the primary key.
    pub is_primary_key: bool,
    /// Whether the primary key is generated.
    pub auto_id: bool,
    /// Whether rows are routed to partitions by this field.
    pub is_partition_key: bool,
    /// Whether this field holds dynamic attributes.
    pub is_dynamic: bool,
    /// Optional default value.
    pub default_value: Option<DefaultValue>,
    /// Type parameters such as `max_length` and `dim`.
    pub type_params: Vec<KeyValue>,
    /// Index parameters.
    pub index_params: Vec<KeyValue>,
}

impl FieldSchema {
    /// Creates a field with the given name and type.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            ..Self::default()
        }
    }

    /// Marks the field as primary key.
    #[must_use]
    pub fn primary_key(mut self, auto_id: bool) -> Self {
        self.is_primary_key = true;
        self.auto_id = auto_id;
        self
    }

    /// Marks the field as partition key.
    #[must_use]
    pub fn partition_key(mut self) -> Self {
        self.is_partition_key = true;
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends a type parameter.
    #[must_use]
    pub fn type_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.type_params.push(KeyValue::new(key, value));
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default_value(mut self, value: DefaultValue) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Value of a type parameter.
    #[must_use]
    pub fn type_param_value(&self, key: &str) -> Option<&str> {
        find_param(&self.type_params, key)
    }

    pub(crate) fn row_id() -> Self {
        Self {
            field_id: ROW_ID_FIELD_ID,
            ..Self::new(ROW_ID_FIELD_NAME, DataType::Int64).description("row id")
        }
    }

    pub(crate) fn timestamp() -> Self {
        Self {
            field_id: TIMESTAMP_FIELD_ID,
            ..Self::new(TIMESTAMP_FIELD_NAME, DataType::Int64).description("time stamp")
        }
    }

    pub(crate) fn dynamic() -> Self {
        Self {
            is_dynamic: true,
            ..Self::new(DYNAMIC_FIELD_NAME, DataType::Json).description("dynamic schema")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_flags() {
        let field = FieldSchema::new("title", DataType::VarChar)
            .type_param("max_length", "64")
            .default_value(DefaultValue::String("n/a".into()));
        assert_eq!(field.type_param_value("max_length"), Some("64"));
        assert_eq!(field.type_param_value("dim"), None);
        assert!(!field.is_primary_key);
        assert!(field.default_value.is_some());
    }

    #[test]
    fn system_fields() {
        let row = FieldSchema::row_id();
        assert_eq!(row.field_id, ROW_ID_FIELD_ID);
        assert_eq!(row.description, "row id");
        assert_eq!(row.data_type, DataType::Int64);

        let ts = FieldSchema::timestamp();
        assert_eq!(ts.field_id, TIMESTAMP_FIELD_ID);
        assert_eq!(ts.name, "Timestamp");
        assert!(!ts.is_primary_key);

        let meta = FieldSchema::dynamic();
        assert!(meta.is_dynamic);
        assert_eq!(meta.data_type, DataType::Json);
    }

    #[test]
    fn find_param_returns_first_match() {
        let params = vec![KeyValue::new("dim", "8"), KeyValue::new("dim", "16")];
        assert_eq!(find_param(&params, "dim"), Some("8"));
    }
}
