//! Property-based test generators using proptest.
//!
//! Strategies produce schemas that pass preparation unless the name says
//! otherwise.

use proptest::prelude::*;
use vecmeta_core::{
    CollectionSchema, DataType, DefaultValue, FieldSchema, DIM_KEY, MAX_LENGTH_KEY,
};

/// Strategy for valid collection and field names.
pub fn name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,15}").expect("Invalid regex")
}

/// Strategy for scalar data types that take no type params.
pub fn scalar_type_strategy() -> impl Strategy<Value = DataType> {
    prop_oneof![
        Just(DataType::Bool),
        Just(DataType::Int8),
        Just(DataType::Int16),
        Just(DataType::Int32),
        Just(DataType::Int64),
        Just(DataType::Float),
        Just(DataType::Double),
        Just(DataType::Json),
    ]
}

/// Strategy for a user field with a default value its type accepts.
pub fn defaulted_field_strategy() -> impl Strategy<Value = FieldSchema> {
    prop_oneof![
        any::<bool>().prop_map(|v| (DataType::Bool, DefaultValue::Bool(v))),
        any::<i8>().prop_map(|v| (DataType::Int8, DefaultValue::Int(v.into()))),
        any::<i16>().prop_map(|v| (DataType::Int16, DefaultValue::Int(v.into()))),
        any::<i32>().prop_map(|v| (DataType::Int32, DefaultValue::Int(v))),
        any::<i64>().prop_map(|v| (DataType::Int64, DefaultValue::Long(v))),
        (-1.0e6f32..1.0e6).prop_map(|v| (DataType::Float, DefaultValue::Float(v))),
        (-1.0e12f64..1.0e12).prop_map(|v| (DataType::Double, DefaultValue::Double(v))),
        "[a-z]{0,16}".prop_map(|v| (DataType::VarChar, DefaultValue::String(v))),
    ]
    .prop_map(|(data_type, default)| {
        FieldSchema::new("placeholder", data_type)
            .type_param(MAX_LENGTH_KEY, "16")
            .default_value(default)
    })
}

/// Strategy for a user field without a default.
pub fn plain_field_strategy() -> impl Strategy<Value = FieldSchema> {
    prop_oneof![
        scalar_type_strategy().prop_map(|t| FieldSchema::new("placeholder", t)),
        (1u32..=32).prop_map(|dim| {
            FieldSchema::new("placeholder", DataType::FloatVector)
                .type_param(DIM_KEY, dim.to_string())
        }),
        (1u32..=256).prop_map(|len| {
            FieldSchema::new("placeholder", DataType::VarChar)
                .type_param(MAX_LENGTH_KEY, len.to_string())
        }),
    ]
}

/// Strategy for a valid schema: an int64 primary key followed by up to
/// `max_fields` user fields with distinct names.
pub fn schema_strategy(max_fields: usize) -> impl Strategy<Value = CollectionSchema> {
    (
        name_strategy(),
        prop::collection::vec(
            prop_oneof![plain_field_strategy(), defaulted_field_strategy()],
            0..=max_fields,
        ),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(name, fields, dynamic, auto_id)| {
            let mut schema = CollectionSchema::new(name)
                .field(FieldSchema::new("pk", DataType::Int64).primary_key(auto_id))
                .dynamic(dynamic);
            schema.auto_id = auto_id;
            for (i, mut field) in fields.into_iter().enumerate() {
                field.name = format!("f{i}");
                schema.fields.push(field);
            }
            schema
        })
}

/// Strategy for a valid schema that declares a partition key.
pub fn partition_key_schema_strategy(max_fields: usize) -> impl Strategy<Value = CollectionSchema> {
    schema_strategy(max_fields).prop_map(|schema| {
        schema.field(FieldSchema::new("partition_key", DataType::Int64).partition_key())
    })
}

/// Strategy for an Int8 or Int16 default outside the signed range.
pub fn out_of_range_int_field_strategy() -> impl Strategy<Value = FieldSchema> {
    prop_oneof![
        (i32::from(i8::MAX) + 1..=i32::MAX).prop_map(|v| (DataType::Int8, v)),
        (i32::MIN..i32::from(i8::MIN)).prop_map(|v| (DataType::Int8, v)),
        (i32::from(i16::MAX) + 1..=i32::MAX).prop_map(|v| (DataType::Int16, v)),
        (i32::MIN..i32::from(i16::MIN)).prop_map(|v| (DataType::Int16, v)),
    ]
    .prop_map(|(data_type, v)| {
        FieldSchema::new("small", data_type).default_value(DefaultValue::Int(v))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::strategy::ValueTree;
    use proptest::test_runner::TestRunner;

    #[test]
    fn generated_names_are_valid() {
        let mut runner = TestRunner::default();
        for _ in 0..100 {
            let name = name_strategy().new_tree(&mut runner).unwrap().current();
            assert!(!name.is_empty());
            assert!(name.len() <= 16);
        }
    }

    #[test]
    fn generated_schemas_have_primary_key() {
        let mut runner = TestRunner::default();
        for _ in 0..50 {
            let schema = schema_strategy(6).new_tree(&mut runner).unwrap().current();
            assert!(schema.fields[0].is_primary_key);
            assert!(schema.partition_key_field().is_none());
        }
    }

    #[test]
    fn partition_key_schemas_declare_one() {
        let mut runner = TestRunner::default();
        let schema = partition_key_schema_strategy(3)
            .new_tree(&mut runner)
            .unwrap()
            .current();
        assert!(schema.partition_key_field().is_some());
    }
}
