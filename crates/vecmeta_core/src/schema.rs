//! Schema preparation: validate a submitted schema and normalize it for
//! persistence.

use crate::error::{CoreError, CoreResult};
use crate::model::{CollectionSchema, DataType, DefaultValue, FieldSchema, START_OF_USER_FIELD_ID};
use crate::types::FieldId;
use vecmeta_codec::decode_payload;

/// Type parameter holding the byte limit of a VarChar field.
pub const MAX_LENGTH_KEY: &str = "max_length";

/// Type parameter holding the dimension of a vector field.
pub const DIM_KEY: &str = "dim";

/// Decodes, validates and normalizes a schema payload.
///
/// The returned schema carries field ids from 100 upward in declaration
/// order, an optional `$meta` dynamic field, and the `RowID` and `Timestamp`
/// system fields last.
///
/// # Errors
///
/// Returns [`CoreError::InvalidArgument`] if the payload does not decode,
/// names another collection, or carries a default value incompatible with
/// its field.
pub fn prepare_schema(payload: &[u8], collection_name: &str) -> CoreResult<CollectionSchema> {
    let mut schema: CollectionSchema = decode_payload(payload)
        .map_err(|e| CoreError::invalid_argument(format!("failed to decode schema: {e}")))?;

    if schema.name != collection_name {
        return Err(CoreError::invalid_argument(format!(
            "collection name = {collection_name}, schema.name = {}",
            schema.name
        )));
    }

    for field in &schema.fields {
        check_default_value(field)?;
    }

    if schema.enable_dynamic_field {
        schema.fields.push(FieldSchema::dynamic());
    }

    for (offset, field) in (0..).zip(schema.fields.iter_mut()) {
        field.field_id = FieldId::new(START_OF_USER_FIELD_ID.as_i64() + offset);
    }

    schema.fields.push(FieldSchema::row_id());
    schema.fields.push(FieldSchema::timestamp());
    Ok(schema)
}

fn check_default_value(field: &FieldSchema) -> CoreResult<()> {
    let Some(default) = &field.default_value else {
        return Ok(());
    };

    match (default, field.data_type) {
        (DefaultValue::Bool(_), DataType::Bool)
        | (DefaultValue::Long(_), DataType::Int64)
        | (DefaultValue::Int(_), DataType::Int32) => Ok(()),
        (DefaultValue::Float(v), DataType::Float) => check_not_nan(field, v.is_nan()),
        (DefaultValue::Double(v), DataType::Double) => check_not_nan(field, v.is_nan()),
        (DefaultValue::Int(v), DataType::Int8) => {
            check_int_range(field, *v, i8::MIN.into(), i8::MAX.into())
        }
        (DefaultValue::Int(v), DataType::Int16) => {
            check_int_range(field, *v, i16::MIN.into(), i16::MAX.into())
        }
        (DefaultValue::String(s), DataType::VarChar) => {
            let max_length = varchar_max_length(field)?;
            if s.len() > max_length {
                return Err(CoreError::invalid_argument(format!(
                    "default value length {} of field {} exceeds max_length {max_length}",
                    s.len(),
                    field.name
                )));
            }
            Ok(())
        }
        (default, data_type) => Err(CoreError::invalid_argument(format!(
            "default value type mismatch: field {} is {data_type:?}, default is {}",
            field.name,
            default_kind(default)
        ))),
    }
}

fn check_not_nan(field: &FieldSchema, is_nan: bool) -> CoreResult<()> {
    if is_nan {
        return Err(CoreError::invalid_argument(format!(
            "default value of field {} is NaN",
            field.name
        )));
    }
    Ok(())
}

fn check_int_range(field: &FieldSchema, value: i32, min: i32, max: i32) -> CoreResult<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(CoreError::invalid_argument(format!(
            "default value {value} of field {} is out of range [{min}, {max}] for {:?}",
            field.name, field.data_type
        )))
    }
}

fn varchar_max_length(field: &FieldSchema) -> CoreResult<usize> {
    let raw = field.type_param_value(MAX_LENGTH_KEY).ok_or_else(|| {
        CoreError::invalid_argument(format!("field {} has no {MAX_LENGTH_KEY}", field.name))
    })?;
    raw.trim().parse().map_err(|_| {
        CoreError::invalid_argument(format!(
            "field {} has invalid {MAX_LENGTH_KEY}: {raw}",
            field.name
        ))
    })
}

fn default_kind(default: &DefaultValue) -> &'static str {
    match default {
        DefaultValue::Bool(_) => "bool",
        DefaultValue::Int(_) => "int",
        DefaultValue::Long(_) => "long",
        DefaultValue::Float(_) => "float",
        DefaultValue::Double(_) => "double",
        DefaultValue::String(_) => "string",
        DefaultValue::Bytes(_) => "bytes",
    }
}
