//! Serde bridge: typed records to canonical CBOR and back.
//!
//! Records are first serialized through ciborium's dynamic value, then
//! rewritten into [`Value`] and encoded canonically. Decoding runs the
//! canonical decoder first, so non-canonical input never reaches serde.
//! [`decode_payload`] accepts any well-formed CBOR item for inbound data
//! that is never persisted as-is.

use crate::decoder::from_cbor;
use crate::encoder::to_canonical_cbor;
use crate::error::{CodecError, CodecResult};
use crate::value::Value;
use ciborium::value::{Integer, Value as CborValue};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encode a serializable record to canonical CBOR bytes.
///
/// # Errors
///
/// Returns an error if serde rejects the record, or if it contains NaN,
/// tags, or integers outside the signed 64-bit range.
pub fn encode_record<T: Serialize>(record: &T) -> CodecResult<Vec<u8>> {
    let dynamic = CborValue::serialized(record)
        .map_err(|e| CodecError::encoding_failed(e.to_string()))?;
    to_canonical_cbor(&from_dynamic(dynamic)?)
}

/// Decode a record from canonical CBOR bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not canonical CBOR or do not match
/// the shape of `T`.
pub fn decode_record<T: DeserializeOwned>(bytes: &[u8]) -> CodecResult<T> {
    let value = from_cbor(bytes)?;
    into_dynamic(value)
        .deserialized()
        .map_err(|e| CodecError::decoding_failed(e.to_string()))
}

/// Decode one CBOR item of any encoding into `T`.
///
/// Key order and integer width are not checked. The input must hold
/// exactly one item.
///
/// # Errors
///
/// Returns an error if the bytes are not well-formed CBOR, do not match
/// the shape of `T`, or carry trailing bytes.
pub fn decode_payload<T: DeserializeOwned>(bytes: &[u8]) -> CodecResult<T> {
    let mut reader = bytes;
    let value: T = ciborium::de::from_reader(&mut reader)
        .map_err(|e| CodecError::decoding_failed(e.to_string()))?;
    if !reader.is_empty() {
        return Err(CodecError::TrailingBytes {
            remaining: reader.len(),
        });
    }
    Ok(value)
}

fn from_dynamic(value: CborValue) -> CodecResult<Value> {
    Ok(match value {
        CborValue::Null => Value::Null,
        CborValue::Bool(b) => Value::Bool(b),
        CborValue::Integer(n) => {
            let wide = i128::from(n);
            Value::Integer(i64::try_from(wide).map_err(|_| CodecError::IntegerOverflow)?)
        }
        CborValue::Float(f) => Value::Float(f),
        CborValue::Bytes(b) => Value::Bytes(b),
        CborValue::Text(s) => Value::Text(s),
        CborValue::Array(items) => Value::Array(
            items
                .into_iter()
                .map(from_dynamic)
                .collect::<CodecResult<_>>()?,
        ),
        CborValue::Map(pairs) => Value::Map(
            pairs
                .into_iter()
                .map(|(k, v)| Ok((from_dynamic(k)?, from_dynamic(v)?)))
                .collect::<CodecResult<_>>()?,
        ),
        CborValue::Tag(..) => return Err(CodecError::unsupported_type("tagged value")),
        _ => return Err(CodecError::unsupported_type("unknown dynamic value")),
    })
}

fn into_dynamic(value: Value) -> CborValue {
    match value {
        Value::Null => CborValue::Null,
        Value::Bool(b) => CborValue::Bool(b),
        Value::Integer(n) => CborValue::Integer(Integer::from(n)),
        Value::Float(f) => CborValue::Float(f),
        Value::Bytes(b) => CborValue::Bytes(b),
        Value::Text(s) => CborValue::Text(s),
        Value::Array(items) => CborValue::Array(items.into_iter().map(into_dynamic).collect()),
        Value::Map(pairs) => CborValue::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (into_dynamic(k), into_dynamic(v)))
                .collect(),
        ),
    }
}
