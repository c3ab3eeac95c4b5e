//! # VecMeta Codec
//!
//! Canonical CBOR encoding for catalog records.
//!
//! Every record the catalog persists goes through this crate, so equal
//! records always produce equal bytes.
//!
//! ## Canonical CBOR Rules
//!
//! - Maps are sorted by encoded key (length first, then bytewise)
//! - Integers and lengths use the shortest encoding
//! - Floats are always binary64 and never NaN
//! - Strings must be UTF-8
//! - No indefinite-length items and no tags
//!
//! ## Usage
//!
//! ```
//! use vecmeta_codec::{decode_record, encode_record, from_cbor, to_canonical_cbor, Value};
//!
//! let value = Value::Integer(42);
//! let bytes = to_canonical_cbor(&value).unwrap();
//! assert_eq!(from_cbor(&bytes).unwrap(), value);
//!
//! let names = vec!["default".to_string(), "default_1".to_string()];
//! let bytes = encode_record(&names).unwrap();
//! let back: Vec<String> = decode_record(&bytes).unwrap();
//! assert_eq!(back, names);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod encoder;
mod error;
mod record;
mod value;

pub use decoder::{from_cbor, CanonicalDecoder};
pub use encoder::{to_canonical_cbor, CanonicalEncoder};
pub use error::{CodecError, CodecResult};
pub use record::{decode_payload, decode_record, encode_record};
pub use value::Value;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Integer),
            any::<f64>()
                .prop_filter("NaN has no encoding", |f| !f.is_nan())
                .prop_map(Value::Float),
            ".{0,12}".prop_map(Value::Text),
            prop::collection::vec(any::<u8>(), 0..16).prop_map(Value::Bytes),
        ];
        leaf.prop_recursive(3, 32, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,6}", inner, 0..6).prop_map(|m| {
                    Value::Map(m.into_iter().map(|(k, v)| (Value::Text(k), v)).collect())
                }),
            ]
        })
    }

    proptest! {
        #[test]
        fn decoded_values_reencode_identically(value in arb_value()) {
            let bytes = to_canonical_cbor(&value).unwrap();
            let decoded = from_cbor(&bytes).unwrap();
            prop_assert_eq!(to_canonical_cbor(&decoded).unwrap(), bytes);
        }

        #[test]
        fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
            let _ = from_cbor(&bytes);
        }
    }
}
