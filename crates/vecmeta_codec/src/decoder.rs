//! Canonical CBOR decoder.

use crate::encoder::canonical_order;
use crate::error::{CodecError, CodecResult};
use crate::value::Value;
use std::cmp::Ordering;

/// Maximum element count for arrays and maps.
const MAX_CONTAINER_ELEMENTS: u64 = 1024 * 1024;

/// Maximum byte/text string length.
const MAX_BYTES_LENGTH: u64 = 64 * 1024 * 1024;

/// Maximum nesting depth of arrays and maps.
const MAX_DEPTH: usize = 64;

/// Decode exactly one value from CBOR bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not canonical CBOR, contain forbidden
/// constructs (NaN, short floats, tags, indefinite lengths), or carry
/// trailing data after the value.
pub fn from_cbor(bytes: &[u8]) -> CodecResult<Value> {
    let mut decoder = CanonicalDecoder::new(bytes);
    let value = decoder.decode()?;
    if !decoder.is_empty() {
        return Err(CodecError::TrailingBytes {
            remaining: decoder.remaining(),
        });
    }
    Ok(value)
}

/// A canonical CBOR decoder.
///
/// Rejects every encoding the [`crate::CanonicalEncoder`] would not produce,
/// so a decoded value re-encodes to the same bytes.
pub struct CanonicalDecoder<'a> {
    data: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> CanonicalDecoder<'a> {
    /// Create a new decoder for the given bytes.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            depth: 0,
        }
    }

    /// Check if all bytes have been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Number of bytes not consumed yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Decode the next value.
    ///
    /// # Errors
    ///
    /// See [`from_cbor`].
    pub fn decode(&mut self) -> CodecResult<Value> {
        let initial = self.read_byte()?;
        let major_type = initial >> 5;
        let info = initial & 0x1f;

        match major_type {
            0 => {
                let n = self.read_argument(info)?;
                i64::try_from(n)
                    .map(Value::Integer)
                    .map_err(|_| CodecError::IntegerOverflow)
            }
            1 => {
                let n = self.read_argument(info)?;
                let n = i64::try_from(n).map_err(|_| CodecError::IntegerOverflow)?;
                Ok(Value::Integer(-1 - n))
            }
            2 => {
                let len = self.read_length(info, MAX_BYTES_LENGTH)?;
                Ok(Value::Bytes(self.read_bytes(len)?.to_vec()))
            }
            3 => {
                let len = self.read_length(info, MAX_BYTES_LENGTH)?;
                let bytes = self.read_bytes(len)?;
                let text = std::str::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)?;
                Ok(Value::Text(text.to_string()))
            }
            4 => {
                let len = self.read_length(info, MAX_CONTAINER_ELEMENTS)?;
                self.enter()?;
                let mut items = Vec::with_capacity(len.min(1024));
                for _ in 0..len {
                    items.push(self.decode()?);
                }
                self.depth -= 1;
                Ok(Value::Array(items))
            }
            5 => {
                let len = self.read_length(info, MAX_CONTAINER_ELEMENTS)?;
                self.enter()?;
                let map = self.decode_map_entries(len)?;
                self.depth -= 1;
                Ok(map)
            }
            6 => Err(CodecError::unsupported_type("tagged value")),
            _ => self.decode_simple(info),
        }
    }

    fn enter(&mut self) -> CodecResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(CodecError::invalid_structure("nesting too deep"));
        }
        Ok(())
    }

    fn read_byte(&mut self) -> CodecResult<u8> {
        let byte = *self.data.get(self.pos).ok_or(CodecError::UnexpectedEof)?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_bytes(&mut self, len: usize) -> CodecResult<&'a [u8]> {
        let end = self.pos.checked_add(len).ok_or(CodecError::UnexpectedEof)?;
        let bytes = self.data.get(self.pos..end).ok_or(CodecError::UnexpectedEof)?;
        self.pos = end;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> CodecResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    fn read_argument(&mut self, info: u8) -> CodecResult<u64> {
        let (value, min) = match info {
            0..=23 => return Ok(u64::from(info)),
            24 => (u64::from(self.read_byte()?), 24),
            25 => (u64::from(u16::from_be_bytes(self.read_array()?)), 0x100),
            26 => (u64::from(u32::from_be_bytes(self.read_array()?)), 0x1_0000),
            27 => (u64::from_be_bytes(self.read_array()?), 0x1_0000_0000),
            31 => return Err(CodecError::IndefiniteLengthForbidden),
            _ => return Err(CodecError::invalid_structure("reserved additional info")),
        };
        if value < min {
            return Err(CodecError::invalid_structure(
                "non-canonical: value could be encoded in fewer bytes",
            ));
        }
        Ok(value)
    }

    fn read_length(&mut self, info: u8, limit: u64) -> CodecResult<usize> {
        let len = self.read_argument(info)?;
        if len > limit {
            return Err(CodecError::SizeLimitExceeded {
                claimed: len,
                max_allowed: limit,
            });
        }
        usize::try_from(len).map_err(|_| CodecError::IntegerOverflow)
    }

    fn decode_map_entries(&mut self, len: usize) -> CodecResult<Value> {
        let mut pairs = Vec::with_capacity(len.min(1024));
        let mut prev_key: Option<&'a [u8]> = None;

        for _ in 0..len {
            let key_start = self.pos;
            let key = self.decode()?;
            let key_bytes = &self.data[key_start..self.pos];

            if let Some(prev) = prev_key {
                if canonical_order(prev, key_bytes) != Ordering::Less {
                    return Err(CodecError::invalid_structure(
                        "non-canonical: map keys not in sorted order",
                    ));
                }
            }
            prev_key = Some(key_bytes);

            let value = self.decode()?;
            pairs.push((key, value));
        }
        Ok(Value::Map(pairs))
    }

    fn decode_simple(&mut self, info: u8) -> CodecResult<Value> {
        match info {
            20 => Ok(Value::Bool(false)),
            21 => Ok(Value::Bool(true)),
            22 => Ok(Value::Null),
            25 | 26 => Err(CodecError::invalid_structure(
                "non-canonical: floats must use binary64",
            )),
            27 => {
                let f = f64::from_be_bytes(self.read_array()?);
                if f.is_nan() {
                    return Err(CodecError::NaNForbidden);
                }
                Ok(Value::Float(f))
            }
            31 => Err(CodecError::invalid_structure("break without indefinite item")),
            _ => Err(CodecError::unsupported_type(format!("simple value {info}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::to_canonical_cbor;

    #[test]
    fn decode_scalars() {
        assert_eq!(from_cbor(&[0xf6]).unwrap(), Value::Null);
        assert_eq!(from_cbor(&[0xf5]).unwrap(), Value::Bool(true));
        assert_eq!(from_cbor(&[0x17]).unwrap(), Value::Integer(23));
        assert_eq!(from_cbor(&[0x19, 0x01, 0x00]).unwrap(), Value::Integer(256));
        assert_eq!(from_cbor(&[0x38, 99]).unwrap(), Value::Integer(-100));
    }

    #[test]
    fn decode_float() {
        assert_eq!(
            from_cbor(&[0xfb, 0x3f, 0xf8, 0, 0, 0, 0, 0, 0]).unwrap(),
            Value::Float(1.5)
        );
    }

    #[test]
    fn reject_short_floats() {
        assert!(matches!(
            from_cbor(&[0xf9, 0x3e, 0x00]),
            Err(CodecError::InvalidStructure { .. })
        ));
        assert!(matches!(
            from_cbor(&[0xfa, 0x3f, 0xc0, 0x00, 0x00]),
            Err(CodecError::InvalidStructure { .. })
        ));
    }

    #[test]
    fn reject_nan() {
        assert_eq!(
            from_cbor(&[0xfb, 0x7f, 0xf8, 0, 0, 0, 0, 0, 0]),
            Err(CodecError::NaNForbidden)
        );
    }

    #[test]
    fn reject_non_shortest_encoding() {
        assert!(matches!(
            from_cbor(&[0x18, 23]),
            Err(CodecError::InvalidStructure { .. })
        ));
        assert!(matches!(
            from_cbor(&[0x19, 0x00, 0xff]),
            Err(CodecError::InvalidStructure { .. })
        ));
    }

    #[test]
    fn reject_unsorted_map_keys() {
        assert!(matches!(
            from_cbor(&[0xa2, 0x61, b'b', 0x01, 0x61, b'a', 0x02]),
            Err(CodecError::InvalidStructure { .. })
        ));
    }

    #[test]
    fn reject_duplicate_map_keys() {
        assert!(matches!(
            from_cbor(&[0xa2, 0x61, b'a', 0x01, 0x61, b'a', 0x02]),
            Err(CodecError::InvalidStructure { .. })
        ));
    }

    #[test]
    fn reject_indefinite_length() {
        assert_eq!(
            from_cbor(&[0x9f, 0x01, 0xff]),
            Err(CodecError::IndefiniteLengthForbidden)
        );
    }

    #[test]
    fn reject_tags() {
        assert!(matches!(
            from_cbor(&[0xc1, 0x01]),
            Err(CodecError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn reject_trailing_bytes() {
        assert_eq!(
            from_cbor(&[0x01, 0x02]),
            Err(CodecError::TrailingBytes { remaining: 1 })
        );
    }

    #[test]
    fn reject_unsigned_overflow() {
        let mut bytes = vec![0x1b];
        bytes.extend_from_slice(&u64::MAX.to_be_bytes());
        assert_eq!(from_cbor(&bytes), Err(CodecError::IntegerOverflow));
    }

    #[test]
    fn unexpected_eof() {
        assert_eq!(from_cbor(&[]), Err(CodecError::UnexpectedEof));
        assert_eq!(from_cbor(&[0x19, 0x01]), Err(CodecError::UnexpectedEof));
        assert_eq!(from_cbor(&[0x63, b'a']), Err(CodecError::UnexpectedEof));
    }

    #[test]
    fn invalid_utf8_rejected() {
        assert_eq!(from_cbor(&[0x62, 0xff, 0xfe]), Err(CodecError::InvalidUtf8));
    }

    #[test]
    fn reencode_is_identical() {
        let value = Value::Map(vec![
            (Value::from("fields"), Value::Array(vec![Value::Integer(100)])),
            (Value::from("id"), Value::Integer(i64::MIN)),
            (Value::from("ratio"), Value::Float(-0.25)),
        ]);
        let bytes = to_canonical_cbor(&value).unwrap();
        let decoded = from_cbor(&bytes).unwrap();
        assert_eq!(to_canonical_cbor(&decoded).unwrap(), bytes);
    }
}
