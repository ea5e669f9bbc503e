//! `bitpack`: a schema-driven, bit-level binary codec.
//!
//! Given a [`Schema`] and a [`Value`] conforming to it, [`encode`] produces
//! the most compact bitstream the schema allows: no field names, no padding,
//! no length header. The format is not self-describing; [`decode`] needs the
//! schema the value was encoded with.
//!
//! Encoding runs two passes. [`bit_size`] computes (and validates) the exact
//! bit length, a buffer of `ceil(bits / 8)` bytes is allocated, and the write
//! pass fills it. Both passes always agree on the bit count.
//!
//! ```
//! use bitpack::{decode, encode, Schema, Value};
//!
//! let schema = Schema::structure([
//!     ("x", Schema::uint(20)),
//!     ("y", Schema::uint(20)),
//!     ("dir", Schema::uint(2)),
//! ]);
//! let value = Value::Object(vec![
//!     ("x".into(), Value::Integer(5)),
//!     ("y".into(), Value::Integer(9)),
//!     ("dir".into(), Value::Integer(3)),
//! ]);
//! let bytes = encode(&schema, &value).unwrap();
//! assert_eq!(bytes.len(), 6);
//! assert_eq!(decode(&schema, &bytes).unwrap(), value);
//! ```

mod access;
mod decoder;
mod encoder;
mod error;
mod int;
mod size;
mod value;

pub mod schema;

pub use bitpack_buffers::{BufferError, MAX_SAFE_INTEGER, NATIVE_BITS, SAFE_INTEGER_BITS};
pub use decoder::BitPackDecoder;
pub use encoder::{BitPackEncoder, MAX_ENCODED_BITS};
pub use error::{ErrorKind, PackError};
pub use schema::{Schema, StructSchema, UnionSchema};
pub use size::bit_size;
pub use value::Value;

/// Encodes `value` under `schema` into a fresh, minimally sized buffer.
///
/// Encodings longer than [`MAX_ENCODED_BITS`] fail with [`PackError::Range`].
pub fn encode(schema: &Schema, value: &Value) -> Result<Vec<u8>, PackError> {
    BitPackEncoder::new().encode(schema, value)
}

/// Decodes a buffer produced by [`encode`] with the same schema.
///
/// Decoding with a different schema is not detected and yields meaningless
/// values, or [`PackError::Buffer`] if the buffer runs out.
pub fn decode(schema: &Schema, data: &[u8]) -> Result<Value, PackError> {
    BitPackDecoder::new(data).decode(schema)
}

/// A schema bundled with its encode/decode entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codec {
    schema: Schema,
}

impl Codec {
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn bit_size(&self, value: &Value) -> Result<u64, PackError> {
        bit_size(&self.schema, value)
    }

    pub fn encode(&self, value: &Value) -> Result<Vec<u8>, PackError> {
        encode(&self.schema, value)
    }

    pub fn decode(&self, data: &[u8]) -> Result<Value, PackError> {
        decode(&self.schema, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_roundtrip() {
        let codec = Codec::new(Schema::map(Schema::Str, Schema::list(Schema::int(6))));
        let value = Value::Map(vec![
            (Value::from("a"), Value::Array(vec![Value::Integer(-32), Value::Integer(31)])),
            (Value::from("bc"), Value::Array(vec![])),
        ]);
        let bytes = codec.encode(&value).unwrap();
        let bits = codec.bit_size(&value).unwrap();
        assert_eq!(bytes.len() as u64, bits.div_ceil(8));
        assert_eq!(codec.decode(&bytes).unwrap(), value);
    }

    #[test]
    fn error_kinds() {
        let err = encode(&Schema::uint(2), &Value::Integer(4)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        let err = encode(&Schema::Str, &Value::Integer(4)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
        let err = decode(&Schema::uint(9), &[0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Buffer);
        assert_eq!(err.to_string(), "unexpected end of buffer");
    }
}
