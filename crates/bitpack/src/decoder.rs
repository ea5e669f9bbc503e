//! Schema-driven bit decoder.

use bitpack_buffers::BitReader;

use crate::int::{read_signed, read_unsigned};
use crate::schema::UNION_VALUE_KEY;
use crate::{PackError, Schema, Value};

/// Decodes values from a packed buffer.
///
/// Reads are bounds-checked: a buffer too short for the schema yields
/// [`PackError::Buffer`] instead of reading out of bounds.
pub struct BitPackDecoder<'a> {
    pub reader: BitReader<'a>,
}

impl<'a> BitPackDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            reader: BitReader::new(data),
        }
    }

    /// Decodes one value and checks that at most the final byte's padding
    /// is left unread.
    pub fn decode(&mut self, schema: &Schema) -> Result<Value, PackError> {
        let value = self.read_value(schema)?;
        let remaining = self.reader.remaining();
        if remaining >= 8 {
            log::debug!("{remaining} trailing bits left after decoding {}", schema.kind());
        }
        log::trace!("decoded {} from {} bits", schema.kind(), self.reader.position());
        Ok(value)
    }

    /// Reads one value at the reader's cursor.
    pub fn read_value(&mut self, schema: &Schema) -> Result<Value, PackError> {
        match schema {
            Schema::UInt { size } => read_unsigned(&mut self.reader, *size),
            Schema::Int { size } => read_signed(&mut self.reader, *size),
            Schema::Nat => {
                let mut n = 0i64;
                while self.reader.bit()? {
                    n += 1;
                }
                Ok(Value::Integer(n))
            }
            Schema::Tuple(fields) => {
                let mut items = Vec::with_capacity(fields.len());
                for field in fields {
                    items.push(self.read_value(field)?);
                }
                Ok(Value::Array(items))
            }
            Schema::Vector { size, element } => {
                let mut items = Vec::with_capacity((*size).min(self.reader.remaining()));
                for _ in 0..*size {
                    items.push(self.read_value(element)?);
                }
                Ok(Value::Array(items))
            }
            Schema::Struct(s) => {
                let mut fields = Vec::with_capacity(s.fields().len());
                for (name, field) in s.fields() {
                    fields.push((name.clone(), self.read_value(field)?));
                }
                Ok(Value::Object(fields))
            }
            Schema::List(element) => {
                let mut items = Vec::new();
                while self.reader.bit()? {
                    items.push(self.read_value(element)?);
                }
                Ok(Value::Array(items))
            }
            Schema::Map { key, value } => {
                let mut pairs = Vec::new();
                while self.reader.bit()? {
                    let k = self.read_value(key)?;
                    let v = self.read_value(value)?;
                    pairs.push((k, v));
                }
                Ok(Value::Map(pairs))
            }
            Schema::Union(u) => {
                if u.variants().is_empty() {
                    return Err(PackError::config("union has no variants"));
                }
                let tag = self.reader.bits_u64(u.tag_bits())?;
                let (name, variant) = usize::try_from(tag)
                    .ok()
                    .and_then(|i| u.variants().get(i))
                    .ok_or_else(|| {
                        PackError::range(format!(
                            "union tag {tag} out of range for {} variants",
                            u.variants().len()
                        ))
                    })?;
                let discriminator = (u.discriminator().to_owned(), Value::Str(name.clone()));
                let payload = self.read_value(variant)?;
                Ok(match (variant, payload) {
                    (Schema::Struct(_), Value::Object(mut fields)) => {
                        fields.retain(|(k, _)| k != u.discriminator());
                        fields.insert(0, discriminator);
                        Value::Object(fields)
                    }
                    (_, payload) => Value::Object(vec![
                        discriminator,
                        (UNION_VALUE_KEY.to_owned(), payload),
                    ]),
                })
            }
            Schema::Str => {
                let mut bytes = Vec::new();
                while self.reader.bit()? {
                    bytes.push(self.reader.bits_u32(8)? as u8);
                }
                Ok(Value::Str(match String::from_utf8(bytes) {
                    Ok(s) => s,
                    Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitpack_buffers::BufferError;

    #[test]
    fn reads_unary_nat() {
        let mut decoder = BitPackDecoder::new(&[0b0001_1111]);
        assert_eq!(decoder.decode(&Schema::Nat), Ok(Value::Integer(5)));
    }

    #[test]
    fn reads_int8_minus_one() {
        let mut decoder = BitPackDecoder::new(&[0xff]);
        assert_eq!(decoder.decode(&Schema::int(8)), Ok(Value::Integer(-1)));
    }

    #[test]
    fn union_tag_out_of_range() {
        let schema = Schema::union([
            ("A", Schema::uint(0)),
            ("B", Schema::uint(0)),
            ("C", Schema::uint(0)),
        ]);
        let mut decoder = BitPackDecoder::new(&[0b11]);
        assert!(matches!(decoder.decode(&schema), Err(PackError::Range(_))));
    }

    #[test]
    fn union_wraps_non_struct_payload() {
        let schema = Schema::union([("A", Schema::uint(3)), ("B", Schema::Nat)]);
        // tag 1 (B), then nat 2: 1, 1, 1, 0
        let mut decoder = BitPackDecoder::new(&[0b0111]);
        assert_eq!(
            decoder.decode(&schema),
            Ok(Value::Object(vec![
                ("type".into(), Value::from("B")),
                ("value".into(), Value::Integer(2)),
            ]))
        );
    }

    #[test]
    fn union_merges_struct_discriminator() {
        let schema = Schema::union_with_discriminator(
            "op",
            [("only", Schema::structure([("n", Schema::uint(4))]))],
        );
        let mut decoder = BitPackDecoder::new(&[0x09]);
        assert_eq!(
            decoder.decode(&schema),
            Ok(Value::Object(vec![
                ("op".into(), Value::from("only")),
                ("n".into(), Value::Integer(9)),
            ]))
        );
    }

    #[test]
    fn short_buffer_is_an_error() {
        let schema = Schema::tuple([Schema::uint(20), Schema::uint(20)]);
        let mut decoder = BitPackDecoder::new(&[0xff, 0xff, 0xff]);
        assert_eq!(
            decoder.decode(&schema),
            Err(PackError::Buffer(BufferError::EndOfBuffer))
        );
        let mut decoder = BitPackDecoder::new(&[0xff]);
        assert!(decoder.decode(&Schema::list(Schema::Nat)).is_err());
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        // one tagged byte 0xff then terminator
        let mut decoder = BitPackDecoder::new(&[0xff, 0x01]);
        assert_eq!(decoder.decode(&Schema::Str), Ok(Value::from("\u{fffd}")));
    }

    #[test]
    fn consecutive_values_share_a_buffer() {
        let mut decoder = BitPackDecoder::new(&[0x5a]);
        assert_eq!(decoder.read_value(&Schema::uint(4)), Ok(Value::Integer(0xa)));
        assert_eq!(decoder.read_value(&Schema::uint(4)), Ok(Value::Integer(0x5)));
    }
}
