//! Schema-driven bit encoder.

use bitpack_buffers::BitWriter;

use crate::access;
use crate::int::{signed_bits, unsigned_bits};
use crate::size::bit_size;
use crate::{PackError, Schema, Value};

/// Largest encoding [`BitPackEncoder::encode`] will allocate: 4 GiB.
///
/// Sizes come from the value, so a single large [`Schema::Nat`] would
/// otherwise ask for up to 2^53 bits. Anything larger is a range error.
pub const MAX_ENCODED_BITS: u64 = 1 << 35;

/// Two-pass encoder: sizes the value, allocates the exact buffer, writes.
pub struct BitPackEncoder {
    pub writer: BitWriter,
}

impl Default for BitPackEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BitPackEncoder {
    pub fn new() -> Self {
        Self {
            writer: BitWriter::new(),
        }
    }

    /// Encodes `value` into a fresh buffer of `ceil(bits / 8)` bytes.
    ///
    /// Values needing more than [`MAX_ENCODED_BITS`] are rejected with
    /// [`PackError::Range`] before anything is allocated.
    pub fn encode(&mut self, schema: &Schema, value: &Value) -> Result<Vec<u8>, PackError> {
        let bits = bit_size(schema, value)?;
        let too_large = || PackError::range(format!("{bits} bits exceed the encoding limit"));
        if bits > MAX_ENCODED_BITS {
            return Err(too_large());
        }
        let bits = usize::try_from(bits).map_err(|_| too_large())?;
        self.writer = BitWriter::try_with_bits(bits).map_err(|_| too_large())?;
        self.write_value(schema, value)?;
        debug_assert_eq!(
            self.writer.position(),
            bits,
            "size pass and write pass disagree for {schema}"
        );
        log::trace!("encoded {} into {bits} bits", schema.kind());
        Ok(self.writer.flush())
    }

    /// Appends `value` at the writer's cursor without a size pass.
    ///
    /// Callers must have validated `value` with [`bit_size`]; the write pass
    /// only re-checks what it needs to produce bits.
    pub fn write_value(&mut self, schema: &Schema, value: &Value) -> Result<(), PackError> {
        match schema {
            Schema::UInt { size } => unsigned_bits(*size, value)?.write(&mut self.writer, *size),
            Schema::Int { size } => signed_bits(*size, value)?.write(&mut self.writer, *size),
            Schema::Nat => {
                let n = access::natural(value)?;
                self.writer.ensure_capacity(n as usize + 1);
                for _ in 0..n {
                    self.writer.bit(true);
                }
                self.writer.bit(false);
            }
            Schema::Tuple(fields) => {
                let items = access::sized_array(value, fields.len(), "tuple")?;
                for (field, item) in fields.iter().zip(items) {
                    self.write_value(field, item)?;
                }
            }
            Schema::Vector { size, element } => {
                for item in access::sized_array(value, *size, "vector")? {
                    self.write_value(element, item)?;
                }
            }
            Schema::Struct(s) => {
                access::object(value, "struct")?;
                for (name, field) in s.fields() {
                    self.write_value(field, access::field(value, name)?)?;
                }
            }
            Schema::List(element) => {
                for item in access::array(value, "list")? {
                    self.writer.bit(true);
                    self.write_value(element, item)?;
                }
                self.writer.bit(false);
            }
            Schema::Map { key, value: val } => {
                for (k, v) in access::entries(value)? {
                    self.writer.bit(true);
                    self.write_value(key, &k)?;
                    self.write_value(val, v)?;
                }
                self.writer.bit(false);
            }
            Schema::Union(u) => {
                let variant = access::variant(u, value)?;
                self.writer.bits_u64(u.tag_bits(), variant.tag as u64);
                self.write_value(variant.schema, variant.payload)?;
            }
            Schema::Str => {
                for byte in access::string(value)?.bytes() {
                    self.writer.bit(true);
                    self.writer.bits_u32(8, u32::from(byte));
                }
                self.writer.bit(false);
            }
        }
        Ok(())
    }
}
