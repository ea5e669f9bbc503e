//! Size computation pass.

use crate::access;
use crate::int::{signed_bits, unsigned_bits};
use crate::{PackError, Schema, Value};

/// Returns the exact number of bits `value` occupies under `schema`.
///
/// This is the validating pass: every range and shape error the encoder can
/// hit is raised here, before any buffer is allocated.
pub fn bit_size(schema: &Schema, value: &Value) -> Result<u64, PackError> {
    match schema {
        Schema::UInt { size } => {
            unsigned_bits(*size, value)?;
            Ok(u64::from(*size))
        }
        Schema::Int { size } => {
            signed_bits(*size, value)?;
            Ok(u64::from(*size))
        }
        Schema::Nat => Ok(access::natural(value)? + 1),
        Schema::Tuple(fields) => {
            let items = access::sized_array(value, fields.len(), "tuple")?;
            let mut bits = 0;
            for (field, item) in fields.iter().zip(items) {
                bits += bit_size(field, item)?;
            }
            Ok(bits)
        }
        Schema::Vector { size, element } => {
            let items = access::sized_array(value, *size, "vector")?;
            let mut bits = 0;
            for item in items {
                bits += bit_size(element, item)?;
            }
            Ok(bits)
        }
        Schema::Struct(s) => {
            access::object(value, "struct")?;
            let mut bits = 0;
            for (name, field) in s.fields() {
                bits += bit_size(field, access::field(value, name)?)?;
            }
            Ok(bits)
        }
        Schema::List(element) => {
            let mut bits = 1;
            for item in access::array(value, "list")? {
                bits += 1 + bit_size(element, item)?;
            }
            Ok(bits)
        }
        Schema::Map { key, value: val } => {
            let mut bits = 1;
            for (k, v) in access::entries(value)? {
                bits += 1 + bit_size(key, &k)? + bit_size(val, v)?;
            }
            Ok(bits)
        }
        Schema::Union(u) => {
            let variant = access::variant(u, value)?;
            Ok(u64::from(u.tag_bits()) + bit_size(variant.schema, variant.payload)?)
        }
        Schema::Str => Ok(1 + 9 * access::string(value)?.len() as u64),
    }
}
