//! Fixed-width integer fields and their three arithmetic regimes.
//!
//! | width     | writer/reader arithmetic | decoded value      |
//! |-----------|--------------------------|--------------------|
//! | 0..=32    | `u32`                    | [`Value::Integer`] |
//! | 33..=53   | `u64` (safe range)       | [`Value::Integer`] |
//! | 54..      | `BigUint`                | [`Value::BigInt`]  |

use bitpack_buffers::{BitReader, BitWriter, NATIVE_BITS, SAFE_INTEGER_BITS};
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::One;

use crate::{PackError, Value};

/// A range-checked field value in the wire representation of its regime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FieldBits {
    Native(u32),
    Safe(u64),
    Wide(BigUint),
}

impl FieldBits {
    pub(crate) fn write(&self, writer: &mut BitWriter, size: u32) {
        match self {
            FieldBits::Native(v) => writer.bits_u32(size, *v),
            FieldBits::Safe(v) => writer.bits_u64(size, *v),
            FieldBits::Wide(v) => writer.bits_big(size, v),
        }
    }
}

fn expect_integer(value: &Value) -> Result<(), PackError> {
    match value {
        Value::Integer(_) | Value::BigInt(_) => Ok(()),
        other => Err(PackError::type_(format!(
            "expected an integer, got {}",
            other.type_name()
        ))),
    }
}

fn narrow(size: u32, n: u64) -> FieldBits {
    if size <= NATIVE_BITS {
        FieldBits::Native(n as u32)
    } else {
        FieldBits::Safe(n)
    }
}

/// Checks `value` against `[0, 2^size)` and converts it for writing.
pub(crate) fn unsigned_bits(size: u32, value: &Value) -> Result<FieldBits, PackError> {
    expect_integer(value)?;
    let out_of_range = || PackError::range(format!("{value:?} does not fit UInt({size})"));
    if size <= SAFE_INTEGER_BITS {
        let n = value.as_i64().ok_or_else(out_of_range)?;
        if n < 0 || n >= 1i64 << size {
            return Err(out_of_range());
        }
        return Ok(narrow(size, n as u64));
    }
    let n = value.as_bigint().ok_or_else(out_of_range)?;
    if n.sign() == Sign::Minus || n >= BigInt::one() << size {
        return Err(out_of_range());
    }
    n.to_biguint().map(FieldBits::Wide).ok_or_else(out_of_range)
}

/// Checks `value` against `[-2^(size-1), 2^(size-1))` and converts it to its
/// two's-complement bit pattern.
pub(crate) fn signed_bits(size: u32, value: &Value) -> Result<FieldBits, PackError> {
    expect_integer(value)?;
    let out_of_range = || PackError::range(format!("{value:?} does not fit Int({size})"));
    if size == 0 {
        return match value.as_i64() {
            Some(0) => Ok(FieldBits::Native(0)),
            _ => Err(out_of_range()),
        };
    }
    if size <= SAFE_INTEGER_BITS {
        let n = value.as_i64().ok_or_else(out_of_range)?;
        let half = 1i64 << (size - 1);
        if n < -half || n >= half {
            return Err(out_of_range());
        }
        let pattern = if n < 0 { n + (1i64 << size) } else { n };
        return Ok(narrow(size, pattern as u64));
    }
    let n = value.as_bigint().ok_or_else(out_of_range)?;
    let half = BigInt::one() << (size - 1);
    if n < -half.clone() || n >= half {
        return Err(out_of_range());
    }
    let pattern = if n.sign() == Sign::Minus {
        n + (BigInt::one() << size)
    } else {
        n
    };
    pattern.to_biguint().map(FieldBits::Wide).ok_or_else(out_of_range)
}

/// Reads `size` bits as an unsigned field value.
pub(crate) fn read_unsigned(reader: &mut BitReader<'_>, size: u32) -> Result<Value, PackError> {
    if size <= NATIVE_BITS {
        Ok(Value::Integer(i64::from(reader.bits_u32(size)?)))
    } else if size <= SAFE_INTEGER_BITS {
        Ok(Value::Integer(reader.bits_u64(size)? as i64))
    } else {
        Ok(Value::BigInt(BigInt::from(reader.bits_big(size)?)))
    }
}

/// Reads `size` bits as a two's-complement field value.
pub(crate) fn read_signed(reader: &mut BitReader<'_>, size: u32) -> Result<Value, PackError> {
    if size == 0 {
        return Ok(Value::Integer(0));
    }
    if size <= SAFE_INTEGER_BITS {
        let raw = if size <= NATIVE_BITS {
            u64::from(reader.bits_u32(size)?)
        } else {
            reader.bits_u64(size)?
        };
        let pattern = raw as i64;
        let negative = (pattern >> (size - 1)) & 1 == 1;
        return Ok(Value::Integer(if negative {
            pattern - (1i64 << size)
        } else {
            pattern
        }));
    }
    let pattern = reader.bits_big(size)?;
    let negative = pattern.bit(u64::from(size - 1));
    let mut n = BigInt::from(pattern);
    if negative {
        n -= BigInt::one() << size;
    }
    Ok(Value::BigInt(n))
}
