//! The dynamic [`Value`] tree that schemas describe.

use num_bigint::BigInt;
use num_traits::ToPrimitive;

use bitpack_buffers::MAX_SAFE_INTEGER;

use crate::PackError;

/// A value to encode against a [`Schema`](crate::Schema), or the result of
/// decoding one.
///
/// Integers of fields up to 53 bits wide decode as [`Value::Integer`]; wider
/// fields decode as [`Value::BigInt`]. Encoding accepts either variant as long
/// as the number fits the field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Safe-range integer, `|n| <= 2^53 - 1`.
    Integer(i64),
    /// Arbitrary-precision integer.
    BigInt(BigInt),
    /// UTF-8 string.
    Str(String),
    /// Tuple, vector or list elements.
    Array(Vec<Value>),
    /// Keyed object (ordered key-value pairs).
    Object(Vec<(String, Value)>),
    /// Associative container with arbitrary keys.
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Builds a string from UTF-16 code units; lone surrogates become U+FFFD.
    pub fn from_utf16(units: &[u16]) -> Value {
        Value::Str(String::from_utf16_lossy(units))
    }

    /// Represents a byte buffer as a list of 8-bit integers.
    pub fn bytes(data: &[u8]) -> Value {
        Value::Array(data.iter().map(|b| Value::Integer(i64::from(*b))).collect())
    }

    /// Converts a list of 8-bit integers back into a byte buffer.
    pub fn as_bytes(&self) -> Option<Vec<u8>> {
        match self {
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_i64().and_then(|n| u8::try_from(n).ok()))
                .collect(),
            _ => None,
        }
    }

    /// Returns a keyed object's field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(fields) => fields.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer value as `i64`, from either integer variant.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::BigInt(n) => n.to_i64(),
            _ => None,
        }
    }

    /// Integer value as an arbitrary-precision integer.
    pub fn as_bigint(&self) -> Option<BigInt> {
        match self {
            Value::Integer(n) => Some(BigInt::from(*n)),
            Value::BigInt(n) => Some(n.clone()),
            _ => None,
        }
    }

    /// Short lowercase name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) | Value::BigInt(_) => "integer",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Map(_) => "map",
        }
    }

    /// Membership equality.
    ///
    /// Integers compare numerically across both integer variants. Objects and
    /// maps compare by their key/value pairs regardless of order or container
    /// kind: an object equals a map with the same string keys. Pairs are
    /// matched one to one, so repeated keys must repeat on both sides.
    pub fn equivalent(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equivalent(y))
            }
            (a, b) if a.is_integer() && b.is_integer() => a.as_bigint() == b.as_bigint(),
            (a, b) => match (a.entries(), b.entries()) {
                (Some(xs), Some(ys)) if xs.len() == ys.len() => {
                    // Each pair on one side claims a distinct pair on the other.
                    let mut used = vec![false; ys.len()];
                    xs.iter().all(|(k, v)| {
                        let hit = ys.iter().enumerate().position(|(i, (k2, v2))| {
                            !used[i] && k.equivalent(k2) && v.equivalent(v2)
                        });
                        match hit {
                            Some(i) => {
                                used[i] = true;
                                true
                            }
                            None => false,
                        }
                    })
                }
                _ => false,
            },
        }
    }

    fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::BigInt(_))
    }

    fn entries(&self) -> Option<Vec<(Value, &Value)>> {
        match self {
            Value::Object(fields) => Some(
                fields
                    .iter()
                    .map(|(k, v)| (Value::Str(k.clone()), v))
                    .collect(),
            ),
            Value::Map(pairs) => Some(pairs.iter().map(|(k, v)| (k.clone(), v)).collect()),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<BigInt> for Value {
    fn from(n: BigInt) -> Self {
        Value::BigInt(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl TryFrom<&serde_json::Value> for Value {
    type Error = PackError;

    fn try_from(json: &serde_json::Value) -> Result<Self, Self::Error> {
        match json {
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    if (-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&i) {
                        Ok(Value::Integer(i))
                    } else {
                        Ok(Value::BigInt(BigInt::from(i)))
                    }
                } else if let Some(u) = n.as_u64() {
                    Ok(Value::BigInt(BigInt::from(u)))
                } else {
                    Err(PackError::type_(format!("{n} is not an integer")))
                }
            }
            serde_json::Value::String(s) => Ok(Value::Str(s.clone())),
            serde_json::Value::Array(items) => Ok(Value::Array(
                items.iter().map(Value::try_from).collect::<Result<_, _>>()?,
            )),
            serde_json::Value::Object(obj) => Ok(Value::Object(
                obj.iter()
                    .map(|(k, v)| Ok((k.clone(), Value::try_from(v)?)))
                    .collect::<Result<_, PackError>>()?,
            )),
            serde_json::Value::Null => Err(PackError::type_("null has no packed representation")),
            serde_json::Value::Bool(_) => {
                Err(PackError::type_("booleans have no packed representation"))
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    /// Maps with all-string keys become JSON objects; other maps become
    /// arrays of `[key, value]` pairs. Big integers that do not fit 64 bits
    /// become decimal strings.
    fn from(v: Value) -> Self {
        match v {
            Value::Integer(i) => serde_json::json!(i),
            Value::BigInt(n) => {
                if let Some(i) = n.to_i64() {
                    serde_json::json!(i)
                } else if let Some(u) = n.to_u64() {
                    serde_json::json!(u)
                } else {
                    serde_json::Value::String(n.to_string())
                }
            }
            Value::Str(s) => serde_json::Value::String(s),
            Value::Array(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Object(fields) => serde_json::Value::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
            Value::Map(pairs) => {
                if pairs.iter().all(|(k, _)| matches!(k, Value::Str(_))) {
                    serde_json::Value::Object(
                        pairs
                            .into_iter()
                            .filter_map(|(k, v)| match k {
                                Value::Str(k) => Some((k, serde_json::Value::from(v))),
                                _ => None,
                            })
                            .collect(),
                    )
                } else {
                    serde_json::Value::Array(
                        pairs
                            .into_iter()
                            .map(|(k, v)| {
                                serde_json::Value::Array(vec![
                                    serde_json::Value::from(k),
                                    serde_json::Value::from(v),
                                ])
                            })
                            .collect(),
                    )
                }
            }
        }
    }
}
