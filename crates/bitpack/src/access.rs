//! Value shape checks shared by the size and write passes.

use std::borrow::Cow;

use bitpack_buffers::MAX_SAFE_INTEGER;

use crate::schema::{Schema, UnionSchema, UNION_VALUE_KEY};
use crate::{PackError, Value};

pub(crate) fn array<'a>(value: &'a Value, node: &str) -> Result<&'a [Value], PackError> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(PackError::type_(format!(
            "{node} expects an array, got {}",
            other.type_name()
        ))),
    }
}

pub(crate) fn sized_array<'a>(
    value: &'a Value,
    len: usize,
    node: &str,
) -> Result<&'a [Value], PackError> {
    let items = array(value, node)?;
    if items.len() != len {
        return Err(PackError::range(format!(
            "{node} expects {len} elements, got {}",
            items.len()
        )));
    }
    Ok(items)
}

pub(crate) fn string(value: &Value) -> Result<&str, PackError> {
    value
        .as_str()
        .ok_or_else(|| PackError::type_(format!("string expects a string, got {}", value.type_name())))
}

/// Unary natural number, `0..=MAX_SAFE_INTEGER`.
pub(crate) fn natural(value: &Value) -> Result<u64, PackError> {
    match value {
        Value::Integer(_) | Value::BigInt(_) => match value.as_i64() {
            Some(n) if (0..=MAX_SAFE_INTEGER).contains(&n) => Ok(n as u64),
            _ => Err(PackError::range(format!("{value:?} is not a natural number"))),
        },
        other => Err(PackError::type_(format!(
            "nat expects an integer, got {}",
            other.type_name()
        ))),
    }
}

pub(crate) fn object<'a>(value: &'a Value, node: &str) -> Result<&'a Value, PackError> {
    match value {
        Value::Object(_) => Ok(value),
        other => Err(PackError::type_(format!(
            "{node} expects an object, got {}",
            other.type_name()
        ))),
    }
}

pub(crate) fn field<'a>(value: &'a Value, name: &str) -> Result<&'a Value, PackError> {
    object(value, "struct")?
        .get(name)
        .ok_or_else(|| PackError::type_(format!("missing struct field \"{name}\"")))
}

/// Key/value pairs of a map or keyed object, in the container's own order.
pub(crate) fn entries(value: &Value) -> Result<Vec<(Cow<'_, Value>, &Value)>, PackError> {
    match value {
        Value::Map(pairs) => Ok(pairs.iter().map(|(k, v)| (Cow::Borrowed(k), v)).collect()),
        Value::Object(fields) => Ok(fields
            .iter()
            .map(|(k, v)| (Cow::Owned(Value::Str(k.clone())), v))
            .collect()),
        other => Err(PackError::type_(format!(
            "map expects a map or object, got {}",
            other.type_name()
        ))),
    }
}

/// The union variant a value selects.
pub(crate) struct Variant<'a> {
    pub tag: usize,
    pub schema: &'a Schema,
    pub payload: &'a Value,
}

pub(crate) fn variant<'a>(union: &'a UnionSchema, value: &'a Value) -> Result<Variant<'a>, PackError> {
    if union.variants().is_empty() {
        return Err(PackError::config("union has no variants"));
    }
    object(value, "union")?;
    let key = union.discriminator();
    let name = value
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| PackError::type_(format!("missing or invalid union discriminator \"{key}\"")))?;
    let (tag, schema) = union
        .variant(name)
        .ok_or_else(|| PackError::range(format!("unknown union variant \"{name}\"")))?;
    let payload = match schema {
        Schema::Struct(_) => value,
        _ => value.get(UNION_VALUE_KEY).ok_or_else(|| {
            PackError::type_(format!("union variant \"{name}\" is missing \"{UNION_VALUE_KEY}\""))
        })?,
    };
    Ok(Variant {
        tag,
        schema,
        payload,
    })
}
