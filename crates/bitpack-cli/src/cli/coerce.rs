//! Schema-guided fix-ups for values parsed from JSON.
//!
//! JSON cannot carry every shape the codec accepts: integers wider than 64
//! bits arrive as decimal strings, and maps with non-string keys arrive as
//! arrays of `[key, value]` pairs. These are exactly the forms
//! `bitpack-decode` prints, so coercion makes its output re-encodable.

use bitpack::schema::UNION_VALUE_KEY;
use bitpack::{Schema, Value};
use num_bigint::BigInt;

/// Rewrites `value` into the shape `schema` expects where JSON lost it.
///
/// Anything that does not line up with the schema is returned unchanged, so
/// the encoder still reports the mismatch.
pub fn coerce(schema: &Schema, value: Value) -> Value {
    match (schema, value) {
        (Schema::UInt { .. } | Schema::Int { .. }, Value::Str(s)) => match s.parse::<BigInt>() {
            Ok(n) => Value::BigInt(n),
            Err(_) => Value::Str(s),
        },
        (Schema::Tuple(fields), Value::Array(items)) if fields.len() == items.len() => {
            Value::Array(fields.iter().zip(items).map(|(f, v)| coerce(f, v)).collect())
        }
        (Schema::Vector { element, .. } | Schema::List(element), Value::Array(items)) => {
            Value::Array(items.into_iter().map(|v| coerce(element, v)).collect())
        }
        (Schema::Map { key, value: val }, Value::Object(fields)) => Value::Map(
            fields
                .into_iter()
                .map(|(k, v)| (coerce(key, Value::Str(k)), coerce(val, v)))
                .collect(),
        ),
        (Schema::Map { key, value: val }, Value::Array(items)) if items.iter().all(is_pair) => {
            Value::Map(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::Array(mut kv) => {
                            let v = kv.pop()?;
                            let k = kv.pop()?;
                            Some((coerce(key, k), coerce(val, v)))
                        }
                        _ => None,
                    })
                    .collect(),
            )
        }
        (Schema::Struct(s), Value::Object(fields)) => Value::Object(
            fields
                .into_iter()
                .map(|(name, v)| {
                    let v = match s.fields().iter().find(|(n, _)| *n == name) {
                        Some((_, field)) => coerce(field, v),
                        None => v,
                    };
                    (name, v)
                })
                .collect(),
        ),
        (Schema::Union(u), Value::Object(fields)) => {
            let variant = fields
                .iter()
                .find(|(k, _)| k == u.discriminator())
                .and_then(|(_, v)| v.as_str())
                .and_then(|name| u.variant(name))
                .map(|(_, schema)| schema);
            match variant {
                Some(s) if matches!(s, Schema::Struct(_)) => coerce(s, Value::Object(fields)),
                Some(s) => Value::Object(
                    fields
                        .into_iter()
                        .map(|(k, v)| {
                            let v = if k == UNION_VALUE_KEY { coerce(s, v) } else { v };
                            (k, v)
                        })
                        .collect(),
                ),
                None => Value::Object(fields),
            }
        }
        (_, value) => value,
    }
}

fn is_pair(item: &Value) -> bool {
    matches!(item, Value::Array(kv) if kv.len() == 2)
}
