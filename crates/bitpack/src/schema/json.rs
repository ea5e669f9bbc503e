//! JSON schema descriptions.
//!
//! A node is a JSON object whose `"kind"` selects the node type:
//!
//! ```json
//! {"kind": "struct", "fields": {
//!     "x": {"kind": "uint", "size": 20},
//!     "tags": {"kind": "list", "element": {"kind": "string"}}
//! }}
//! ```
//!
//! Struct field order is the order of keys in the description.

use serde_json::{json, Map, Value as Json};

use super::{Schema, DEFAULT_DISCRIMINATOR};
use crate::PackError;

impl Schema {
    /// Parses a JSON schema description.
    pub fn from_json(json: &Json) -> Result<Schema, PackError> {
        let obj = json
            .as_object()
            .ok_or_else(|| PackError::config("schema node must be an object"))?;
        let kind = obj
            .get("kind")
            .and_then(Json::as_str)
            .ok_or_else(|| PackError::config("schema node is missing \"kind\""))?;
        let schema = match kind {
            "uint" => Schema::uint(width(obj, "size")?),
            "int" => Schema::int(width(obj, "size")?),
            "nat" => Schema::Nat,
            "tuple" => {
                let fields = member(obj, "fields")?
                    .as_array()
                    .ok_or_else(|| PackError::config("tuple \"fields\" must be an array"))?;
                Schema::Tuple(
                    fields
                        .iter()
                        .map(Schema::from_json)
                        .collect::<Result<Vec<_>, PackError>>()?,
                )
            }
            "vector" => {
                let size = member(obj, "size")?
                    .as_u64()
                    .and_then(|n| usize::try_from(n).ok())
                    .ok_or_else(|| PackError::config("vector \"size\" must be a non-negative integer"))?;
                Schema::vector(size, Schema::from_json(member(obj, "element")?)?)
            }
            "list" => Schema::list(Schema::from_json(member(obj, "element")?)?),
            "map" => Schema::map(
                Schema::from_json(member(obj, "key")?)?,
                Schema::from_json(member(obj, "value")?)?,
            ),
            "struct" => Schema::structure(named_nodes(obj, "fields")?),
            "union" => {
                let discriminator = match obj.get("discriminator") {
                    None => DEFAULT_DISCRIMINATOR,
                    Some(d) => d
                        .as_str()
                        .ok_or_else(|| PackError::config("union \"discriminator\" must be a string"))?,
                };
                Schema::union_with_discriminator(discriminator, named_nodes(obj, "variants")?)
            }
            "string" => Schema::Str,
            other => return Err(PackError::config(format!("unknown schema kind \"{other}\""))),
        };
        log::debug!("parsed schema node {schema}");
        Ok(schema)
    }

    /// Renders the schema as a JSON description accepted by [`Schema::from_json`].
    pub fn to_json(&self) -> Json {
        match self {
            Schema::UInt { size } | Schema::Int { size } => json!({"kind": self.kind(), "size": size}),
            Schema::Nat | Schema::Str => json!({"kind": self.kind()}),
            Schema::Tuple(fields) => json!({
                "kind": "tuple",
                "fields": fields.iter().map(Schema::to_json).collect::<Vec<_>>(),
            }),
            Schema::Vector { size, element } => {
                json!({"kind": "vector", "size": size, "element": element.to_json()})
            }
            Schema::List(element) => json!({"kind": "list", "element": element.to_json()}),
            Schema::Map { key, value } => {
                json!({"kind": "map", "key": key.to_json(), "value": value.to_json()})
            }
            Schema::Struct(s) => {
                let fields: Map<String, Json> = s
                    .fields()
                    .iter()
                    .map(|(name, field)| (name.clone(), field.to_json()))
                    .collect();
                json!({"kind": "struct", "fields": fields})
            }
            Schema::Union(u) => {
                let variants: Map<String, Json> = u
                    .variants()
                    .iter()
                    .map(|(name, variant)| (name.clone(), variant.to_json()))
                    .collect();
                json!({
                    "kind": "union",
                    "discriminator": u.discriminator(),
                    "variants": variants,
                })
            }
        }
    }
}

fn member<'a>(obj: &'a Map<String, Json>, key: &str) -> Result<&'a Json, PackError> {
    obj.get(key)
        .ok_or_else(|| PackError::config(format!("schema node is missing \"{key}\"")))
}

fn width(obj: &Map<String, Json>, key: &str) -> Result<u32, PackError> {
    member(obj, key)?
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| PackError::config(format!("\"{key}\" must be a non-negative integer")))
}

fn named_nodes(obj: &Map<String, Json>, key: &str) -> Result<Vec<(String, Schema)>, PackError> {
    member(obj, key)?
        .as_object()
        .ok_or_else(|| PackError::config(format!("\"{key}\" must be an object")))?
        .iter()
        .map(|(name, node)| Ok((name.clone(), Schema::from_json(node)?)))
        .collect()
}
