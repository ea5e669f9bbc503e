//! Schema model.

mod json;
#[allow(clippy::module_inception)]
mod schema;

pub use schema::{Schema, StructSchema, UnionSchema, DEFAULT_DISCRIMINATOR, UNION_VALUE_KEY};
