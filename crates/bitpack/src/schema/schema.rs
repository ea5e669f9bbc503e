use std::fmt;

/// Default name of the field that carries a union value's variant name.
pub const DEFAULT_DISCRIMINATOR: &str = "type";

/// Field holding the payload of a union value whose variant is not a struct.
pub const UNION_VALUE_KEY: &str = "value";

/// A packed schema node: describes exactly one wire encoding strategy.
///
/// Nodes are plain immutable data. Any derived lookup state (struct field
/// order, sorted union variant table, union tag width) is computed when the
/// node is built, so a schema can be shared freely across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schema {
    /// Fixed-width unsigned integer of `size` bits.
    UInt { size: u32 },
    /// Fixed-width two's-complement integer of `size` bits.
    Int { size: u32 },
    /// Unary natural number: `n` one-bits followed by a zero-bit.
    ///
    /// Any `0..=MAX_SAFE_INTEGER` is accepted, but encoding is capped at
    /// [`MAX_ENCODED_BITS`](crate::MAX_ENCODED_BITS) bits overall.
    Nat,
    /// Fixed positional tuple.
    Tuple(Vec<Schema>),
    /// Fixed-size homogeneous array; no length on the wire.
    Vector { size: usize, element: Box<Schema> },
    /// Open-ended list, cons-encoded.
    List(Box<Schema>),
    /// Associative container, cons-encoded key/value pairs.
    Map { key: Box<Schema>, value: Box<Schema> },
    /// Keyed struct, fields encoded in declared order.
    Struct(StructSchema),
    /// Tagged union over named variants.
    Union(UnionSchema),
    /// UTF-8 string, cons-encoded bytes.
    Str,
}

/// Struct fields in declared order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructSchema {
    fields: Vec<(String, Schema)>,
}

impl StructSchema {
    /// Builds a struct from fields in declaration order. A repeated name keeps
    /// its first position and takes the last schema given for it.
    pub fn new<K: Into<String>>(fields: impl IntoIterator<Item = (K, Schema)>) -> Self {
        let mut out: Vec<(String, Schema)> = Vec::new();
        for (name, schema) in fields {
            let name = name.into();
            match out.iter_mut().find(|(existing, _)| *existing == name) {
                Some(slot) => slot.1 = schema,
                None => out.push((name, schema)),
            }
        }
        Self { fields: out }
    }

    pub fn fields(&self) -> &[(String, Schema)] {
        &self.fields
    }
}

/// A compiled union: variants sorted by name, tag width precomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionSchema {
    discriminator: String,
    variants: Vec<(String, Schema)>,
    tag_bits: u32,
}

impl UnionSchema {
    pub fn new<K: Into<String>>(
        discriminator: impl Into<String>,
        variants: impl IntoIterator<Item = (K, Schema)>,
    ) -> Self {
        let mut sorted: Vec<(String, Schema)> = Vec::new();
        for (name, schema) in variants {
            let name = name.into();
            match sorted.binary_search_by(|(existing, _)| existing.as_str().cmp(name.as_str())) {
                Ok(i) => sorted[i].1 = schema,
                Err(i) => sorted.insert(i, (name, schema)),
            }
        }
        let tag_bits = tag_bits_for(sorted.len());
        Self {
            discriminator: discriminator.into(),
            variants: sorted,
            tag_bits,
        }
    }

    /// Key of the field holding the variant name.
    pub fn discriminator(&self) -> &str {
        &self.discriminator
    }

    /// Variants sorted by name; a variant's tag is its index here.
    pub fn variants(&self) -> &[(String, Schema)] {
        &self.variants
    }

    /// Width of the tag in bits: `ceil(log2(k))`, 0 for a single variant.
    pub fn tag_bits(&self) -> u32 {
        self.tag_bits
    }

    /// Looks up a variant by name, returning its tag and schema.
    pub fn variant(&self, name: &str) -> Option<(usize, &Schema)> {
        self.variants
            .binary_search_by(|(existing, _)| existing.as_str().cmp(name))
            .ok()
            .map(|i| (i, &self.variants[i].1))
    }
}

fn tag_bits_for(count: usize) -> u32 {
    if count <= 1 {
        0
    } else {
        usize::BITS - (count - 1).leading_zeros()
    }
}

impl Schema {
    pub fn uint(size: u32) -> Self {
        Schema::UInt { size }
    }

    pub fn int(size: u32) -> Self {
        Schema::Int { size }
    }

    pub fn nat() -> Self {
        Schema::Nat
    }

    pub fn tuple(fields: impl IntoIterator<Item = Schema>) -> Self {
        Schema::Tuple(fields.into_iter().collect())
    }

    pub fn vector(size: usize, element: Schema) -> Self {
        Schema::Vector {
            size,
            element: Box::new(element),
        }
    }

    pub fn list(element: Schema) -> Self {
        Schema::List(Box::new(element))
    }

    pub fn map(key: Schema, value: Schema) -> Self {
        Schema::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn structure<K: Into<String>>(fields: impl IntoIterator<Item = (K, Schema)>) -> Self {
        Schema::Struct(StructSchema::new(fields))
    }

    /// A union discriminated by the [`DEFAULT_DISCRIMINATOR`] field.
    pub fn union<K: Into<String>>(variants: impl IntoIterator<Item = (K, Schema)>) -> Self {
        Self::union_with_discriminator(DEFAULT_DISCRIMINATOR, variants)
    }

    pub fn union_with_discriminator<K: Into<String>>(
        discriminator: impl Into<String>,
        variants: impl IntoIterator<Item = (K, Schema)>,
    ) -> Self {
        Schema::Union(UnionSchema::new(discriminator, variants))
    }

    pub fn string() -> Self {
        Schema::Str
    }

    /// Short lowercase name of the node kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Schema::UInt { .. } => "uint",
            Schema::Int { .. } => "int",
            Schema::Nat => "nat",
            Schema::Tuple(_) => "tuple",
            Schema::Vector { .. } => "vector",
            Schema::List(_) => "list",
            Schema::Map { .. } => "map",
            Schema::Struct(_) => "struct",
            Schema::Union(_) => "union",
            Schema::Str => "string",
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::UInt { size } => write!(f, "UInt({size})"),
            Schema::Int { size } => write!(f, "Int({size})"),
            Schema::Nat => f.write_str("Nat"),
            Schema::Tuple(fields) => {
                f.write_str("Tuple(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{field}")?;
                }
                f.write_str(")")
            }
            Schema::Vector { size, element } => write!(f, "Vector({size}, {element})"),
            Schema::List(element) => write!(f, "List({element})"),
            Schema::Map { key, value } => write!(f, "Map({key}, {value})"),
            Schema::Struct(s) => {
                f.write_str("Struct{")?;
                for (i, (name, field)) in s.fields().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {field}")?;
                }
                f.write_str("}")
            }
            Schema::Union(u) => {
                f.write_str("Union{")?;
                for (i, (name, variant)) in u.variants().iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{name}: {variant}")?;
                }
                f.write_str("}")
            }
            Schema::Str => f.write_str("String"),
        }
    }
}
