//! Key schemas: the shape a key bundle must have before any key material
//! exists.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// The kind of key a schema entry describes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KeyKind {
    /// A symmetric key: `bits / 8` random bytes.
    Block,
    /// A Paillier key pair with a modulus of `bits` bits.
    Paillier,
}

/// One entry in a [`KeySchema`]: the kind and bit width of a named key.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct KeyDescriptor {
    /// The key's kind.
    pub kind: KeyKind,
    /// The key's bit width (`256` for block keys by convention, `512` for
    /// the default Paillier modulus).
    pub bits: u32,
}

impl Default for KeyDescriptor {
    fn default() -> Self {
        Self {
            kind: KeyKind::Block,
            bits: 256,
        }
    }
}

/// A mapping from key name to the kind and width of key that name must
/// hold once a bundle is generated.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct KeySchema(BTreeMap<String, KeyDescriptor>);

impl KeySchema {
    /// An empty schema, built up with [`KeySchema::with`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry, returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, descriptor: KeyDescriptor) -> Self {
        self.0.insert(name.into(), descriptor);
        self
    }

    /// Iterate over the schema's `(name, descriptor)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &KeyDescriptor)> {
        self.0.iter().map(|(name, desc)| (name.as_str(), desc))
    }

    /// The descriptor for `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&KeyDescriptor> {
        self.0.get(name)
    }
}

/// Build a [`KeySchema`] from a list of `(name, type, bits)` triples, the
/// shape a caller-supplied schema typically arrives in (e.g. parsed from a
/// config file). `type` must be `"block"` or `"paillier"`.
///
/// # Errors
///
/// Returns [`Error::Schema`] for an unrecognized `type` string.
pub fn build_schema<'a>(
    entries: impl IntoIterator<Item = (&'a str, &'a str, u32)>,
) -> Result<KeySchema> {
    let mut schema = KeySchema::new();
    for (name, kind, bits) in entries {
        let kind = match kind {
            "block" => KeyKind::Block,
            "paillier" => KeyKind::Paillier,
            other => {
                return Err(Error::Schema {
                    reason: format!("unsupported key type {other:?}"),
                })
            }
        };
        schema = schema.with(name, KeyDescriptor { kind, bits });
    }
    Ok(schema)
}
