//! Searchable encryption over key-value records.
//!
//! Composes [`edb_primitives`] into the Song, Wagner & Perrig "final
//! scheme" ([`client`]) and [`edb_paillier`] into the homomorphic
//! aggregates the server side exposes ([`server`]). Key material is
//! described by a [`schema::KeySchema`], generated or loaded into a
//! [`keys::KeyBundle`], and never leaves a [`client::Client`] — the
//! server only ever handles base64 ciphertext and public keys.

pub mod client;
pub mod error;
pub mod keys;
pub mod schema;
pub mod server;
pub mod wire;

pub use client::Client;
pub use error::{Error, Result};
pub use keys::{generate_keyinfo, generate_keys, read_keyinfo, write_keyinfo, KeyBundle, KeyMaterial};
pub use schema::{build_schema, KeyDescriptor, KeyKind, KeySchema};
pub use server::{average, correlate, count, match_field, sum, Index};
