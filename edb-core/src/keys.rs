//! Key-bundle generation, storage, and (de)serialization.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use num_bigint_dig::BigInt;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::error::{Error, Result};
use crate::schema::{KeyKind, KeySchema};

/// One entry in a key bundle: either raw symmetric key bytes or a Paillier
/// key pair.
#[derive(Debug)]
pub enum KeyMaterial {
    /// Symmetric key bytes, zeroized on drop.
    Block(BlockKey),
    /// A full Paillier key pair (public and private halves).
    Paillier(edb_paillier::PrivateKey),
    /// A Paillier public key only, as loaded from a `"paillier.pub"`
    /// keyfile entry shared by a server that never holds the trapdoor.
    PaillierPublic(edb_paillier::PublicKey),
}

/// Symmetric key bytes, zeroized on drop.
#[derive(Clone)]
pub struct BlockKey(Vec<u8>);

impl BlockKey {
    /// The raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for BlockKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BlockKey(..)")
    }
}

impl Drop for BlockKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// A generated or loaded set of named keys, sealed once produced.
#[derive(Debug, Default)]
pub struct KeyBundle(BTreeMap<String, KeyMaterial>);

impl KeyBundle {
    /// Look up a block key by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingKey`] if `name` is absent or not a block
    /// key.
    pub fn block(&self, name: &str) -> Result<&[u8]> {
        match self.0.get(name) {
            Some(KeyMaterial::Block(key)) => Ok(key.as_bytes()),
            _ => Err(Error::MissingKey {
                name: name.to_string(),
            }),
        }
    }

    /// Look up a Paillier private key by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingKey`] if `name` is absent or not a
    /// private Paillier key.
    pub fn paillier(&self, name: &str) -> Result<&edb_paillier::PrivateKey> {
        match self.0.get(name) {
            Some(KeyMaterial::Paillier(key)) => Ok(key),
            _ => Err(Error::MissingKey {
                name: name.to_string(),
            }),
        }
    }

    /// Look up a Paillier public key by name, accepting either a full
    /// private key (returning its public half) or a public-only entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingKey`] if `name` is absent or not a
    /// Paillier key of either form.
    pub fn paillier_public(&self, name: &str) -> Result<&edb_paillier::PublicKey> {
        match self.0.get(name) {
            Some(KeyMaterial::Paillier(key)) => Ok(key.public_key()),
            Some(KeyMaterial::PaillierPublic(key)) => Ok(key),
            _ => Err(Error::MissingKey {
                name: name.to_string(),
            }),
        }
    }

    /// Insert or replace an entry. Used by [`generate_keyinfo`] and
    /// [`generate_keys`]; not exposed outside the crate so that a bundle
    /// handed to a caller is effectively sealed.
    fn insert(&mut self, name: impl Into<String>, material: KeyMaterial) {
        self.0.insert(name.into(), material);
    }

    fn iter(&self) -> impl Iterator<Item = (&str, &KeyMaterial)> {
        self.0.iter().map(|(name, material)| (name.as_str(), material))
    }
}

/// Generate a fresh key bundle matching `schema`, drawing material from
/// `rng`.
///
/// # Errors
///
/// Propagates [`edb_paillier::Error::NoModularInverse`] (wrapped) if
/// Paillier key generation fails for a particular entry.
pub fn generate_keyinfo<R: CryptoRng + RngCore>(
    rng: &mut R,
    schema: &KeySchema,
) -> Result<KeyBundle> {
    let mut bundle = KeyBundle::default();
    for (name, descriptor) in schema.iter() {
        log::debug!("generating key {name:?} ({:?}, {} bits)", descriptor.kind, descriptor.bits);
        match descriptor.kind {
            KeyKind::Block => {
                let mut bytes = vec![0u8; (descriptor.bits / 8) as usize];
                rng.fill_bytes(&mut bytes);
                bundle.insert(name, KeyMaterial::Block(BlockKey(bytes)));
            }
            KeyKind::Paillier => {
                let key = edb_paillier::keygen(rng, descriptor.bits as usize)?;
                bundle.insert(name, KeyMaterial::Paillier(key));
            }
        }
    }
    Ok(bundle)
}

/// Derive a legacy block-only key bundle from a passphrase via PBKDF2.
///
/// Restores the original crate's passphrase-derived bundle: deterministic
/// given `passphrase` alone, so `passphrase` must be high-entropy. Only
/// ever produces block keys, one per name in `names`, in order.
#[must_use]
pub fn generate_keys(passphrase: &[u8], names: &[&str]) -> KeyBundle {
    let keys = edb_primitives::kdf(passphrase, names.len());
    let mut bundle = KeyBundle::default();
    for (name, key) in names.iter().zip(keys) {
        bundle.insert(*name, KeyMaterial::Block(BlockKey(key.to_vec())));
    }
    bundle
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum WireEntry {
    Block(String),
    PaillierPrivate { paillier: [String; 4] },
    PaillierPublic { #[serde(rename = "paillier.pub")] paillier_pub: [String; 2] },
}

fn bigint_to_string(value: &BigInt) -> String {
    value.to_str_radix(10)
}

fn bigint_from_string(value: &str) -> Result<BigInt> {
    BigInt::parse_bytes(value.as_bytes(), 10).ok_or_else(|| Error::Format {
        reason: format!("not a decimal integer: {value:?}"),
    })
}

/// Write `bundle` to `path` as JSON.
///
/// Writes to a sibling temporary file and renames it into place, so a
/// process interrupted mid-write never leaves a half-written keyfile
/// readable at `path`.
///
/// # Errors
///
/// Returns [`Error::Io`] on filesystem failure or [`Error::Json`] if
/// serialization fails (it should not, for a well-formed bundle).
pub fn write_keyinfo(bundle: &KeyBundle, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut wire: BTreeMap<String, WireEntry> = BTreeMap::new();
    for (name, material) in bundle.iter() {
        let entry = match material {
            KeyMaterial::Block(key) => WireEntry::Block(STANDARD.encode(key.as_bytes())),
            KeyMaterial::Paillier(key) => WireEntry::PaillierPrivate {
                paillier: [
                    bigint_to_string(key.public_key().n()),
                    bigint_to_string(key.public_key().g()),
                    bigint_to_string(&key.lambda_component()),
                    bigint_to_string(&key.mu_component()),
                ],
            },
            KeyMaterial::PaillierPublic(key) => WireEntry::PaillierPublic {
                paillier_pub: [bigint_to_string(key.n()), bigint_to_string(key.g())],
            },
        };
        wire.insert(name.to_string(), entry);
    }

    let serialized = serde_json::to_vec(&wire)?;
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, serialized)?;
    fs::rename(&tmp_path, path)?;
    log::debug!("wrote key bundle to {}", path.display());
    Ok(())
}

/// Read a key bundle previously written by [`write_keyinfo`] from `path`.
///
/// # Errors
///
/// Returns [`Error::Io`], [`Error::Json`], or [`Error::Format`] if the
/// file cannot be read, is not valid JSON, or contains a malformed entry
/// (wrong tuple arity, bad base64, non-decimal integer).
pub fn read_keyinfo(path: impl AsRef<Path>) -> Result<KeyBundle> {
    let raw = fs::read(path.as_ref())?;
    let wire: BTreeMap<String, WireEntry> = serde_json::from_slice(&raw)?;

    let mut bundle = KeyBundle::default();
    for (name, entry) in wire {
        let material = match entry {
            WireEntry::Block(b64) => {
                let bytes = STANDARD.decode(b64.trim_end()).map_err(|e| Error::Format {
                    reason: format!("key {name:?}: {e}"),
                })?;
                KeyMaterial::Block(BlockKey(bytes))
            }
            WireEntry::PaillierPrivate { paillier } => {
                let [n, g, lambda, mu] = paillier;
                KeyMaterial::Paillier(edb_paillier::PrivateKey::from_parts(
                    bigint_from_string(&n)?,
                    bigint_from_string(&g)?,
                    bigint_from_string(&lambda)?,
                    bigint_from_string(&mu)?,
                ))
            }
            WireEntry::PaillierPublic { paillier_pub } => {
                let [n, g] = paillier_pub;
                KeyMaterial::PaillierPublic(public_key_from_parts(
                    bigint_from_string(&n)?,
                    bigint_from_string(&g)?,
                ))
            }
        };
        bundle.insert(name, material);
    }
    log::debug!("read key bundle from {}", path.as_ref().display());
    Ok(bundle)
}

fn public_key_from_parts(n: BigInt, g: BigInt) -> edb_paillier::PublicKey {
    // `PublicKey` has no public constructor since ordinary callers only
    // ever obtain one from a `PrivateKey`; build a throwaway private key
    // around the supplied (n, g) and discard the trapdoor half, which a
    // public-only keyfile entry never had in the first place.
    edb_paillier::PrivateKey::from_parts(n, g, BigInt::from(0), BigInt::from(0))
        .public_key()
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{KeyDescriptor, KeyKind};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn schema() -> KeySchema {
        KeySchema::new()
            .with("encrypt", KeyDescriptor { kind: KeyKind::Block, bits: 256 })
            .with("hmac", KeyDescriptor { kind: KeyKind::Block, bits: 256 })
            .with("homomorphic", KeyDescriptor { kind: KeyKind::Paillier, bits: 256 })
    }

    #[test]
    fn keyfile_round_trips() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let bundle = generate_keyinfo(&mut rng, &schema()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys.json");
        write_keyinfo(&bundle, &path).unwrap();
        let loaded = read_keyinfo(&path).unwrap();

        assert_eq!(bundle.block("encrypt").unwrap(), loaded.block("encrypt").unwrap());
        assert_eq!(bundle.block("hmac").unwrap(), loaded.block("hmac").unwrap());

        let original = bundle.paillier("homomorphic").unwrap();
        let round_tripped = loaded.paillier("homomorphic").unwrap();
        assert_eq!(original.public_key().n(), round_tripped.public_key().n());
        assert_eq!(original.lambda_component(), round_tripped.lambda_component());
        assert_eq!(original.mu_component(), round_tripped.mu_component());
    }

    #[test]
    fn generate_keys_is_deterministic() {
        let a = generate_keys(b"correct horse battery staple", &["encrypt", "hmac"]);
        let b = generate_keys(b"correct horse battery staple", &["encrypt", "hmac"]);
        assert_eq!(a.block("encrypt").unwrap(), b.block("encrypt").unwrap());
        assert_eq!(a.block("hmac").unwrap(), b.block("hmac").unwrap());
        assert_ne!(a.block("encrypt").unwrap(), a.block("hmac").unwrap());
    }
}
