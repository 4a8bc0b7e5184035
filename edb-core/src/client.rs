//! The searchable-encryption client: Song, Wagner & Perrig's "final
//! scheme", composed from [`edb_primitives`].

use std::collections::BTreeMap;
use std::sync::OnceLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use edb_primitives::{decrypt_block, encrypt_block, pad, prf, random_bytes, unpad, Block, LEFT_BYTES, MATCH_BYTES};
use rand::{CryptoRng, RngCore};

use crate::error::{Error, Result};
use crate::keys::{generate_keyinfo, read_keyinfo, KeyBundle};
use crate::schema::{KeyDescriptor, KeyKind, KeySchema};
use crate::wire::{decode_pair, encode_pair};

/// A client holding a key bundle, able to encrypt, decrypt, and issue
/// search queries over 32-byte-padded tokens.
#[derive(Debug)]
pub struct Client {
    keys: KeyBundle,
}

impl Client {
    /// The canonical schema this client's key bundle must satisfy:
    /// `seed`, `hash`, and `encrypt` as 256-bit block keys, plus a
    /// 512-bit `paillier` key pair for homomorphic aggregates.
    #[must_use]
    pub fn key_schema() -> &'static KeySchema {
        static SCHEMA: OnceLock<KeySchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            KeySchema::new()
                .with("seed", KeyDescriptor { kind: KeyKind::Block, bits: 256 })
                .with("hash", KeyDescriptor { kind: KeyKind::Block, bits: 256 })
                .with("encrypt", KeyDescriptor { kind: KeyKind::Block, bits: 256 })
                .with("paillier", KeyDescriptor { kind: KeyKind::Paillier, bits: 512 })
        })
    }

    /// Generate a fresh client with a new key bundle drawn from `rng`.
    pub fn generate<R: CryptoRng + RngCore>(rng: &mut R) -> Result<Self> {
        let keys = generate_keyinfo(rng, Self::key_schema())?;
        Ok(Self { keys })
    }

    /// Load a client's key bundle from a keyfile previously written by
    /// [`crate::keys::write_keyinfo`].
    ///
    /// # Errors
    ///
    /// Propagates I/O, JSON, and format errors from [`read_keyinfo`].
    pub fn from_keyfile(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let keys = read_keyinfo(path)?;
        Ok(Self { keys })
    }

    /// Wrap an already-loaded key bundle.
    #[must_use]
    pub fn from_bundle(keys: KeyBundle) -> Self {
        Self { keys }
    }

    /// The underlying key bundle, e.g. to persist it or hand the
    /// `paillier` public key to a server.
    #[must_use]
    pub fn keys(&self) -> &KeyBundle {
        &self.keys
    }

    /// Pad and deterministically pre-encrypt a raw token.
    ///
    /// Equal plaintexts always yield equal prewords under the same
    /// `encrypt` key — this determinism is what makes search possible and
    /// is the scheme's intentional leakage.
    ///
    /// # Errors
    ///
    /// Returns an error if `word.len() >= BLOCK_BYTES`.
    pub fn preprocess(&self, word: &[u8]) -> Result<Block> {
        let padded = pad(word)?;
        Ok(encrypt_block(self.keys.block("encrypt")?, &padded)?)
    }

    fn postprocess(&self, preword: &Block) -> Result<Vec<u8>> {
        let padded = decrypt_block(self.keys.block("encrypt")?, preword)?;
        Ok(unpad(&padded)?)
    }

    fn word_key(&self, left_part: &[u8]) -> Result<Vec<u8>> {
        Ok(prf(self.keys.block("hash")?, left_part, None))
    }

    fn stream_prefix(&self, salt: &[u8]) -> Result<Vec<u8>> {
        Ok(prf(self.keys.block("seed")?, salt, Some(LEFT_BYTES)))
    }

    fn stream_suffix(&self, word_key: &[u8], stream_prefix: &[u8]) -> Vec<u8> {
        prf(word_key, stream_prefix, Some(MATCH_BYTES))
    }

    fn stream_encrypt(&self, salt: &[u8], preword: &Block) -> Result<Vec<u8>> {
        let left_part = &preword[..LEFT_BYTES];
        let word_key = self.word_key(left_part)?;
        let stream_prefix = self.stream_prefix(salt)?;
        let stream_suffix = self.stream_suffix(&word_key, &stream_prefix);
        let mut keystream = stream_prefix;
        keystream.extend_from_slice(&stream_suffix);
        Ok(edb_primitives::xor(preword, &[&keystream])?)
    }

    fn stream_decrypt(&self, salt: &[u8], ciphertext: &[u8]) -> Result<Block> {
        let left_ciphertext = &ciphertext[..LEFT_BYTES];
        let stream_prefix = self.stream_prefix(salt)?;
        let left_part = edb_primitives::xor(left_ciphertext, &[&stream_prefix])?;
        let word_key = self.word_key(&left_part)?;
        let stream_suffix = self.stream_suffix(&word_key, &stream_prefix);
        let mut keystream = stream_prefix;
        keystream.extend_from_slice(&stream_suffix);
        let preword = edb_primitives::xor(ciphertext, &[&keystream])?;
        let mut block = [0u8; edb_primitives::BLOCK_BYTES];
        block.copy_from_slice(&preword);
        Ok(block)
    }

    /// Encrypt `word` into its wire-format field: a fresh 32-byte salt
    /// prefixing the stream-cipher ciphertext, base64-encoded.
    ///
    /// # Errors
    ///
    /// Returns an error if `word.len() >= BLOCK_BYTES`.
    pub fn encrypt(&self, word: &[u8]) -> Result<String> {
        let salt_vec = random_bytes(edb_primitives::BLOCK_BYTES);
        let mut salt = [0u8; edb_primitives::BLOCK_BYTES];
        salt.copy_from_slice(&salt_vec);

        let preword = self.preprocess(word)?;
        let ciphertext_vec = self.stream_encrypt(&salt, &preword)?;
        let mut ciphertext = [0u8; edb_primitives::BLOCK_BYTES];
        ciphertext.copy_from_slice(&ciphertext_vec);

        Ok(encode_pair(&salt, &ciphertext))
    }

    /// Decrypt a field produced by [`Client::encrypt`].
    ///
    /// # Errors
    ///
    /// Returns an error if `field` is not valid base64 of the expected
    /// length, or if the recovered preword does not unpad cleanly (which
    /// only happens if `field` was not produced by this client's keys).
    pub fn decrypt(&self, field: &str) -> Result<Vec<u8>> {
        let (salt, ciphertext) = decode_pair(field)?;
        let preword = self.stream_decrypt(&salt, &ciphertext)?;
        self.postprocess(&preword)
    }

    /// Build a query token for `word`: `base64(preword ‖ word_key)`.
    ///
    /// # Errors
    ///
    /// Returns an error if `word.len() >= BLOCK_BYTES`.
    pub fn query(&self, word: &[u8]) -> Result<String> {
        let preword = self.preprocess(word)?;
        let left_part = &preword[..LEFT_BYTES];
        let word_key_vec = self.word_key(left_part)?;
        let mut word_key = [0u8; edb_primitives::BLOCK_BYTES];
        word_key.copy_from_slice(&word_key_vec);
        Ok(encode_pair(&preword, &word_key))
    }

    /// Encrypt every field of `model` except those named in `exclude`.
    ///
    /// Excluded fields are opaque bytes, not necessarily valid UTF-8 (the
    /// record layer this core serves treats every field as a byte
    /// string), so they're passed through base64-encoded rather than
    /// reinterpreted as text.
    ///
    /// # Errors
    ///
    /// Returns an error on the first field that fails to encrypt (e.g.
    /// one `>= BLOCK_BYTES` bytes long).
    pub fn encrypt_model(
        &self,
        model: &BTreeMap<String, Vec<u8>>,
        exclude: &[&str],
    ) -> Result<BTreeMap<String, String>> {
        model
            .iter()
            .map(|(field, value)| {
                if exclude.contains(&field.as_str()) {
                    Ok((field.clone(), STANDARD.encode(value)))
                } else {
                    Ok((field.clone(), self.encrypt(value)?))
                }
            })
            .collect()
    }

    /// Decrypt every field of `model` except those named in `exclude`,
    /// the inverse of [`Client::encrypt_model`]. Excluded fields are
    /// recovered verbatim by base64-decoding them.
    ///
    /// # Errors
    ///
    /// Returns an error on the first field that fails to decrypt, or, for
    /// an excluded field, fails to base64-decode.
    pub fn decrypt_model(
        &self,
        model: &BTreeMap<String, String>,
        exclude: &[&str],
    ) -> Result<BTreeMap<String, Vec<u8>>> {
        model
            .iter()
            .map(|(field, value)| {
                if exclude.contains(&field.as_str()) {
                    let bytes = STANDARD.decode(value.trim_end()).map_err(|e| Error::Format {
                        reason: format!("excluded field {field:?}: {e}"),
                    })?;
                    Ok((field.clone(), bytes))
                } else {
                    Ok((field.clone(), self.decrypt(value)?))
                }
            })
            .collect()
    }

    /// Build query tokens for every value in `params`.
    ///
    /// # Errors
    ///
    /// Returns an error on the first value that fails to tokenize.
    pub fn encrypt_query(&self, params: &BTreeMap<String, Vec<u8>>) -> Result<BTreeMap<String, String>> {
        params
            .iter()
            .map(|(field, value)| Ok((field.clone(), self.query(value)?)))
            .collect()
    }
}
