//! Legacy PBKDF2 key derivation.
//!
//! This derivation is kept for backwards compatibility with key bundles
//! produced before [`crate::random_bytes`]-seeded bundles
//! (`generate_keyinfo` in `edb-core`) became the default. New deployments
//! should prefer CSPRNG key bundles; this function is deterministic given
//! the passphrase alone, so the passphrase must be high-entropy.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

use crate::block::BLOCK_BYTES;

const ITERATIONS: u32 = 10_000;

/// Derive `count` consecutive 32-byte keys from `passphrase` via
/// PBKDF2-HMAC-SHA-256 with an empty salt and 10 000 iterations.
///
/// The derivation is intentionally salt-free so that it is fully
/// deterministic given the passphrase: the same passphrase always yields
/// the same key material, in the same order.
#[must_use]
pub fn kdf(passphrase: &[u8], count: usize) -> Vec<[u8; BLOCK_BYTES]> {
    let mut material = vec![0u8; BLOCK_BYTES * count];
    pbkdf2_hmac::<Sha256>(passphrase, b"", ITERATIONS, &mut material);

    material
        .chunks_exact(BLOCK_BYTES)
        .map(|chunk| chunk.try_into().expect("chunk is exactly BLOCK_BYTES"))
        .collect()
}
