//! HMAC-SHA-256 pseudorandom function.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::block::BLOCK_BYTES;

type HmacSha256 = Hmac<Sha256>;

/// Compute `HMAC-SHA-256(key, msg)`, truncated to `length` bytes if
/// supplied (default [`BLOCK_BYTES`]).
///
/// # Panics
///
/// Panics if `length` exceeds the 32-byte HMAC-SHA-256 digest size — this
/// is a programmer error at the call site, not a runtime condition callers
/// are expected to recover from.
pub fn prf(key: &[u8], msg: &[u8], length: Option<usize>) -> Vec<u8> {
    let length = length.unwrap_or(BLOCK_BYTES);
    assert!(length <= BLOCK_BYTES, "prf: requested length exceeds digest size");

    // `Hmac::new_from_slice` accepts a key of any length (HMAC itself
    // hashes oversized keys down), which is what's needed here since
    // `prf` is also used with word-specific keys rather than only the
    // fixed 32-byte key-bundle keys.
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(msg);
    let digest = mac.finalize().into_bytes();
    digest[..length].to_vec()
}
