//! Base64 wire codecs shared by [`crate::client`] and [`crate::server`].
//!
//! Both an encrypted field (`salt ‖ ciphertext`) and a query token
//! (`preword ‖ word_key`) are a pair of 32-byte blocks, base64-encoded. The
//! two are kept as distinct types so a caller can't accidentally pass a
//! query token where a field was expected, even though the byte layout is
//! identical.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use edb_primitives::BLOCK_BYTES;

use crate::error::{Error, Result};

/// Encode two 32-byte blocks as `base64(first ‖ second)`.
#[must_use]
pub fn encode_pair(first: &[u8; BLOCK_BYTES], second: &[u8; BLOCK_BYTES]) -> String {
    let mut buf = Vec::with_capacity(2 * BLOCK_BYTES);
    buf.extend_from_slice(first);
    buf.extend_from_slice(second);
    STANDARD.encode(buf)
}

/// Decode `base64(first ‖ second)` produced by [`encode_pair`].
///
/// # Errors
///
/// Returns [`Error::Format`] if `encoded` is not valid base64, or decodes
/// to a length other than `2 * BLOCK_BYTES`.
pub fn decode_pair(encoded: &str) -> Result<([u8; BLOCK_BYTES], [u8; BLOCK_BYTES])> {
    let bytes = STANDARD.decode(encoded.trim_end()).map_err(|e| Error::Format {
        reason: format!("invalid base64: {e}"),
    })?;
    if bytes.len() != 2 * BLOCK_BYTES {
        return Err(Error::Format {
            reason: format!(
                "expected {} decoded bytes, got {}",
                2 * BLOCK_BYTES,
                bytes.len()
            ),
        });
    }
    let mut first = [0u8; BLOCK_BYTES];
    let mut second = [0u8; BLOCK_BYTES];
    first.copy_from_slice(&bytes[..BLOCK_BYTES]);
    second.copy_from_slice(&bytes[BLOCK_BYTES..]);
    Ok((first, second))
}

/// Decode a pair without returning an error on failure, for the
/// server-side match path (§4.5: malformed input is a non-match, not an
/// error).
#[must_use]
pub fn try_decode_pair(encoded: &str) -> Option<([u8; BLOCK_BYTES], [u8; BLOCK_BYTES])> {
    decode_pair(encoded).ok()
}
