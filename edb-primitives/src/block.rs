//! Fixed-width blocks and their padding.

use crate::error::{Error, Result};

/// Width in bytes of every symmetric value in the scheme: the pre-encrypted
/// word, the stream cipher's output, and the stored ciphertext.
pub const BLOCK_BYTES: usize = 32;

/// Width in bytes of the truncated match test appended to the right of a
/// block. Fixed by the wire format — changing it breaks compatibility.
pub const MATCH_BYTES: usize = 4;

/// Width in bytes of the left half of a block, i.e. everything but the
/// match suffix.
pub const LEFT_BYTES: usize = BLOCK_BYTES - MATCH_BYTES;

/// A fixed-width 32-byte buffer. All symmetric cryptographic values in the
/// scheme (prewords, stream blocks, ciphertext blocks, salts) are blocks.
pub type Block = [u8; BLOCK_BYTES];

/// Pad `message` out to exactly [`BLOCK_BYTES`] using a PKCS#7-style
/// scheme: the remaining `p = BLOCK_BYTES - message.len()` bytes are all
/// set to `p`.
///
/// This mirrors `block_padding::Pkcs7::raw_pad`, specialized to a single
/// fixed block size rather than a generic one.
///
/// # Errors
///
/// Returns [`Error::Size`] if `message.len() >= BLOCK_BYTES`.
pub fn pad(message: &[u8]) -> Result<Block> {
    if message.len() >= BLOCK_BYTES {
        return Err(Error::Size {
            expected: BLOCK_BYTES - 1,
            actual: message.len(),
        });
    }
    let pad_len = BLOCK_BYTES - message.len();
    // `pad_len` is in 1..=BLOCK_BYTES, always fits in a u8.
    let pad_byte = pad_len as u8;

    let mut block = [pad_byte; BLOCK_BYTES];
    block[..message.len()].copy_from_slice(message);
    Ok(block)
}

/// Undo [`pad`]: read the trailing pad-count byte and return the message
/// that preceded it.
///
/// # Errors
///
/// Returns [`Error::Size`] if `block.len() != BLOCK_BYTES` or if the
/// trailing pad-count byte is out of range for the block.
pub fn unpad(block: &[u8]) -> Result<Vec<u8>> {
    if block.len() != BLOCK_BYTES {
        return Err(Error::Size {
            expected: BLOCK_BYTES,
            actual: block.len(),
        });
    }
    let pad_len = block[BLOCK_BYTES - 1] as usize;
    if pad_len == 0 || pad_len > BLOCK_BYTES {
        return Err(Error::Size {
            expected: BLOCK_BYTES,
            actual: pad_len,
        });
    }
    Ok(block[..BLOCK_BYTES - pad_len].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_fills_with_count_byte() {
        let block = pad(b"test").unwrap();
        assert_eq!(block.len(), BLOCK_BYTES);
        assert_eq!(&block[..4], b"test");
        assert!(block[4..].iter().all(|&b| b == 28));
    }

    #[test]
    fn pad_unpad_round_trip() {
        for msg in [&b""[..], b"a", b"127.0.0.1", &[7u8; 31]] {
            let block = pad(msg).unwrap();
            assert_eq!(unpad(&block).unwrap(), msg);
        }
    }

    #[test]
    fn pad_rejects_oversized_input() {
        assert!(pad(&[0u8; BLOCK_BYTES]).is_err());
    }

    #[test]
    fn unpad_rejects_wrong_length() {
        assert!(unpad(&[0u8; BLOCK_BYTES - 1]).is_err());
    }

    #[test]
    fn unpad_rejects_corrupt_pad_count() {
        let mut block = [0u8; BLOCK_BYTES];
        block[BLOCK_BYTES - 1] = 0;
        assert!(unpad(&block).is_err());
        block[BLOCK_BYTES - 1] = u8::MAX;
        assert!(unpad(&block).is_err());
    }
}
