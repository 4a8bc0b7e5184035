//! Byte-wise XOR over equal-length operands.

use crate::error::{Error, Result};

/// XOR `first` with each of `others`, byte-wise. All operands must share
/// the same length.
///
/// The loop below performs the same fixed number of byte operations
/// regardless of operand contents, so there's no data-dependent branching
/// to leak through timing — unlike the length check, which is a public
/// precondition, not secret-dependent.
///
/// # Errors
///
/// Returns [`Error::Type`] if any operand in `others` has a different
/// length from `first`.
pub fn xor(first: &[u8], others: &[&[u8]]) -> Result<Vec<u8>> {
    let mut result = first.to_vec();
    for other in others {
        if other.len() != first.len() {
            return Err(Error::Type {
                first: first.len(),
                other: other.len(),
            });
        }
        for (byte, &other_byte) in result.iter_mut().zip(other.iter()) {
            *byte ^= other_byte;
        }
    }
    Ok(result)
}
