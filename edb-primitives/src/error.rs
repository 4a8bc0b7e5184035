//! Error types for [`crate`].

use core::fmt;

/// Result type alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

/// Errors produced by the primitive operations in this crate.
///
/// Each variant corresponds to one of the failure classes spec'd for the
/// core: an oversized or undersized buffer passed to a fixed-width
/// operation (`Size`), or a XOR call over operands of differing lengths
/// (`Type`).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// A buffer did not have the length a primitive operation requires.
    Size {
        /// The length the operation requires.
        expected: usize,
        /// The length actually supplied.
        actual: usize,
    },
    /// [`crate::xor`] was called with operands of differing lengths.
    Type {
        /// Length of the first operand.
        first: usize,
        /// Length of a later operand that disagreed with it.
        other: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Size { expected, actual } => {
                write!(f, "expected buffer of length {expected}, got {actual}")
            }
            Error::Type { first, other } => {
                write!(f, "xor operands have mismatched lengths: {first} vs {other}")
            }
        }
    }
}

impl std::error::Error for Error {}
