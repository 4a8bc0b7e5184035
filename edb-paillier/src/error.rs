//! Error types for [`crate`].

use core::fmt;

/// Result type alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

/// Errors produced by Paillier key generation, encryption, and decryption.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// A plaintext or ciphertext fell outside the range the operation
    /// requires (`0 <= x < n` for plaintexts, `0 <= c < n^2` for
    /// ciphertexts).
    OutOfRange {
        /// Human-readable description of which value and bound failed.
        what: &'static str,
    },
    /// Key generation could not find a modular inverse for `lambda mod
    /// n` — this would indicate `gcd(lambda, n) != 1`, which safe primes
    /// make negligibly likely but which an implementation must still
    /// handle.
    NoModularInverse,
    /// Decryption produced a value not congruent to `1 mod n` after the
    /// `L` reduction step, indicating a corrupted key or ciphertext.
    DecryptionSanityFailed,
    /// An aggregate was requested over an empty slice of ciphertexts.
    EmptyAggregate,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfRange { what } => write!(f, "paillier: {what} out of range"),
            Error::NoModularInverse => {
                write!(f, "paillier: modular inverse of lambda does not exist")
            }
            Error::DecryptionSanityFailed => {
                write!(f, "paillier: decryption sanity check failed")
            }
            Error::EmptyAggregate => write!(f, "paillier: cannot aggregate an empty set"),
        }
    }
}

impl std::error::Error for Error {}
