//! Error types for [`crate`].

use core::fmt;

/// Result type alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

/// Errors produced by key-bundle management and the searchable-encryption
/// client.
///
/// Composes the lower crates' error types rather than flattening them, so
/// a caller can match on which layer failed while `Display` still reads as
/// a single message.
#[derive(Debug)]
pub enum Error {
    /// A key schema named an unsupported attribute, type, or bit width.
    Schema {
        /// What was wrong with the schema.
        reason: String,
    },
    /// Base64 decoding failed, or decoded to the wrong length.
    Format {
        /// What was malformed.
        reason: String,
    },
    /// A named key was missing from a key bundle, or had the wrong kind.
    MissingKey {
        /// The key name that was missing or mistyped.
        name: String,
    },
    /// Propagated from [`edb_primitives`].
    Primitives(edb_primitives::Error),
    /// Propagated from [`edb_paillier`].
    Paillier(edb_paillier::Error),
    /// Propagated from [`serde_json`] while reading or writing a keyfile.
    Json(String),
    /// Propagated from a failed keyfile I/O operation.
    Io(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Schema { reason } => write!(f, "invalid key schema: {reason}"),
            Error::Format { reason } => write!(f, "malformed wire data: {reason}"),
            Error::MissingKey { name } => write!(f, "key bundle missing entry {name:?}"),
            Error::Primitives(e) => write!(f, "{e}"),
            Error::Paillier(e) => write!(f, "{e}"),
            Error::Json(msg) => write!(f, "keyfile json error: {msg}"),
            Error::Io(msg) => write!(f, "keyfile io error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<edb_primitives::Error> for Error {
    fn from(e: edb_primitives::Error) -> Self {
        Error::Primitives(e)
    }
}

impl From<edb_paillier::Error> for Error {
    fn from(e: edb_paillier::Error) -> Self {
        Error::Paillier(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}
