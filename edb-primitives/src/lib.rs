//! Low-level cryptographic primitives for a searchable encrypted database.
//!
//! This crate provides exactly the building blocks spec'd for the core: a
//! deterministic single-block cipher (AES-256-CBC, zero IV), a CTR-mode
//! pseudorandom generator, an HMAC-SHA-256 pseudorandom function, a
//! PBKDF2 key derivation function, padding to a fixed block, CSPRNG
//! access, and constant-length byte-wise XOR. Composition into the
//! searchable-encryption scheme itself lives in `edb-core`.

mod block;
mod cipher;
mod error;
mod kdf;
mod prf;
mod random;
mod xor;

pub use block::{pad, unpad, Block, BLOCK_BYTES, LEFT_BYTES, MATCH_BYTES};
pub use cipher::{decrypt_block, encrypt_block, prg};
pub use error::{Error, Result};
pub use kdf::kdf;
pub use prf::prf;
pub use random::random_bytes;
pub use xor::xor;
