//! The Paillier additively-homomorphic public-key cryptosystem.
//!
//! Ciphertext multiplication mod `n^2` corresponds to plaintext addition
//! mod `n`, which lets a server that never holds the private key combine
//! encrypted numeric fields: see [`ops::add`] for pairwise combination and
//! [`ops::average`] for a blinded aggregate over many ciphertexts.

mod error;
mod key;
mod ops;

pub use error::{Error, Result};
pub use key::{keygen, PrivateKey, PublicKey, DEFAULT_BITS};
pub use ops::{add, average, decrypt, encrypt};
