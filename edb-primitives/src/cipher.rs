//! Deterministic single-block encryption and a CTR-mode pseudorandom
//! generator, both built on AES-256.

use aes::Aes256;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit, StreamCipher};
use cbc::cipher::generic_array::GenericArray;

use crate::block::BLOCK_BYTES;
use crate::error::{Error, Result};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;
type Aes256Ctr = ctr::Ctr128BE<Aes256>;

const AES_BLOCK_BYTES: usize = 16;
const ZERO_IV: [u8; AES_BLOCK_BYTES] = [0u8; AES_BLOCK_BYTES];

/// Deterministically encrypt a single 32-byte block under `key` using
/// AES-256-CBC with a fixed zero IV.
///
/// Because the mode is CBC over exactly one cipher block, this is
/// equivalent to AES-256-ECB on that block: every call with the same
/// key and plaintext produces the same ciphertext. That determinism is
/// the intentional leakage the searchable-encryption scheme relies on —
/// do not substitute a randomized or authenticated mode here.
///
/// # Errors
///
/// Returns [`Error::Size`] if `key.len() != 32` or `message.len() !=
/// BLOCK_BYTES`.
pub fn encrypt_block(key: &[u8], message: &[u8]) -> Result<[u8; BLOCK_BYTES]> {
    require_key(key)?;
    require_block(message)?;

    let mut buf = [0u8; BLOCK_BYTES];
    buf.copy_from_slice(message);

    let mut cipher = Aes256CbcEnc::new(GenericArray::from_slice(key), GenericArray::from_slice(&ZERO_IV));
    for chunk in buf.chunks_mut(AES_BLOCK_BYTES) {
        let block = GenericArray::from_mut_slice(chunk);
        cipher.encrypt_block_mut(block);
    }
    Ok(buf)
}

/// Inverse of [`encrypt_block`].
///
/// # Errors
///
/// Returns [`Error::Size`] if `key.len() != 32` or `ciphertext.len() !=
/// BLOCK_BYTES`.
pub fn decrypt_block(key: &[u8], ciphertext: &[u8]) -> Result<[u8; BLOCK_BYTES]> {
    require_key(key)?;
    require_block(ciphertext)?;

    let mut buf = [0u8; BLOCK_BYTES];
    buf.copy_from_slice(ciphertext);

    // CBC chaining crosses the two AES blocks that make up one 32-byte
    // value, so the two 16-byte halves must be decrypted in one pass
    // with carried chaining state, not independently.
    let mut cipher = Aes256CbcDec::new(GenericArray::from_slice(key), GenericArray::from_slice(&ZERO_IV));
    for chunk in buf.chunks_mut(AES_BLOCK_BYTES) {
        let block = GenericArray::from_mut_slice(chunk);
        cipher.decrypt_block_mut(block);
    }
    Ok(buf)
}

/// Pseudorandom generator: AES-256-CTR keyed by `key`, starting from
/// counter `index`, producing `length` bytes (or `message.len()` bytes,
/// XORed in, if `message` is supplied instead of encrypting zeroes).
///
/// # Errors
///
/// Returns [`Error::Size`] if `key.len() != 32`.
pub fn prg(key: &[u8], index: u128, length: usize, message: Option<&[u8]>) -> Result<Vec<u8>> {
    require_key(key)?;

    let mut buf = match message {
        Some(m) => m.to_vec(),
        None => vec![0u8; length],
    };

    let counter = index.to_be_bytes();
    let mut cipher = Aes256Ctr::new(GenericArray::from_slice(key), GenericArray::from_slice(&counter));
    cipher.apply_keystream(&mut buf);
    Ok(buf)
}

fn require_key(key: &[u8]) -> Result<()> {
    if key.len() != 32 {
        return Err(Error::Size {
            expected: 32,
            actual: key.len(),
        });
    }
    Ok(())
}

fn require_block(data: &[u8]) -> Result<()> {
    if data.len() != BLOCK_BYTES {
        return Err(Error::Size {
            expected: BLOCK_BYTES,
            actual: data.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> [u8; 32] {
        [0x42u8; 32]
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let msg = [7u8; BLOCK_BYTES];
        let ct = encrypt_block(&key(), &msg).unwrap();
        assert_ne!(ct, msg);
        let pt = decrypt_block(&key(), &ct).unwrap();
        assert_eq!(pt, msg);
    }

    #[test]
    fn encrypt_block_is_deterministic() {
        let msg = [9u8; BLOCK_BYTES];
        let a = encrypt_block(&key(), &msg).unwrap();
        let b = encrypt_block(&key(), &msg).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn encrypt_block_rejects_wrong_sizes() {
        assert!(encrypt_block(&[0u8; 16], &[0u8; BLOCK_BYTES]).is_err());
        assert!(encrypt_block(&key(), &[0u8; BLOCK_BYTES - 1]).is_err());
    }

    #[test]
    fn prg_is_deterministic_and_keyed() {
        let a = prg(&key(), 0, 28, None).unwrap();
        let b = prg(&key(), 0, 28, None).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 28);

        let c = prg(&key(), 1, 28, None).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn prg_xors_supplied_message() {
        let zeroes = prg(&key(), 5, 32, None).unwrap();
        let message = [0xAAu8; 32];
        let masked = prg(&key(), 5, 32, Some(&message)).unwrap();
        for i in 0..32 {
            assert_eq!(masked[i], zeroes[i] ^ message[i]);
        }
    }
}
