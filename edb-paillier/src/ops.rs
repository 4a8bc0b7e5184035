//! Encryption, decryption, and the homomorphic aggregate operators.

use num_bigint_dig::{BigInt, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};

use crate::error::{Error, Result};
use crate::key::{PrivateKey, PublicKey};

/// Encrypt plaintext `x` under `pub_key`, drawing a fresh randomizer from
/// `rng` for this ciphertext.
///
/// This implementation does not verify `gcd(r, n) = 1`; the probability
/// of a randomizer violating this is negligible for a modulus this size,
/// and the original implementation this core is grounded on preserves
/// that behavior rather than resampling.
///
/// # Errors
///
/// Returns [`Error::OutOfRange`] if `x` is not in `[0, n)`.
pub fn encrypt<R: CryptoRng + RngCore>(
    rng: &mut R,
    pub_key: &PublicKey,
    x: &BigInt,
) -> Result<BigInt> {
    if x.is_negative() || x >= pub_key.n() {
        return Err(Error::OutOfRange { what: "plaintext" });
    }

    let n_square = pub_key.n_square();
    let r = rng.gen_bigint_range(&BigInt::zero(), pub_key.n());

    let gx = pub_key.g().modpow(x, &n_square);
    let rn = r.modpow(pub_key.n(), &n_square);
    Ok((gx * rn) % n_square)
}

/// Decrypt ciphertext `c` under `priv_key`.
///
/// # Errors
///
/// Returns [`Error::OutOfRange`] if `c` is not in `[0, n^2)`, or
/// [`Error::DecryptionSanityFailed`] if the `L` reduction does not yield
/// a value congruent to `0 mod n`'s quotient cleanly (indicating key or
/// ciphertext corruption).
pub fn decrypt(priv_key: &PrivateKey, c: &BigInt) -> Result<BigInt> {
    let n = priv_key.public_key().n();
    let n_square = priv_key.public_key().n_square();

    if c.is_negative() || c >= &n_square {
        return Err(Error::OutOfRange { what: "ciphertext" });
    }

    let lambda = priv_key.lambda();
    let mu = priv_key.mu();

    let u = c.modpow(&lambda, &n_square);
    let l = l_function(&u, n)?;
    Ok((l * mu) % n)
}

/// `L(u) = (u - 1) / n`, defined only for `u` congruent to `1 mod n`.
fn l_function(u: &BigInt, n: &BigInt) -> Result<BigInt> {
    let numerator = u - BigInt::one();
    if !numerator.is_multiple_of(n) {
        return Err(Error::DecryptionSanityFailed);
    }
    Ok(numerator / n)
}

/// Combine two ciphertexts into one decrypting to the sum of their
/// plaintexts: `c1 * c2 mod n^2`.
///
/// # Errors
///
/// Returns [`Error::OutOfRange`] if either ciphertext is outside `[0,
/// n^2)`.
pub fn add(pub_key: &PublicKey, c1: &BigInt, c2: &BigInt) -> Result<BigInt> {
    let n_square = pub_key.n_square();
    for c in [c1, c2] {
        if c.is_negative() || c >= &n_square {
            return Err(Error::OutOfRange { what: "ciphertext" });
        }
    }
    Ok((c1 * c2) % n_square)
}

/// Aggregate a slice of ciphertexts `[c_1, ..., c_k]`, each encrypting one
/// summand, into a blinded `(numerator, denominator)` pair such that
/// `Dec(numerator) / denominator == mean of the plaintexts`.
///
/// The blinding scalar `kappa` is drawn uniformly from `[1, floor(sqrt(n)))`
/// and applied to both the aggregated ciphertext (by exponentiation) and
/// the count (by multiplication), which preserves the ratio while hiding
/// the individual count from whoever eventually decrypts the numerator.
///
/// # Errors
///
/// Returns [`Error::EmptyAggregate`] if `ciphertexts` is empty, or
/// [`Error::OutOfRange`] if any ciphertext is outside `[0, n^2)`.
pub fn average<R: CryptoRng + RngCore>(
    rng: &mut R,
    pub_key: &PublicKey,
    ciphertexts: &[BigInt],
) -> Result<(BigInt, BigInt)> {
    if ciphertexts.is_empty() {
        return Err(Error::EmptyAggregate);
    }

    let n_square = pub_key.n_square();
    let mut total = BigInt::one();
    for c in ciphertexts {
        if c.is_negative() || c >= &n_square {
            return Err(Error::OutOfRange { what: "ciphertext" });
        }
        total = (total * c) % &n_square;
    }

    let sqrt_n = pub_key.n().sqrt();
    let kappa_bound = if sqrt_n > BigInt::one() {
        sqrt_n
    } else {
        BigInt::from(2)
    };
    let kappa = rng.gen_bigint_range(&BigInt::one(), &kappa_bound);

    let numerator = total.modpow(&kappa, &n_square);
    let denominator = BigInt::from(ciphertexts.len() as u64) * &kappa;

    Ok((numerator, denominator))
}
