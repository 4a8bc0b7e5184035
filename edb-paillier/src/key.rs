//! Paillier key generation and the public/private key types.

use num_bigint_dig::{BigInt, ModInverse, RandPrime, Sign};
use num_integer::Integer;
use num_traits::One;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::error::{Error, Result};

/// Default modulus width in bits, per the external interface's
/// `PAILLIER_BITS` constant.
pub const DEFAULT_BITS: usize = 512;

/// The public half of a Paillier key pair: the modulus `n` and generator
/// `g = n + 1`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PublicKey {
    pub(crate) n: BigInt,
    pub(crate) g: BigInt,
}

impl PublicKey {
    /// The modulus `n`.
    #[must_use]
    pub fn n(&self) -> &BigInt {
        &self.n
    }

    /// The generator `g` (always `n + 1` for keys produced by
    /// [`keygen`]).
    #[must_use]
    pub fn g(&self) -> &BigInt {
        &self.g
    }

    /// `n^2`, the modulus ciphertexts live under.
    #[must_use]
    pub fn n_square(&self) -> BigInt {
        &self.n * &self.n
    }
}

/// Bytes of a secret big integer, zeroized on drop.
///
/// `BigInt` itself doesn't implement `Zeroize`, so the trapdoor
/// components are kept as their big-endian byte representation between
/// uses and reconstituted on demand, the same indirection
/// `tofn`'s `SecretNumber` wrapper uses around its own bignum type.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
struct SecretBytes(Vec<u8>);

impl SecretBytes {
    fn from_bigint(value: &BigInt) -> Self {
        let (_, bytes) = value.to_bytes_be();
        Self(bytes)
    }

    fn to_bigint(&self) -> BigInt {
        BigInt::from_bytes_be(Sign::Plus, &self.0)
    }
}

impl std::fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretBytes(..)")
    }
}

/// The private half of a Paillier key pair: the public key plus the
/// Carmichael-derived trapdoor `(lambda, mu)`.
#[derive(Clone, Debug)]
pub struct PrivateKey {
    public: PublicKey,
    lambda: SecretBytes,
    mu: SecretBytes,
}

impl PrivateKey {
    /// The public key corresponding to this private key.
    #[must_use]
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// Reassemble a private key from its four raw components, e.g. when
    /// loading one back from a keyfile.
    ///
    /// This performs no primality or consistency checking; a tampered
    /// `(n, g, lambda, mu)` tuple will simply fail to decrypt correctly
    /// rather than being rejected up front.
    #[must_use]
    pub fn from_parts(n: BigInt, g: BigInt, lambda: BigInt, mu: BigInt) -> Self {
        Self {
            public: PublicKey { n, g },
            lambda: SecretBytes::from_bigint(&lambda),
            mu: SecretBytes::from_bigint(&mu),
        }
    }

    pub(crate) fn lambda(&self) -> BigInt {
        self.lambda.to_bigint()
    }

    pub(crate) fn mu(&self) -> BigInt {
        self.mu.to_bigint()
    }

    /// The `lambda` trapdoor component, for serialization.
    #[must_use]
    pub fn lambda_component(&self) -> BigInt {
        self.lambda.to_bigint()
    }

    /// The `mu` trapdoor component, for serialization.
    #[must_use]
    pub fn mu_component(&self) -> BigInt {
        self.mu.to_bigint()
    }
}

/// Generate a Paillier key pair with an `n` of `bits` bits.
///
/// Draws two probable primes of `bits / 2` bits each so that their
/// product `n` has `bits` bits — the canonical convention adopted here
/// per the documented choice between "bits per prime" and "bits of the
/// modulus".
///
/// # Errors
///
/// Returns [`Error::NoModularInverse`] if `gcd(lambda, n) != 1`; for
/// primes drawn from the CSPRNG this has negligible probability but must
/// still be handled.
pub fn keygen<R: CryptoRng + RngCore>(rng: &mut R, bits: usize) -> Result<PrivateKey> {
    let prime_bits = bits / 2;

    let p: BigInt = rng.gen_prime(prime_bits).into();
    let mut q: BigInt = rng.gen_prime(prime_bits).into();
    while q == p {
        q = rng.gen_prime(prime_bits).into();
    }

    let n = &p * &q;
    let g = &n + BigInt::one();

    let lambda = (&p - BigInt::one()) * (&q - BigInt::one());
    let mu = lambda
        .clone()
        .mod_inverse(&n)
        .ok_or(Error::NoModularInverse)?;
    // `mod_inverse` can return a negative representative; normalize into
    // [0, n).
    let mu = ((mu % &n) + &n) % &n;

    let public = PublicKey { n, g };
    Ok(PrivateKey {
        public,
        lambda: SecretBytes::from_bigint(&lambda),
        mu: SecretBytes::from_bigint(&mu),
    })
}
