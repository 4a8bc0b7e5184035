//! Server-side operations: a pure match predicate, and the in-memory
//! index and aggregates built on top of it.
//!
//! None of this module ever sees a secret key. `match_field` only needs
//! the query's `word_key`, which the client deliberately discloses; the
//! Paillier aggregates only need the public key.

use edb_primitives::{prf, xor, LEFT_BYTES, MATCH_BYTES};
use num_bigint_dig::BigInt;
use rand::{CryptoRng, RngCore};

use crate::wire::try_decode_pair;

/// Return `true` if `field` (an encrypted value) was produced from the
/// same preword as `query` under the same keys.
///
/// Any decode failure or length mismatch is treated as a non-match rather
/// than an error, so a query against a corrupt row degrades to "no match"
/// instead of aborting — a deliberate choice so one bad row can't break a
/// whole search.
#[must_use]
pub fn match_field(field: &str, query: &str) -> bool {
    let Some((_, ciphertext)) = try_decode_pair(field) else {
        return false;
    };
    let Some((preword, word_key)) = try_decode_pair(query) else {
        return false;
    };

    let Ok(block) = xor(&ciphertext, &[&preword]) else {
        return false;
    };
    let prefix = &block[..LEFT_BYTES];
    let suffix = &block[LEFT_BYTES..];
    let candidate = prf(&word_key, prefix, Some(MATCH_BYTES));
    candidate == suffix
}

/// A storage-agnostic, in-memory sequence of encrypted fields that can be
/// searched by query token.
///
/// This does not replace a record store — it's the same convenience the
/// original server kept alongside its persistence layer, useful for
/// testing the match predicate or for a single encrypted column that
/// doesn't warrant its own table.
#[derive(Clone, Debug, Default)]
pub struct Index {
    fields: Vec<String>,
}

impl Index {
    /// An empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an encrypted field.
    pub fn push(&mut self, field: impl Into<String>) {
        self.fields.push(field.into());
    }

    /// Indices of every field matching `query`.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<usize> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, field)| match_field(field, query))
            .map(|(index, _)| index)
            .collect()
    }

    /// Number of fields in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the index holds no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Number of fields in `index` matching `query`.
#[must_use]
pub fn count(index: &Index, query: &str) -> usize {
    index.search(query).len()
}

/// Fraction of matches for `first` that also match `second`: `|matches(first
/// ∧ second)| / |matches(first)|`, or `0` if `first` has no matches.
#[must_use]
pub fn correlate(index: &Index, first: &str, second: &str) -> f64 {
    let first_matches = index.search(first);
    if first_matches.is_empty() {
        return 0.0;
    }
    let second_matches: std::collections::HashSet<usize> = index.search(second).into_iter().collect();
    let both = first_matches
        .iter()
        .filter(|i| second_matches.contains(i))
        .count();
    #[allow(clippy::cast_precision_loss)]
    {
        both as f64 / first_matches.len() as f64
    }
}

/// Sum a set of Paillier ciphertexts into one ciphertext decrypting to
/// their plaintext sum.
///
/// # Errors
///
/// Propagates [`edb_paillier::Error::OutOfRange`] if any ciphertext is
/// outside `[0, n^2)`, or fails if `ciphertexts` is empty.
pub fn sum(
    public_key: &edb_paillier::PublicKey,
    ciphertexts: &[BigInt],
) -> Result<BigInt, edb_paillier::Error> {
    let mut iter = ciphertexts.iter();
    let first = iter.next().ok_or(edb_paillier::Error::EmptyAggregate)?;
    let mut total = first.clone();
    for c in iter {
        total = edb_paillier::add(public_key, &total, c)?;
    }
    Ok(total)
}

/// Blinded average over a set of Paillier ciphertexts: see
/// [`edb_paillier::average`].
///
/// # Errors
///
/// Propagates [`edb_paillier::Error::EmptyAggregate`] and
/// [`edb_paillier::Error::OutOfRange`].
pub fn average<R: CryptoRng + RngCore>(
    rng: &mut R,
    public_key: &edb_paillier::PublicKey,
    ciphertexts: &[BigInt],
) -> Result<(BigInt, BigInt), edb_paillier::Error> {
    edb_paillier::average(rng, public_key, ciphertexts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Client;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn client() -> Client {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        Client::generate(&mut rng).unwrap()
    }

    #[test]
    fn match_hit_and_miss() {
        let c = client();
        let words = [&b"apple"[..], b"banana", b"strawberry"];
        let fields: Vec<String> = words.iter().map(|w| c.encrypt(w).unwrap()).collect();
        let query = c.query(b"banana").unwrap();

        assert!(match_field(&fields[1], &query));
        assert!(!match_field(&fields[0], &query));
        assert!(!match_field(&fields[2], &query));
    }

    #[test]
    fn malformed_field_is_a_non_match_not_an_error() {
        let c = client();
        let query = c.query(b"banana").unwrap();
        assert!(!match_field("not base64 at all!!", &query));
        assert!(!match_field("", &query));
    }

    #[test]
    fn search_and_count() {
        let c = client();
        let mut index = Index::new();
        for word in [&b"src1"[..], b"src1", b"src2"] {
            index.push(c.encrypt(word).unwrap());
        }
        let query = c.query(b"src1").unwrap();
        assert_eq!(count(&index, &query), 2);
        assert_eq!(index.search(&query), vec![0, 1]);
    }

    #[test]
    fn correlate_with_no_matches_is_zero() {
        let c = client();
        let mut index = Index::new();
        index.push(c.encrypt(b"src1").unwrap());
        let missing = c.query(b"nonexistent").unwrap();
        let other = c.query(b"src1").unwrap();
        assert_eq!(correlate(&index, &missing, &other), 0.0);
    }

    #[test]
    fn paillier_sum_and_average_through_server() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let key = edb_paillier::keygen(&mut rng, 256).unwrap();
        let values = [3i64, 4, 5];
        let cts: Vec<BigInt> = values
            .iter()
            .map(|&v| edb_paillier::encrypt(&mut rng, key.public_key(), &BigInt::from(v)).unwrap())
            .collect();

        let total = sum(key.public_key(), &cts).unwrap();
        assert_eq!(edb_paillier::decrypt(&key, &total).unwrap(), BigInt::from(12));

        let (numerator, denominator) = average(&mut rng, key.public_key(), &cts).unwrap();
        let decrypted_numerator = edb_paillier::decrypt(&key, &numerator).unwrap();
        assert_eq!(
            decrypted_numerator * BigInt::from(values.len() as i64),
            &denominator * BigInt::from(values.iter().sum::<i64>())
        );
    }
}
