//! Concrete end-to-end scenarios and cross-crate property tests.

use std::collections::BTreeMap;

use edb_core::{build_schema, generate_keyinfo, match_field, read_keyinfo, write_keyinfo, Client, Index};
use num_bigint_dig::BigInt;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn client(seed: u64) -> Client {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    Client::generate(&mut rng).unwrap()
}

#[test]
fn s1_token_round_trip() {
    let c = client(1);
    let field = c.encrypt(b"127.0.0.1").unwrap();
    assert_eq!(c.decrypt(&field).unwrap(), b"127.0.0.1");
}

#[test]
fn s2_match_hit() {
    let c = client(2);
    let words: [&[u8]; 3] = [b"apple", b"banana", b"strawberry"];
    let fields: Vec<String> = words.iter().map(|w| c.encrypt(w).unwrap()).collect();
    let query = c.query(b"banana").unwrap();

    assert!(match_field(&fields[1], &query));
    assert!(!match_field(&fields[0], &query));
}

#[test]
fn s3_paillier_textbook_vector() {
    let n = BigInt::from(126_869);
    let g = &n + BigInt::from(1);
    let lambda = BigInt::from(126_144);
    let key = edb_paillier::PrivateKey::from_parts(n.clone(), g, lambda, {
        use num_bigint_dig::ModInverse;
        let mu = BigInt::from(126_144).mod_inverse(&n).unwrap();
        ((mu % &n) + &n) % &n
    });

    let mut rng = ChaCha20Rng::seed_from_u64(3);
    let c = edb_paillier::encrypt(&mut rng, key.public_key(), &BigInt::from(521)).unwrap();
    assert_eq!(edb_paillier::decrypt(&key, &c).unwrap(), BigInt::from(521));

    let c14 = edb_paillier::encrypt(&mut rng, key.public_key(), &BigInt::from(14)).unwrap();
    let c19 = edb_paillier::encrypt(&mut rng, key.public_key(), &BigInt::from(19)).unwrap();
    let sum_ct = edb_paillier::add(key.public_key(), &c14, &c19).unwrap();
    assert_eq!(edb_paillier::decrypt(&key, &sum_ct).unwrap(), BigInt::from(33));
}

#[test]
fn s4_keyfile_round_trip() {
    let schema = build_schema([
        ("encrypt", "block", 256),
        ("hmac", "block", 256),
        ("homomorphic", "paillier", 512),
    ])
    .unwrap();

    let mut rng = ChaCha20Rng::seed_from_u64(4);
    let bundle = generate_keyinfo(&mut rng, &schema).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keys.json");
    write_keyinfo(&bundle, &path).unwrap();
    let loaded = read_keyinfo(&path).unwrap();

    assert_eq!(bundle.block("encrypt").unwrap(), loaded.block("encrypt").unwrap());
    assert_eq!(bundle.block("hmac").unwrap(), loaded.block("hmac").unwrap());
    let a = bundle.paillier("homomorphic").unwrap();
    let b = loaded.paillier("homomorphic").unwrap();
    assert_eq!(a.public_key().n(), b.public_key().n());
    assert_eq!(a.lambda_component(), b.lambda_component());
    assert_eq!(a.mu_component(), b.mu_component());
}

#[test]
fn s5_query_count() {
    let c = client(5);
    let mut index = Index::new();
    for (source, _dest) in [("src1", "dst2"), ("src1", "dst3"), ("src2", "dst3")] {
        index.push(c.encrypt(source.as_bytes()).unwrap());
    }
    let query = c.query(b"src1").unwrap();
    assert_eq!(edb_core::count(&index, &query), 2);
}

#[test]
fn s6_malformed_field_never_errors() {
    let c = client(6);
    let query = c.query(b"anything").unwrap();
    assert!(!match_field("####not-base64####", &query));
    assert!(!match_field("QQ==", &query)); // valid base64, wrong decoded length
}

proptest! {
    #[test]
    fn prop_round_trip_token(word in proptest::collection::vec(any::<u8>(), 0..31)) {
        let c = client(100);
        let field = c.encrypt(&word).unwrap();
        prop_assert_eq!(c.decrypt(&field).unwrap(), word);
    }

    #[test]
    fn prop_preword_is_deterministic_given_word_and_key(word in proptest::collection::vec(any::<u8>(), 0..31)) {
        let c = client(101);
        prop_assert_eq!(c.preprocess(&word).unwrap(), c.preprocess(&word).unwrap());
    }

    #[test]
    fn prop_search_correctness(words in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 1..20), 1..8)) {
        let c = client(102);
        let mut index = Index::new();
        for w in &words {
            index.push(c.encrypt(w).unwrap());
        }
        for (i, w) in words.iter().enumerate() {
            let query = c.query(w).unwrap();
            let matches = index.search(&query);
            let true_positions: Vec<usize> = words
                .iter()
                .enumerate()
                .filter(|(_, other)| *other == w)
                .map(|(idx, _)| idx)
                .collect();
            prop_assert!(true_positions.iter().all(|pos| matches.contains(pos)));
            prop_assert!(matches.contains(&i));
        }
    }

    #[test]
    fn prop_paillier_homomorphism(a in 0u64..10_000, b in 0u64..10_000) {
        let mut rng = ChaCha20Rng::seed_from_u64(103);
        let key = edb_paillier::keygen(&mut rng, 256).unwrap();
        let ca = edb_paillier::encrypt(&mut rng, key.public_key(), &BigInt::from(a)).unwrap();
        let cb = edb_paillier::encrypt(&mut rng, key.public_key(), &BigInt::from(b)).unwrap();
        let sum_ct = edb_paillier::add(key.public_key(), &ca, &cb).unwrap();
        prop_assert_eq!(edb_paillier::decrypt(&key, &sum_ct).unwrap(), BigInt::from(a + b));
    }

    #[test]
    fn prop_paillier_average(values in proptest::collection::vec(0u64..1000, 1..6)) {
        let mut rng = ChaCha20Rng::seed_from_u64(104);
        let key = edb_paillier::keygen(&mut rng, 256).unwrap();
        let cts: Vec<BigInt> = values
            .iter()
            .map(|&v| edb_paillier::encrypt(&mut rng, key.public_key(), &BigInt::from(v)).unwrap())
            .collect();
        let (numerator, denominator) = edb_paillier::average(&mut rng, key.public_key(), &cts).unwrap();
        let decrypted = edb_paillier::decrypt(&key, &numerator).unwrap();
        let sum: u64 = values.iter().sum();
        prop_assert_eq!(decrypted * BigInt::from(values.len() as u64), &denominator * BigInt::from(sum));
    }
}

#[test]
fn model_and_query_batch_operations() {
    let c = client(7);
    let mut model: BTreeMap<String, Vec<u8>> = BTreeMap::new();
    model.insert("source".into(), b"10.0.0.1".to_vec());
    model.insert("dest".into(), b"10.0.0.2".to_vec());

    let encrypted = c.encrypt_model(&model, &[]).unwrap();
    let decrypted = c.decrypt_model(&encrypted, &[]).unwrap();
    assert_eq!(decrypted, model);

    let queries = c.encrypt_query(&model).unwrap();
    assert!(match_field(&encrypted["source"], &queries["source"]));
    assert!(!match_field(&encrypted["source"], &queries["dest"]));
}
