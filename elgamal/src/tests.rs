use super::*;
use crate::keys::primitive_root;
use num_traits::{One, Zero};
use numtheory::PrimeSearch;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::OnceLock;

fn shared_key_pair() -> &'static KeyPair {
    static KEY: OnceLock<KeyPair> = OnceLock::new();
    KEY.get_or_init(|| {
        let mut rng = StdRng::seed_from_u64(42);
        KeyPair::generate(&mut rng, MIN_KEY_BITS).expect("keygen")
    })
}

fn other_key_pair() -> &'static KeyPair {
    static KEY: OnceLock<KeyPair> = OnceLock::new();
    KEY.get_or_init(|| {
        let mut rng = StdRng::seed_from_u64(4242);
        KeyPair::generate(&mut rng, MIN_KEY_BITS).expect("keygen")
    })
}

/// Textbook parameters: p = 2579, g = 2, x = 765.
fn toy_key_pair() -> KeyPair {
    KeyPair::from_secret(
        BigUint::from(2579u32),
        BigUint::from(2u32),
        BigUint::from(765u32),
    )
    .expect("toy key")
}

#[test]
fn test_generated_key_invariants() {
    let kp = shared_key_pair();
    let pk = kp.public_key();
    let mut rng = StdRng::seed_from_u64(1);

    assert_eq!(pk.bits(), MIN_KEY_BITS);
    assert!(numtheory::is_probably_prime(pk.modulus(), 20, &mut rng));
    assert_eq!(pk.generator(), &BigUint::from(DEFAULT_GENERATOR));
    assert!(pk.public_value() < pk.modulus());
}

#[test]
fn test_sign_verify() {
    let mut rng = StdRng::seed_from_u64(42);
    let kp = shared_key_pair();
    let msg = b"challenge nonce";

    let sig = kp.sign(&mut rng, msg).expect("sign");
    assert!(kp.public_key().verify(msg, &sig));
    assert!(sig.r < *kp.public_key().modulus());
    assert!(sig.s < kp.public_key().modulus() - 1u32);
}

#[test]
fn test_sign_verify_many_messages() {
    let mut rng = StdRng::seed_from_u64(5);
    let kp = shared_key_pair();
    for len in [0usize, 1, 31, 32, 33, 1000] {
        let msg: Vec<u8> = (0..len).map(|i| (i * 7) as u8).collect();
        let sig = kp.sign(&mut rng, &msg).expect("sign");
        assert!(kp.verify(&msg, &sig), "length {len}");
    }
}

#[test]
fn test_signing_is_randomized() {
    let mut rng = StdRng::seed_from_u64(6);
    let kp = shared_key_pair();
    let msg = b"same message";

    let first = kp.sign(&mut rng, msg).expect("sign");
    let second = kp.sign(&mut rng, msg).expect("sign");
    assert_ne!(first, second);
    assert!(kp.verify(msg, &first));
    assert!(kp.verify(msg, &second));
}

#[test]
fn test_verify_rejects_wrong_message() {
    let mut rng = StdRng::seed_from_u64(42);
    let kp = shared_key_pair();
    let msg = b"transfer 10 coins".to_vec();
    let sig = kp.sign(&mut rng, &msg).expect("sign");

    for (byte, bit) in [(0usize, 0u8), (5, 3), (16, 7)] {
        let mut tampered = msg.clone();
        tampered[byte] ^= 1 << bit;
        assert!(!kp.verify(&tampered, &sig));
    }
}

#[test]
fn test_verify_rejects_tampered_signature() {
    let mut rng = StdRng::seed_from_u64(43);
    let kp = shared_key_pair();
    let p = kp.public_key().modulus();
    let msg = b"tamper me";
    let sig = kp.sign(&mut rng, msg).expect("sign");

    let bumped_r = Signature {
        r: (&sig.r + 1u32) % p,
        s: sig.s.clone(),
    };
    let bumped_s = Signature {
        r: sig.r.clone(),
        s: (&sig.s + 1u32) % p,
    };
    assert!(!kp.verify(msg, &bumped_r));
    assert!(!kp.verify(msg, &bumped_s));
}

#[test]
fn test_verify_rejects_out_of_range_fields() {
    let mut rng = StdRng::seed_from_u64(44);
    let kp = shared_key_pair();
    let p = kp.public_key().modulus().clone();
    let msg = b"range";
    let sig = kp.sign(&mut rng, msg).expect("sign");

    let zero_r = Signature {
        r: BigUint::zero(),
        s: sig.s.clone(),
    };
    let big_r = Signature {
        r: &sig.r + &p,
        s: sig.s.clone(),
    };
    let big_s = Signature {
        r: sig.r.clone(),
        s: &sig.s + (&p - 1u32),
    };
    assert!(!kp.verify(msg, &zero_r));
    assert!(!kp.verify(msg, &big_r));
    assert!(!kp.verify(msg, &big_s));
}

#[test]
fn test_verify_rejects_wrong_key() {
    let mut rng = StdRng::seed_from_u64(42);
    let msg = b"cross key";
    let sig = shared_key_pair().sign(&mut rng, msg).expect("sign");

    assert!(!other_key_pair().verify(msg, &sig));
}

#[test]
fn test_toy_parameters_round_trip() {
    let mut rng = StdRng::seed_from_u64(8);
    let kp = toy_key_pair();
    assert_eq!(
        kp.public_key().public_value(),
        &BigUint::from(2u32).modpow(&BigUint::from(765u32), &BigUint::from(2579u32))
    );
    for i in 0u8..20 {
        let sig = kp.sign(&mut rng, &[i]).expect("sign");
        assert!(kp.verify(&[i], &sig));
    }
}

#[test]
fn test_private_key_sign_with_explicit_public_key() {
    let mut rng = StdRng::seed_from_u64(9);
    let kp = shared_key_pair();
    let sig = kp
        .private_key()
        .sign(&mut rng, kp.public_key(), b"detached")
        .expect("sign");
    assert!(kp.public_key().verify(b"detached", &sig));
}

#[test]
fn test_private_key_debug_is_redacted() {
    let rendered = format!("{:?}", toy_key_pair());
    assert!(rendered.contains("<redacted>"));
    assert!(!rendered.contains("765"));
}

#[test]
fn test_digest_is_little_endian_sha256() {
    // SHA-256("abc") = ba7816bf...f20015ad
    let h = message_digest(b"abc");
    assert_eq!(h.to_bytes_le()[0], 0xba);
    assert!(h.bits() <= 256);
}

#[test]
fn test_generate_rejects_small_keys() {
    let mut rng = StdRng::seed_from_u64(10);
    assert_eq!(
        KeyPair::generate(&mut rng, 256).unwrap_err(),
        ElGamalError::KeyTooSmall {
            bits: 256,
            min: MIN_KEY_BITS
        }
    );
}

#[test]
fn test_generate_rejects_zero_rounds() {
    let mut rng = StdRng::seed_from_u64(14);
    let config = KeyGenConfig::new(MIN_KEY_BITS).with_rounds(0);
    assert_eq!(
        KeyPair::generate_with(&mut rng, &config).unwrap_err(),
        ElGamalError::ZeroRounds
    );
}

#[test]
fn test_generate_reports_exhausted_search() {
    let mut rng = StdRng::seed_from_u64(11);
    let config = KeyGenConfig::new(MIN_KEY_BITS).with_max_attempts(Some(1));
    // A single random odd 512-bit candidate is almost never prime.
    let mut failures = 0;
    for _ in 0..5 {
        if let Err(err) = KeyPair::generate_with(&mut rng, &config) {
            assert_eq!(err, ElGamalError::GenerationFailed { attempts: 1 });
            failures += 1;
        }
    }
    assert!(failures >= 3);
}

#[test]
fn test_from_secret_rejects_out_of_range_exponent() {
    let p = BigUint::from(2579u32);
    let g = BigUint::from(2u32);
    assert_eq!(
        KeyPair::from_secret(p.clone(), g.clone(), BigUint::one()).unwrap_err(),
        ElGamalError::InvalidPrivateKey
    );
    assert_eq!(
        KeyPair::from_secret(p.clone(), g, &p - 1u32).unwrap_err(),
        ElGamalError::InvalidPrivateKey
    );
}

#[test]
fn test_public_key_rejects_bad_parts() {
    let p = BigUint::from(2579u32);
    assert!(PublicKey::from_parts(BigUint::from(2580u32), 2u32.into(), 2u32.into()).is_err());
    assert!(PublicKey::from_parts(p.clone(), 1u32.into(), 2u32.into()).is_err());
    assert!(PublicKey::from_parts(p.clone(), 2u32.into(), BigUint::zero()).is_err());
    assert!(PublicKey::from_parts(p.clone(), 2u32.into(), p.clone()).is_err());
}

#[test]
fn test_primitive_root_over_safe_prime() {
    let mut rng = StdRng::seed_from_u64(12);
    let (p, q) = PrimeSearch::new(40).find_safe_prime(&mut rng).expect("safe prime");
    let g = primitive_root(&mut rng, &p, &q).expect("generator");

    assert!(!g.modpow(&q, &p).is_one());
    assert!(!g.modpow(&BigUint::from(2u32), &p).is_one());
    assert!(g.modpow(&(&p - 1u32), &p).is_one());
}

#[test]
fn test_public_key_serde_validates() {
    let pk = toy_key_pair().public_key().clone();
    let bytes = bincode::serialize(&pk).expect("serialize");
    let back: PublicKey = bincode::deserialize(&bytes).expect("deserialize");
    assert_eq!(back, pk);

    let forged = bincode::serialize(&(
        BigUint::from(2579u32),
        BigUint::from(2578u32),
        BigUint::from(2u32),
    ))
    .expect("serialize");
    assert!(bincode::deserialize::<PublicKey>(&forged).is_err());
}

#[test]
fn test_signature_survives_export() {
    let mut rng = StdRng::seed_from_u64(13);
    let kp = shared_key_pair();
    let sig = kp.sign(&mut rng, b"exported").expect("sign");

    let exported = SerializedPublicKey::export(kp.public_key(), Encoding::Hex);
    let imported = exported.import(Encoding::Hex).expect("import");
    assert!(imported.verify(b"exported", &sig));
}
