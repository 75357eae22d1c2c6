//! ElGamal digital signatures over a prime field.
//!
//! This library implements:
//! - Key generation: a random prime modulus `p`, a generator `g`, a secret
//!   exponent `x` and the public value `y = g^x mod p`
//! - Signing and verification of arbitrary byte messages, hashed with SHA-256
//! - Export and import of public keys as base-64 or hex encoded fields
//!
//! # Example
//!
//! ```
//! use elgamal::{KeyPair, PublicKey};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let key_pair = KeyPair::generate(&mut rng, 512).expect("key generation");
//!
//! let message = b"hello elgamal";
//! let signature = key_pair.sign(&mut rng, message).expect("signing failed");
//!
//! let public_key = PublicKey::from(&key_pair);
//! assert!(public_key.verify(message, &signature));
//! assert!(!public_key.verify(b"hello elgamal!", &signature));
//! ```
//!
//! # Security Considerations
//!
//! - Always sign with a cryptographically secure random number generator;
//!   every signature draws a fresh ephemeral key and reusing one leaks `x`
//! - 512-bit moduli are accepted for tests and demos only; use 2048 bits or more
//! - The default [`GeneratorPolicy::Fixed`] does not check the order of `g`;
//!   use [`GeneratorPolicy::SafePrime`] when a primitive root is required

mod codec;
mod constants;
mod errors;
mod keys;
mod signatures;

#[cfg(test)]
mod tests;

pub use codec::{Encoding, SerializedPublicKey};
pub use constants::{
    DEFAULT_GENERATOR, DEFAULT_MAX_PRIME_ATTEMPTS, DIGEST_SIZE, MAX_NONCE_ATTEMPTS, MIN_KEY_BITS,
    RECOMMENDED_KEY_BITS,
};
pub use errors::ElGamalError;
pub use keys::{GeneratorPolicy, KeyGenConfig, KeyPair, PrivateKey, PublicKey};
pub use num_bigint::BigUint;
pub use numtheory::DEFAULT_ROUNDS;
pub use signatures::{Signature, message_digest};
