//! Number theory over arbitrary-precision unsigned integers.
//!
//! This crate provides unbiased random sampling, Miller-Rabin primality
//! testing, prime and safe-prime search, and modular inversion on top of
//! [`num_bigint::BigUint`]. Every randomized routine takes its randomness
//! source as an argument so callers decide between a CSPRNG and a seeded
//! generator for tests.

mod errors;
mod modular;
mod primality;
mod random;

pub use errors::NumberTheoryError;
pub use modular::{is_coprime, mod_inverse};
pub use num_bigint::BigUint;
pub use primality::{is_probably_prime, PrimeSearch, DEFAULT_ROUNDS, MIN_PRIME_BITS};
pub use random::{random_below, random_in_range, random_odd_with_bits};
