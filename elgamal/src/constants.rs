//! Constants used by the ElGamal key generator and signature engine.

/// Smallest modulus size accepted by key generation, in bits.
///
/// 512-bit keys are fast enough for tests and demos but offer no meaningful
/// security against discrete-log attacks. Production keys should use at
/// least [`RECOMMENDED_KEY_BITS`].
pub const MIN_KEY_BITS: u64 = 512;

/// Modulus size recommended for real deployments, in bits.
pub const RECOMMENDED_KEY_BITS: u64 = 2048;

/// Generator used by [`crate::GeneratorPolicy::Fixed`] unless overridden.
pub const DEFAULT_GENERATOR: u32 = 2;

/// Default cap on prime candidates drawn during key generation.
pub const DEFAULT_MAX_PRIME_ATTEMPTS: u64 = 1_000_000;

/// Cap on ephemeral key draws per signature.
///
/// A draw fails only when `gcd(k, p - 1) != 1` or `s == 0`; for a prime
/// modulus at least a third of all draws succeed, so hitting this cap
/// indicates a broken randomness source.
pub const MAX_NONCE_ATTEMPTS: u32 = 1_000;

/// Cap on draws while searching for a primitive root modulo a safe prime.
pub(crate) const MAX_GENERATOR_ATTEMPTS: u32 = 256;

/// Size of the SHA-256 message digest in bytes.
pub const DIGEST_SIZE: usize = 32;
