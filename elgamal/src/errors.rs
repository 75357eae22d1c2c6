//! Error types for ElGamal key generation, signing and key encoding.

use numtheory::NumberTheoryError;
use thiserror::Error;

/// Errors that can occur while generating keys, signing, or decoding keys.
///
/// Verification never fails with an error: malformed signatures simply do
/// not verify.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ElGamalError {
    /// The requested modulus is smaller than [`crate::MIN_KEY_BITS`].
    #[error("key size of {bits} bits is below the minimum of {min} bits")]
    KeyTooSmall { bits: u64, min: u64 },

    /// Key generation was asked to run zero Miller-Rabin rounds, which would
    /// accept composite moduli.
    #[error("primality testing needs at least one round")]
    ZeroRounds,

    /// No prime (or safe prime) was found within the configured attempt budget.
    ///
    /// This points at a configuration or entropy problem rather than misuse.
    #[error("no suitable prime found after {attempts} attempts")]
    GenerationFailed { attempts: u64 },

    /// No invertible ephemeral key producing a non-zero `s` was found.
    #[error("no usable ephemeral key after {attempts} attempts")]
    NonceExhausted { attempts: u32 },

    /// Public key parameters are outside their valid ranges.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(&'static str),

    /// A private exponent is outside `[2, p - 2]`.
    #[error("private exponent out of range")]
    InvalidPrivateKey,

    /// An exported key could not be decoded.
    #[error("malformed key encoding: {0}")]
    Decode(String),

    #[error(transparent)]
    NumberTheory(#[from] NumberTheoryError),
}

impl ElGamalError {
    /// Maps prime-search exhaustion onto [`ElGamalError::GenerationFailed`].
    pub(crate) fn from_search(err: NumberTheoryError) -> Self {
        match err {
            NumberTheoryError::PrimeNotFound { attempts } => Self::GenerationFailed { attempts },
            other => Self::NumberTheory(other),
        }
    }
}
