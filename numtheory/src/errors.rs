//! Error types for number-theoretic routines.

use thiserror::Error;

/// Errors returned by sampling and prime search.
#[derive(Debug, Error, Copy, Clone, PartialEq, Eq)]
pub enum NumberTheoryError {
    /// A sampling range contained no integers.
    #[error("sampling range is empty")]
    EmptyRange,
    /// The requested bit length cannot hold a useful prime.
    #[error("bit length {bits} is below the minimum of {min}")]
    BitLengthTooSmall { bits: u64, min: u64 },
    /// The attempt budget ran out before a prime was accepted.
    #[error("no prime found after {attempts} candidates")]
    PrimeNotFound { attempts: u64 },
}
