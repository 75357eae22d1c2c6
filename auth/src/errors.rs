//! Machine-readable failure codes for registration and authentication.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a registration was refused.
#[derive(Debug, Error, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegistrationError {
    #[error("Username cannot be empty")]
    UsernameEmpty,
    #[error("Password cannot be empty")]
    PasswordEmpty,
    #[error("Username already exists")]
    UserExists,
    /// The store rejected the insert after the existence check passed,
    /// typically because a concurrent registration claimed the name first.
    #[error("Registration failed")]
    PersistFailed,
}

impl RegistrationError {
    /// Stable numeric code for callers that branch on integers.
    pub fn code(self) -> u16 {
        match self {
            RegistrationError::UsernameEmpty => 1,
            RegistrationError::PasswordEmpty => 2,
            RegistrationError::UserExists => 3,
            RegistrationError::PersistFailed => 4,
        }
    }
}

/// Why an authentication attempt failed.
#[derive(Debug, Error, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthError {
    #[error("Invalid username")]
    InvalidUsername,
    #[error("Invalid challenge")]
    InvalidChallenge,
    #[error("Challenge expired")]
    ChallengeExpired,
    #[error("User not found")]
    UserNotFound,
    #[error("Invalid signature")]
    InvalidSignature,
}

impl AuthError {
    /// Stable numeric code for callers that branch on integers.
    pub fn code(self) -> u16 {
        match self {
            AuthError::InvalidUsername => 1,
            AuthError::InvalidChallenge => 2,
            AuthError::ChallengeExpired => 3,
            AuthError::UserNotFound => 4,
            AuthError::InvalidSignature => 5,
        }
    }
}

/// Rejected [`crate::AuthSettings`].
#[derive(Debug, Error, Copy, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("primality rounds must be at least 1")]
    ZeroRounds,
    #[error("default key size of {bits} bits is below the minimum of {min} bits")]
    KeyTooSmall { bits: u64, min: u64 },
}

/// Failures on the client side of a login, before the server is involved.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("no keys available on client")]
    MissingKeys,
    #[error("server refused to issue a challenge")]
    ChallengeRefused,
    #[error("invalid settings: {0}")]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Crypto(#[from] elgamal::ElGamalError),
}
