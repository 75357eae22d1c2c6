//! Protocol configuration.

use std::time::Duration;

use elgamal::{DEFAULT_ROUNDS, MIN_KEY_BITS};
use serde::{Deserialize, Serialize};

use crate::errors::SettingsError;

/// Default lifetime of an issued challenge.
pub const DEFAULT_CHALLENGE_TTL: Duration = Duration::from_secs(5 * 60);

/// Tunables for [`crate::Authenticator`] and [`crate::AuthClient`].
///
/// Missing fields fall back to their defaults when deserializing; the
/// challenge TTL is written as whole seconds.
///
/// ```
/// use auth::AuthSettings;
///
/// let settings = AuthSettings::default();
/// assert_eq!(settings.challenge_ttl.as_secs(), 300);
/// assert_eq!(settings.default_key_bits, 512);
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// How long an issued challenge may be answered.
    #[serde(rename = "challenge_ttl_secs", with = "duration_secs")]
    pub challenge_ttl: Duration,
    /// Modulus size used when a client generates its key pair.
    pub default_key_bits: u64,
    /// Miller-Rabin rounds used during client key generation.
    pub primality_rounds: usize,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            challenge_ttl: DEFAULT_CHALLENGE_TTL,
            default_key_bits: MIN_KEY_BITS,
            primality_rounds: DEFAULT_ROUNDS,
        }
    }
}

impl AuthSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.primality_rounds == 0 {
            return Err(SettingsError::ZeroRounds);
        }
        if self.default_key_bits < MIN_KEY_BITS {
            return Err(SettingsError::KeyTooSmall {
                bits: self.default_key_bits,
                min: MIN_KEY_BITS,
            });
        }
        Ok(())
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
