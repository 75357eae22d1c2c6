//! Export and import of public keys.
//!
//! A public key is exported as three independent strings, one per field
//! `(p, g, y)`. Each string is the big-endian unsigned byte representation of
//! the field, base-64 (standard alphabet) or hex encoded. Private keys have
//! no export path.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::errors::ElGamalError;
use crate::keys::PublicKey;

/// Text encoding applied to each exported field.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    #[default]
    Base64,
    Hex,
}

/// A public key in exported form.
///
/// # Example
///
/// ```
/// use elgamal::{Encoding, KeyPair, SerializedPublicKey};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut rng = StdRng::seed_from_u64(3);
/// let key_pair = KeyPair::generate(&mut rng, 512).expect("key generation");
///
/// let exported = SerializedPublicKey::export(key_pair.public_key(), Encoding::Base64);
/// let json = exported.to_json().expect("json");
/// let imported = SerializedPublicKey::from_json(&json)
///     .and_then(|s| s.import(Encoding::Base64))
///     .expect("import");
/// assert_eq!(&imported, key_pair.public_key());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedPublicKey {
    #[serde(rename = "P")]
    pub p: String,
    #[serde(rename = "G")]
    pub g: String,
    #[serde(rename = "Y")]
    pub y: String,
}

impl SerializedPublicKey {
    pub fn export(key: &PublicKey, encoding: Encoding) -> Self {
        Self {
            p: encode_field(key.modulus(), encoding),
            g: encode_field(key.generator(), encoding),
            y: encode_field(key.public_value(), encoding),
        }
    }

    /// Decodes every field and validates the resulting key.
    pub fn import(&self, encoding: Encoding) -> Result<PublicKey, ElGamalError> {
        PublicKey::from_parts(
            decode_field(&self.p, "P", encoding)?,
            decode_field(&self.g, "G", encoding)?,
            decode_field(&self.y, "Y", encoding)?,
        )
    }

    pub fn to_json(&self) -> Result<String, ElGamalError> {
        serde_json::to_string_pretty(self).map_err(|e| ElGamalError::Decode(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, ElGamalError> {
        serde_json::from_str(json).map_err(|e| ElGamalError::Decode(e.to_string()))
    }
}

fn encode_field(value: &BigUint, encoding: Encoding) -> String {
    let bytes = value.to_bytes_be();
    match encoding {
        Encoding::Base64 => STANDARD.encode(bytes),
        Encoding::Hex => hex::encode(bytes),
    }
}

fn decode_field(text: &str, name: &str, encoding: Encoding) -> Result<BigUint, ElGamalError> {
    let bytes = match encoding {
        Encoding::Base64 => STANDARD
            .decode(text)
            .map_err(|e| ElGamalError::Decode(format!("field {name}: {e}")))?,
        Encoding::Hex => {
            hex::decode(text).map_err(|e| ElGamalError::Decode(format!("field {name}: {e}")))?
        }
    };
    if bytes.is_empty() {
        return Err(ElGamalError::Decode(format!("field {name} is empty")));
    }
    Ok(BigUint::from_bytes_be(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_key() -> PublicKey {
        // p = 2579, g = 2, y = 2^765 mod 2579
        let p = BigUint::from(2579u32);
        let g = BigUint::from(2u32);
        let y = g.modpow(&BigUint::from(765u32), &p);
        PublicKey::from_parts(p, g, y).unwrap()
    }

    #[test]
    fn test_fields_are_big_endian() {
        let exported = SerializedPublicKey::export(&toy_key(), Encoding::Hex);
        assert_eq!(exported.p, "0a13");
        assert_eq!(exported.g, "02");
    }

    #[test]
    fn test_base64_matches_hex_bytes() {
        let key = toy_key();
        let b64 = SerializedPublicKey::export(&key, Encoding::Base64);
        assert_eq!(b64.p, STANDARD.encode([0x0au8, 0x13]));
        assert_eq!(b64.import(Encoding::Base64).unwrap(), key);
    }

    #[test]
    fn test_json_uses_uppercase_names() {
        let json = SerializedPublicKey::export(&toy_key(), Encoding::Base64)
            .to_json()
            .unwrap();
        assert!(json.contains("\"P\""));
        assert!(json.contains("\"G\""));
        assert!(json.contains("\"Y\""));
    }

    #[test]
    fn test_import_rejects_garbage() {
        let bad = SerializedPublicKey {
            p: "not base64!".into(),
            g: "Ag==".into(),
            y: "Ag==".into(),
        };
        assert!(matches!(
            bad.import(Encoding::Base64),
            Err(ElGamalError::Decode(_))
        ));
    }

    #[test]
    fn test_import_rejects_empty_field() {
        let bad = SerializedPublicKey {
            p: String::new(),
            g: "02".into(),
            y: "02".into(),
        };
        assert!(matches!(bad.import(Encoding::Hex), Err(ElGamalError::Decode(_))));
    }

    #[test]
    fn test_import_validates_ranges() {
        // g = p - 1 is outside [2, p - 2]
        let bad = SerializedPublicKey {
            p: "0a13".into(),
            g: "0a12".into(),
            y: "02".into(),
        };
        assert_eq!(
            bad.import(Encoding::Hex),
            Err(ElGamalError::InvalidPublicKey("generator out of range"))
        );
    }
}
