//! Pluggable password credential policy.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Turns a password into a stored credential and checks candidates against it.
///
/// The protocol never inspects stored credentials itself; swapping in a
/// slow KDF only requires another implementation of this trait.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> String;

    fn verify(&self, stored: &str, supplied: &str) -> bool;
}

/// Unsalted SHA-256, base-64 encoded. Fast and compatible, not hardened
/// against offline guessing.
#[derive(Copy, Clone, Debug, Default)]
pub struct Sha256Credentials;

impl CredentialHasher for Sha256Credentials {
    fn hash(&self, password: &str) -> String {
        STANDARD.encode(Sha256::digest(password.as_bytes()))
    }

    fn verify(&self, stored: &str, supplied: &str) -> bool {
        let candidate = self.hash(supplied);
        stored.as_bytes().ct_eq(candidate.as_bytes()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_base64_sha256() {
        // SHA-256("password")
        assert_eq!(
            Sha256Credentials.hash("password"),
            "XohImNooBHFR0OVvjcYpJ3NgPQ1qq73WKhHvch0VQtg="
        );
    }

    #[test]
    fn test_verify() {
        let stored = Sha256Credentials.hash("correct horse");
        assert!(Sha256Credentials.verify(&stored, "correct horse"));
        assert!(!Sha256Credentials.verify(&stored, "correct horse "));
        assert!(!Sha256Credentials.verify("", "correct horse"));
    }
}
