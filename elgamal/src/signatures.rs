//! Signature type, message hashing, and the ElGamal signing equations.

use log::debug;
use num_bigint::BigUint;
use num_traits::Zero;
use numtheory::{mod_inverse, random_in_range};
use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::{DIGEST_SIZE, MAX_NONCE_ATTEMPTS};
use crate::errors::ElGamalError;
use crate::keys::PublicKey;

/// An ElGamal signature `(r, s)`.
///
/// For a key `(p, g, y = g^x)` and digest `h`, a valid signature satisfies
/// `g^h == y^r * r^s (mod p)` with `r = g^k mod p` and
/// `s = (h - x * r) * k^{-1} mod (p - 1)` for a fresh ephemeral `k`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    /// The commitment `r = g^k mod p`, in `[1, p)`
    pub r: BigUint,
    /// The response `s`, in `[1, p - 1)`
    pub s: BigUint,
}

/// SHA-256 of `msg`, read as an unsigned little-endian integer in `[0, 2^256)`.
pub fn message_digest(msg: &[u8]) -> BigUint {
    let digest: [u8; DIGEST_SIZE] = Sha256::digest(msg).into();
    BigUint::from_bytes_le(&digest)
}

/// Signs the digest `h` with secret exponent `x`.
///
/// Draws `k` from `[2, p - 2]` until it is invertible modulo `p - 1` and the
/// resulting `s` is non-zero (`s = 0` would reveal `x`). Each attempt uses a
/// new `k`; reusing `k` across messages leaks the private key.
pub(crate) fn sign_digest<R: Rng + CryptoRng + ?Sized>(
    rng: &mut R,
    public: &PublicKey,
    x: &BigUint,
    h: &BigUint,
) -> Result<Signature, ElGamalError> {
    let p = public.modulus();
    let order = p - 1u32;
    let two = BigUint::from(2u32);
    let upper = p - 2u32;

    let h = h % &order;
    let mut attempt = 0u32;
    while attempt < MAX_NONCE_ATTEMPTS {
        attempt += 1;

        let k = random_in_range(rng, &two, &upper)?;
        let Some(k_inv) = mod_inverse(&k, &order) else {
            continue;
        };

        let r = public.generator().modpow(&k, p);
        let xr = (x * &r) % &order;
        let s = ((&h + &order - xr) * k_inv) % &order;
        if s.is_zero() {
            continue;
        }

        if attempt > 1 {
            debug!("ephemeral key accepted after {} draws", attempt);
        }
        return Ok(Signature { r, s });
    }

    Err(ElGamalError::NonceExhausted {
        attempts: MAX_NONCE_ATTEMPTS,
    })
}

/// Checks `g^h == y^r * r^s (mod p)` after range-checking `r` and `s`.
pub(crate) fn verify_digest(public: &PublicKey, h: &BigUint, sig: &Signature) -> bool {
    let p = public.modulus();
    if sig.r.is_zero() || &sig.r >= p {
        return false;
    }
    if sig.s >= p - 1u32 {
        return false;
    }

    let left = public.generator().modpow(h, p);
    let right = (public.public_value().modpow(&sig.r, p) * sig.r.modpow(&sig.s, p)) % p;
    left == right
}
