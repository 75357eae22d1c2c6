//! Key types and key generation for the ElGamal signature scheme.

use core::fmt;

use log::{info, warn};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use numtheory::{random_in_range, PrimeSearch, DEFAULT_ROUNDS};
use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_GENERATOR, DEFAULT_MAX_PRIME_ATTEMPTS, MAX_GENERATOR_ATTEMPTS, MIN_KEY_BITS,
    RECOMMENDED_KEY_BITS,
};
use crate::errors::ElGamalError;
use crate::signatures::{Signature, message_digest, sign_digest, verify_digest};

/// A public ElGamal key `(p, g, y)` with `y = g^x mod p`.
///
/// Public keys can only be built through [`PublicKey::from_parts`] (or key
/// generation), so every instance satisfies `p` odd and at least 5,
/// `2 <= g <= p - 2` and `1 <= y < p`. Primality of `p` is the generator's
/// responsibility and is not re-checked on import.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PublicKeyParts")]
pub struct PublicKey {
    p: BigUint,
    g: BigUint,
    y: BigUint,
}

#[derive(Deserialize)]
struct PublicKeyParts {
    p: BigUint,
    g: BigUint,
    y: BigUint,
}

impl TryFrom<PublicKeyParts> for PublicKey {
    type Error = ElGamalError;

    fn try_from(parts: PublicKeyParts) -> Result<Self, Self::Error> {
        PublicKey::from_parts(parts.p, parts.g, parts.y)
    }
}

/// The secret exponent `x`, with `2 <= x <= p - 2`.
///
/// Private keys have no serde implementation and a redacted `Debug` output,
/// so they cannot leak through serialization or logging.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    x: BigUint,
}

/// A matching public/private key pair, owned by the party that generated it.
///
/// # Example
///
/// ```
/// use elgamal::KeyPair;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let key_pair = KeyPair::generate(&mut rng, 512).expect("key generation");
/// assert_eq!(key_pair.public_key().bits(), 512);
/// ```
#[derive(Clone, Debug)]
pub struct KeyPair {
    public: PublicKey,
    private: PrivateKey,
}

/// How the generator `g` is chosen during key generation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeneratorPolicy {
    /// Use a fixed small generator over a random prime without checking its
    /// order.
    ///
    /// Signatures remain correct, but `g` may generate a subgroup much
    /// smaller than `p - 1`, which weakens the discrete-log assumption the
    /// scheme relies on. This is a reduced-security mode.
    Fixed(u32),
    /// Search for a safe prime `p = 2q + 1` and pick `g` of order `2q`
    /// (a primitive root). Much slower to generate.
    SafePrime,
}

impl Default for GeneratorPolicy {
    fn default() -> Self {
        GeneratorPolicy::Fixed(DEFAULT_GENERATOR)
    }
}

/// Key generation parameters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyGenConfig {
    /// Exact bit length of the modulus `p`.
    pub bits: u64,
    /// Miller-Rabin rounds applied to each prime candidate.
    pub rounds: usize,
    /// Cap on prime candidates; `None` searches until success.
    pub max_attempts: Option<u64>,
    pub generator: GeneratorPolicy,
}

impl KeyGenConfig {
    pub fn new(bits: u64) -> Self {
        Self {
            bits,
            rounds: DEFAULT_ROUNDS,
            max_attempts: Some(DEFAULT_MAX_PRIME_ATTEMPTS),
            generator: GeneratorPolicy::default(),
        }
    }

    pub fn with_generator(mut self, generator: GeneratorPolicy) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: Option<u64>) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

impl Default for KeyGenConfig {
    fn default() -> Self {
        Self::new(RECOMMENDED_KEY_BITS)
    }
}

impl PublicKey {
    /// Builds a public key from its components, checking their ranges.
    pub fn from_parts(p: BigUint, g: BigUint, y: BigUint) -> Result<Self, ElGamalError> {
        if p < BigUint::from(5u32) || !p.bit(0) {
            return Err(ElGamalError::InvalidPublicKey(
                "modulus must be odd and at least 5",
            ));
        }
        if g < BigUint::from(2u32) || g > &p - 2u32 {
            return Err(ElGamalError::InvalidPublicKey("generator out of range"));
        }
        if y.is_zero() || y >= p {
            return Err(ElGamalError::InvalidPublicKey("public value out of range"));
        }
        Ok(Self { p, g, y })
    }

    /// The prime modulus `p`.
    pub fn modulus(&self) -> &BigUint {
        &self.p
    }

    /// The generator `g`.
    pub fn generator(&self) -> &BigUint {
        &self.g
    }

    /// The public value `y = g^x mod p`.
    pub fn public_value(&self) -> &BigUint {
        &self.y
    }

    /// Bit length of the modulus.
    pub fn bits(&self) -> u64 {
        self.p.bits()
    }

    /// Verifies `sig` over `msg`.
    ///
    /// Checks `g^H(msg) == y^r * r^s (mod p)`. Signatures with `r` outside
    /// `[1, p)` or `s` outside `[0, p - 1)` are rejected without computing
    /// anything. Returns `false` rather than an error for every malformed or
    /// forged input.
    pub fn verify(&self, msg: &[u8], sig: &Signature) -> bool {
        verify_digest(self, &message_digest(msg), sig)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PublicKey(p={}, g={}, y={})",
            short_hex(&self.p),
            self.g,
            short_hex(&self.y)
        )
    }
}

fn short_hex(n: &BigUint) -> String {
    let hex = n.to_str_radix(16);
    if hex.len() > 16 {
        format!("{}...", &hex[..16])
    } else {
        hex
    }
}

impl PrivateKey {
    /// Signs `msg` under this exponent and the group parameters of `public`.
    ///
    /// Every call draws a fresh ephemeral key; two signatures over the same
    /// message differ and both verify.
    pub fn sign<R: Rng + CryptoRng + ?Sized>(
        &self,
        rng: &mut R,
        public: &PublicKey,
        msg: &[u8],
    ) -> Result<Signature, ElGamalError> {
        sign_digest(rng, public, &self.x, &message_digest(msg))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(x=<redacted>)")
    }
}

impl KeyPair {
    /// Generates a key pair with a `bits`-bit modulus and the default
    /// configuration (fixed generator 2, bounded prime search).
    pub fn generate<R: Rng + CryptoRng + ?Sized>(
        rng: &mut R,
        bits: u64,
    ) -> Result<Self, ElGamalError> {
        Self::generate_with(rng, &KeyGenConfig::new(bits))
    }

    /// Generates a key pair according to `config`.
    ///
    /// 1. Draw a random `bits`-bit prime `p` (or safe prime, depending on
    ///    the generator policy)
    /// 2. Choose `g`
    /// 3. Draw `x` uniformly from `[2, p - 2]`
    /// 4. Compute `y = g^x mod p`
    ///
    /// Fails with [`ElGamalError::KeyTooSmall`] below [`MIN_KEY_BITS`], with
    /// [`ElGamalError::ZeroRounds`] when no primality rounds are configured,
    /// and with [`ElGamalError::GenerationFailed`] when the prime search
    /// budget runs out.
    pub fn generate_with<R: Rng + CryptoRng + ?Sized>(
        rng: &mut R,
        config: &KeyGenConfig,
    ) -> Result<Self, ElGamalError> {
        if config.bits < MIN_KEY_BITS {
            return Err(ElGamalError::KeyTooSmall {
                bits: config.bits,
                min: MIN_KEY_BITS,
            });
        }
        if config.rounds == 0 {
            return Err(ElGamalError::ZeroRounds);
        }
        if config.bits < RECOMMENDED_KEY_BITS {
            warn!(
                "generating a {}-bit ElGamal key; {} bits or more is recommended",
                config.bits, RECOMMENDED_KEY_BITS
            );
        }

        let search = PrimeSearch::new(config.bits)
            .rounds(config.rounds)
            .max_attempts(config.max_attempts);

        let (p, g) = match config.generator {
            GeneratorPolicy::Fixed(g) => {
                let p = search.find_prime(rng).map_err(ElGamalError::from_search)?;
                (p, BigUint::from(g))
            }
            GeneratorPolicy::SafePrime => {
                let (p, q) = search
                    .find_safe_prime(rng)
                    .map_err(ElGamalError::from_search)?;
                let g = primitive_root(rng, &p, &q)?;
                (p, g)
            }
        };

        let x = random_in_range(rng, &BigUint::from(2u32), &(&p - 2u32))?;
        let y = g.modpow(&x, &p);
        let public = PublicKey::from_parts(p, g, y)?;

        info!(
            "generated {}-bit ElGamal key pair ({:?})",
            public.bits(),
            config.generator
        );
        Ok(Self {
            public,
            private: PrivateKey { x },
        })
    }

    /// Rebuilds a key pair from known group parameters and secret exponent.
    pub fn from_secret(p: BigUint, g: BigUint, x: BigUint) -> Result<Self, ElGamalError> {
        if x < BigUint::from(2u32) || p < BigUint::from(5u32) || x > &p - 2u32 {
            return Err(ElGamalError::InvalidPrivateKey);
        }
        let y = g.modpow(&x, &p);
        let public = PublicKey::from_parts(p, g, y)?;
        Ok(Self {
            public,
            private: PrivateKey { x },
        })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private
    }

    /// Signs `msg` with this key pair. See [`PrivateKey::sign`].
    pub fn sign<R: Rng + CryptoRng + ?Sized>(
        &self,
        rng: &mut R,
        msg: &[u8],
    ) -> Result<Signature, ElGamalError> {
        self.private.sign(rng, &self.public, msg)
    }

    /// Verifies `sig` over `msg` against this pair's public key.
    pub fn verify(&self, msg: &[u8], sig: &Signature) -> bool {
        self.public.verify(msg, sig)
    }
}

impl From<&KeyPair> for PublicKey {
    fn from(key_pair: &KeyPair) -> Self {
        key_pair.public.clone()
    }
}

/// Picks a random `g` of order `2q` modulo the safe prime `p = 2q + 1`.
///
/// For `g` in `[2, p - 2]` the order is either `q` or `2q`; it is `2q`
/// exactly when `g^q != 1 (mod p)`. Half of all candidates qualify.
pub(crate) fn primitive_root<R: Rng + CryptoRng + ?Sized>(
    rng: &mut R,
    p: &BigUint,
    q: &BigUint,
) -> Result<BigUint, ElGamalError> {
    let two = BigUint::from(2u32);
    let upper = p - 2u32;

    for _ in 0..MAX_GENERATOR_ATTEMPTS {
        let g = random_in_range(rng, &two, &upper)?;
        if !g.modpow(q, p).is_one() {
            return Ok(g);
        }
    }
    Err(ElGamalError::GenerationFailed {
        attempts: MAX_GENERATOR_ATTEMPTS as u64,
    })
}
