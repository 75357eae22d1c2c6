//! Miller-Rabin primality testing and random prime search.

use log::debug;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, Rng};

use crate::errors::NumberTheoryError;
use crate::random::{random_in_range, random_odd_with_bits};

/// Default number of Miller-Rabin rounds. The false-positive rate is at most
/// `4^-rounds`, so 20 rounds bound it by `2^-40`.
pub const DEFAULT_ROUNDS: usize = 20;

/// Smallest bit length accepted by [`PrimeSearch`].
pub const MIN_PRIME_BITS: u64 = 8;

const SMALL_PRIMES: [u32; 45] = [
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199,
];

/// Probabilistic primality test.
///
/// Even numbers and values below 2 are rejected outright, 2 and 3 are
/// accepted. For odd `n >= 5`, `n - 1` is factored as `d * 2^r` and each of
/// the `rounds` random witnesses `a` in `[2, n - 2]` must either satisfy
/// `a^d = ±1 (mod n)` or reach `n - 1` within `r - 1` squarings.
///
/// A composite is reported as prime with probability at most `4^-rounds`.
/// Primes are always accepted.
pub fn is_probably_prime<R: Rng + CryptoRng + ?Sized>(
    n: &BigUint,
    rounds: usize,
    rng: &mut R,
) -> bool {
    let two = BigUint::from(2u32);
    let three = BigUint::from(3u32);

    if n < &two {
        return false;
    }
    if n == &two || n == &three {
        return true;
    }
    if n.is_even() {
        return false;
    }

    let n_minus_one = n - 1u32;
    let r = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> r;
    let upper = n - 2u32;

    'witness: for _ in 0..rounds {
        let a = match random_in_range(rng, &two, &upper) {
            Ok(a) => a,
            Err(_) => return false,
        };

        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }

        for _ in 1..r {
            x = (&x * &x) % n;
            if x == n_minus_one {
                continue 'witness;
            }
        }

        return false;
    }

    true
}

/// Cheap pre-filter: false when `n` has a small odd prime factor other than itself.
fn survives_trial_division(n: &BigUint) -> bool {
    for &p in SMALL_PRIMES.iter() {
        let p = BigUint::from(p);
        if n == &p {
            return true;
        }
        if (n % &p).is_zero() {
            return false;
        }
    }
    true
}

/// Parameters for a random prime search.
///
/// # Example
///
/// ```
/// use numtheory::PrimeSearch;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let p = PrimeSearch::new(64).find_prime(&mut rng).expect("prime");
/// assert_eq!(p.bits(), 64);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PrimeSearch {
    bits: u64,
    rounds: usize,
    max_attempts: Option<u64>,
}

impl PrimeSearch {
    /// A search for `bits`-bit primes with [`DEFAULT_ROUNDS`] and no attempt cap.
    pub fn new(bits: u64) -> Self {
        Self {
            bits,
            rounds: DEFAULT_ROUNDS,
            max_attempts: None,
        }
    }

    pub fn rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    /// Caps the number of candidates drawn; `None` searches until success.
    pub fn max_attempts(mut self, max_attempts: Option<u64>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }

    fn check_bits(&self, min: u64) -> Result<(), NumberTheoryError> {
        if self.bits < min {
            return Err(NumberTheoryError::BitLengthTooSmall {
                bits: self.bits,
                min,
            });
        }
        Ok(())
    }

    fn exhausted(&self, attempts: u64) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
    }

    /// Draws odd `bits`-bit candidates with the top bit set until one passes
    /// trial division and Miller-Rabin.
    pub fn find_prime<R: Rng + CryptoRng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<BigUint, NumberTheoryError> {
        self.check_bits(MIN_PRIME_BITS)?;

        let mut attempts = 0u64;
        loop {
            if self.exhausted(attempts) {
                return Err(NumberTheoryError::PrimeNotFound { attempts });
            }
            attempts += 1;

            let candidate = random_odd_with_bits(rng, self.bits)?;
            if survives_trial_division(&candidate)
                && is_probably_prime(&candidate, self.rounds, rng)
            {
                debug!("found {}-bit prime after {} candidates", self.bits, attempts);
                return Ok(candidate);
            }
        }
    }

    /// Searches for a safe prime `p = 2q + 1` with `q` prime, returning `(p, q)`.
    ///
    /// Each candidate `q` is `bits - 1` bits long so that `p` has exactly
    /// `bits` bits. Safe primes are far sparser than primes; expect the
    /// attempt count to be orders of magnitude higher than [`Self::find_prime`].
    pub fn find_safe_prime<R: Rng + CryptoRng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(BigUint, BigUint), NumberTheoryError> {
        self.check_bits(MIN_PRIME_BITS)?;

        let mut attempts = 0u64;
        loop {
            if self.exhausted(attempts) {
                return Err(NumberTheoryError::PrimeNotFound { attempts });
            }
            attempts += 1;

            let q = random_odd_with_bits(rng, self.bits - 1)?;
            let p: BigUint = (&q << 1u32) + 1u32;
            if !survives_trial_division(&q) || !survives_trial_division(&p) {
                continue;
            }
            // One cheap round on q first, full rounds only for survivors.
            if !is_probably_prime(&q, 1, rng) || !is_probably_prime(&p, 1, rng) {
                continue;
            }
            if is_probably_prime(&q, self.rounds, rng) && is_probably_prime(&p, self.rounds, rng) {
                debug!(
                    "found {}-bit safe prime after {} candidates",
                    self.bits, attempts
                );
                return Ok((p, q));
            }
        }
    }
}
