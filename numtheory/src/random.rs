//! Unbiased sampling of big integers.

use num_bigint::BigUint;
use num_traits::Zero;
use rand::{CryptoRng, Rng};

use crate::errors::NumberTheoryError;

/// Draws an integer uniformly from `[0, bound)`.
///
/// Candidates are masked to the bit length of `bound` and rejected when they
/// land outside the range, so every value is equally likely and at most half
/// of the draws are discarded on average.
pub fn random_below<R: Rng + CryptoRng + ?Sized>(
    rng: &mut R,
    bound: &BigUint,
) -> Result<BigUint, NumberTheoryError> {
    if bound.is_zero() {
        return Err(NumberTheoryError::EmptyRange);
    }

    let bits = bound.bits();
    let len = bits.div_ceil(8) as usize;
    let excess = (len as u64 * 8 - bits) as u32;
    let mut bytes = vec![0u8; len];

    loop {
        rng.fill_bytes(&mut bytes);
        bytes[0] &= 0xFF >> excess;

        let candidate = BigUint::from_bytes_be(&bytes);
        if &candidate < bound {
            return Ok(candidate);
        }
    }
}

/// Draws an integer uniformly from the inclusive range `[low, high]`.
pub fn random_in_range<R: Rng + CryptoRng + ?Sized>(
    rng: &mut R,
    low: &BigUint,
    high: &BigUint,
) -> Result<BigUint, NumberTheoryError> {
    if high < low {
        return Err(NumberTheoryError::EmptyRange);
    }
    let span = high - low + 1u32;
    Ok(low + random_below(rng, &span)?)
}

/// Draws a random odd integer of exactly `bits` bits (top bit forced set).
pub fn random_odd_with_bits<R: Rng + CryptoRng + ?Sized>(
    rng: &mut R,
    bits: u64,
) -> Result<BigUint, NumberTheoryError> {
    if bits < 2 {
        return Err(NumberTheoryError::BitLengthTooSmall { bits, min: 2 });
    }

    let len = bits.div_ceil(8) as usize;
    let excess = (len as u64 * 8 - bits) as u32;
    let mut bytes = vec![0u8; len];
    rng.fill_bytes(&mut bytes);

    bytes[0] &= 0xFF >> excess;
    bytes[0] |= 0x80 >> excess;
    bytes[len - 1] |= 0x01;

    Ok(BigUint::from_bytes_be(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_below_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let bound = BigUint::from(1000u32);
        for _ in 0..500 {
            assert!(random_below(&mut rng, &bound).unwrap() < bound);
        }
    }

    #[test]
    fn test_random_below_one_is_zero() {
        let mut rng = StdRng::seed_from_u64(7);
        let value = random_below(&mut rng, &BigUint::from(1u32)).unwrap();
        assert!(value.is_zero());
    }

    #[test]
    fn test_random_below_zero_is_empty() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(
            random_below(&mut rng, &BigUint::zero()),
            Err(NumberTheoryError::EmptyRange)
        );
    }

    #[test]
    fn test_random_below_hits_every_value() {
        // Non power-of-two bound: every residue must still show up.
        let mut rng = StdRng::seed_from_u64(11);
        let bound = BigUint::from(5u32);
        let mut seen = [false; 5];
        for _ in 0..200 {
            let v = random_below(&mut rng, &bound).unwrap();
            seen[v.to_u32_digits().first().copied().unwrap_or(0) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_random_in_range_is_inclusive() {
        let mut rng = StdRng::seed_from_u64(3);
        let low = BigUint::from(2u32);
        let high = BigUint::from(4u32);
        let mut hit_low = false;
        let mut hit_high = false;
        for _ in 0..200 {
            let v = random_in_range(&mut rng, &low, &high).unwrap();
            assert!(v >= low && v <= high);
            hit_low |= v == low;
            hit_high |= v == high;
        }
        assert!(hit_low && hit_high);
    }

    #[test]
    fn test_random_in_range_rejects_inverted_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        let low = BigUint::from(9u32);
        let high = BigUint::from(4u32);
        assert_eq!(
            random_in_range(&mut rng, &low, &high),
            Err(NumberTheoryError::EmptyRange)
        );
    }

    #[test]
    fn test_random_odd_has_exact_bits() {
        let mut rng = StdRng::seed_from_u64(5);
        for bits in [2u64, 7, 8, 9, 63, 64, 65, 512] {
            let v = random_odd_with_bits(&mut rng, bits).unwrap();
            assert_eq!(v.bits(), bits);
            assert!(v.bit(0));
        }
    }
}
