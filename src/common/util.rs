//! Auxiliary functions.

use crate::defs::{Error, Scale, Sign, SCALE_MAX, SCALE_MIN};
use num_bigint::BigUint;
use num_traits::{One, Zero};

#[cfg(test)]
use num_bigint::BigInt;

/// integer logarithm base 2 of a number.
pub fn log2_ceil(mut n: u64) -> u64 {
    let mut ret = 0;
    let mut sticky = 0;
    while n > 1 {
        if n & 1 != 0 {
            sticky = 1;
        }
        ret += 1;
        n >>= 1;
    }
    ret + sticky
}

/// integer logarithm base 2 of a number.
pub fn log2_floor(mut n: u64) -> u64 {
    let mut ret = 0;
    while n > 1 {
        ret += 1;
        n >>= 1;
    }
    ret
}

/// Narrows a scale computed in i64 back to `Scale`.
pub(crate) fn checked_scale(s: i64) -> Result<Scale, Error> {
    if s > SCALE_MAX as i64 {
        Err(Error::ExponentOverflow(Sign::Pos))
    } else if s < SCALE_MIN as i64 {
        Err(Error::ExponentOverflow(Sign::Neg))
    } else {
        Ok(s as Scale)
    }
}

/// Returns true if any bit of `m` in the range `lo..hi` is set.
pub(crate) fn any_bit_in_range(m: &BigUint, lo: u64, hi: u64) -> bool {
    if lo >= hi || m.is_zero() {
        return false;
    }

    let tz = m.trailing_zeros().unwrap_or(0);
    if tz >= hi {
        false
    } else if tz >= lo {
        true
    } else {
        let window = (m >> lo) & ((BigUint::one() << (hi - lo)) - 1u32);
        !window.is_zero()
    }
}

/// Returns the `nbits` most significant bits of `m` as a machine word.
/// `nbits` must not exceed 64.
pub(crate) fn top_u64(m: &BigUint, nbits: u64) -> u64 {
    debug_assert!(nbits <= 64);

    let l = m.bits();
    if l <= nbits {
        m.to_u64_digits().first().copied().unwrap_or(0)
    } else {
        (m >> (l - nbits)).to_u64_digits().first().copied().unwrap_or(0)
    }
}

/// Approximate binary logarithm of a positive number.
pub(crate) fn log2_approx(m: &BigUint) -> f64 {
    let l = m.bits();
    debug_assert!(l > 0);

    let k = l.min(53);
    let top = top_u64(m, k);
    (l - k) as f64 + (top as f64).log2()
}

/// Plans Newton iteration sizes: repeatedly shrinks `target` until it fits
/// the hardware seed, and returns the seed size along with the sizes to
/// walk back up in ascending order. A step from a size to its successor
/// less than doubles it, which keeps the quadratic convergence ahead of
/// the bits a step adds.
pub(crate) fn size_ladder(mut target: u64, seed_cap: u64) -> (u64, Vec<u64>) {
    let mut sizes = Vec::new();
    while target > seed_cap {
        sizes.push(target);
        target = target / 2 + 3;
    }
    sizes.reverse();
    (target, sizes)
}

/// Returns a random unsigned integer `bits` long with the top bit set.
#[cfg(test)]
pub(crate) fn random_biguint(bits: u64) -> BigUint {
    if bits == 0 {
        return BigUint::zero();
    }

    let nbytes = ((bits + 7) / 8) as usize;
    let mut bytes = Vec::with_capacity(nbytes);
    for _ in 0..nbytes {
        bytes.push(rand::random::<u8>());
    }

    let used = bits - (nbytes as u64 - 1) * 8;
    if used < 8 {
        bytes[nbytes - 1] &= (1u8 << used) - 1;
    }
    bytes[nbytes - 1] |= 1u8 << (used - 1);

    BigUint::from_bytes_le(&bytes)
}

/// Returns a random signed integer `bits` long.
#[cfg(test)]
pub(crate) fn random_bigint(bits: u64) -> BigInt {
    let m = random_biguint(bits);
    if rand::random::<u8>() & 1 == 0 {
        BigInt::from(m)
    } else {
        -BigInt::from(m)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_log2() {
        assert_eq!(log2_ceil(1), 0);
        assert_eq!(log2_ceil(2), 1);
        assert_eq!(log2_ceil(3), 2);
        assert_eq!(log2_ceil(4), 2);
        assert_eq!(log2_ceil(5), 3);
        assert_eq!(log2_floor(1), 0);
        assert_eq!(log2_floor(2), 1);
        assert_eq!(log2_floor(3), 1);
        assert_eq!(log2_floor(1024), 10);

        for _ in 0..1000 {
            let n = rand::random::<u64>() % (u64::MAX / 4) + 1;
            let f = log2_floor(n);
            assert!(1u64 << f <= n);
            assert!(n >> 1 < 1u64 << f);
            let c = log2_ceil(n);
            assert!(n <= 1u64 << c);
            assert!(1u64 << c < n << 1);
        }
    }

    #[test]
    fn test_bit_range() {
        let m = BigUint::from(0b1010_0000u8);
        assert!(any_bit_in_range(&m, 5, 8));
        assert!(any_bit_in_range(&m, 7, 8));
        assert!(any_bit_in_range(&m, 0, 6));
        assert!(!any_bit_in_range(&m, 0, 5));
        assert!(!any_bit_in_range(&m, 8, 100));
        assert!(!any_bit_in_range(&m, 6, 7));
        assert!(!any_bit_in_range(&m, 5, 5));
        assert!(!any_bit_in_range(&BigUint::zero(), 0, 100));

        for _ in 0..1000 {
            let bits = rand::random::<u64>() % 300 + 1;
            let m = random_biguint(bits);
            // the top bit is always set
            assert!(any_bit_in_range(&m, bits - 1, bits));
            assert!(!any_bit_in_range(&m, bits, bits + 64));
        }
    }

    #[test]
    fn test_top_u64() {
        let m = BigUint::from(0xdeadbeefu32);
        assert_eq!(top_u64(&m, 32), 0xdeadbeef);
        assert_eq!(top_u64(&m, 4), 0xd);
        assert_eq!(top_u64(&m, 64), 0xdeadbeef);

        let m = BigUint::from(u128::MAX);
        assert_eq!(top_u64(&m, 64), u64::MAX);
        assert_eq!(top_u64(&m, 1), 1);
    }

    #[test]
    fn test_size_ladder() {
        for target in [33u64, 64, 100, 1000, 12345] {
            let (seed, sizes) = size_ladder(target, 32);
            assert!(seed <= 32);
            let mut prev = seed;
            for &s in &sizes {
                assert!(s <= 2 * prev - 1);
                assert!(s > prev);
                prev = s;
            }
            assert_eq!(prev, target);
        }

        let (seed, sizes) = size_ladder(20, 32);
        assert_eq!(seed, 20);
        assert!(sizes.is_empty());
    }
}
