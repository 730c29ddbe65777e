//! Square root.

use crate::common::util::{any_bit_in_range, checked_scale, size_ladder, top_u64};
use crate::defs::{Error, GUARD_BITS};
use crate::num::BigFloat;
use num_bigint::{BigInt, BigUint};

// extra bits carried by the big path and dropped at the end
const EXTRA: u64 = 8;

// inputs up to this size are handled in machine words
const WORD_SQRT_MAX: u64 = 57;
const DWORD_SQRT_MAX: u64 = 126;

// Newton step sizes for which the plain division form is used;
// above this the step is computed from the remainder instead,
// replacing the full-width division with a short one
const DIV_FORM_MAX: u64 = 256;

// `x` must not exceed 128 bits
fn to_u128(x: &BigUint) -> u128 {
    let d = x.to_u64_digits();
    let lo = d.first().copied().unwrap_or(0) as u128;
    let hi = d.get(1).copied().unwrap_or(0) as u128;
    (hi << 64) | lo
}

// `x` must not exceed 57 bits, so that the hardware square root
// is within 1 of the true root.
fn sqrt_u64(x: u64) -> u64 {
    if x < 2 {
        return x;
    }

    let mut v = (x as f64).sqrt() as u64;
    if v * v > x {
        v -= 1;
    }

    v
}

// `x` must not exceed 126 bits: the hardware square root seeds a
// single Newton step, which never lands below the true root and
// overshoots by at most 1.
fn sqrt_u128(x: u128) -> u128 {
    if x < 2 {
        return x;
    }

    let s = (x as f64).sqrt() as u128;
    let mut v = (s + x / s) >> 1;
    if v * v > x {
        v -= 1;
    }

    v
}

/// Returns the largest integer whose square does not exceed `x`.
///
/// Large inputs start from a machine-word root of the top bits of `x`
/// and double the precision with Newton steps, each step working on a
/// correspondingly wider window of `x`. The approximation never falls
/// below the true root, so a single trailing check settles the result.
pub fn isqrt(x: &BigUint) -> BigUint {
    let len = x.bits();

    if len <= WORD_SQRT_MAX {
        return BigUint::from(sqrt_u64(top_u64(x, 64)));
    }

    if len <= DWORD_SQRT_MAX {
        return BigUint::from(sqrt_u128(to_u128(x)));
    }

    // pad to an even length so that the windows of x halve exactly
    let len_adj = len + (len & 1);
    let target = len_adj / 2;
    let work = target + EXTRA;

    let (s0, sizes) = size_ladder(work, 31);

    // the root of the top bits of x, exact at the seed size
    let w0 = top_u64(x, len + 2 * s0 - len_adj);
    let mut v = BigUint::from(sqrt_u128(w0 as u128) as u64);
    let mut s_cur = s0;

    for &s in &sizes {
        let d = s - s_cur;
        let shift = len_adj as i64 - 2 * s as i64;
        let w = if shift >= 0 {
            x >> (shift as u64)
        } else {
            x << ((-shift) as u64)
        };

        let t0 = &v << d;

        v = if s <= DIV_FORM_MAX {
            (&t0 + &w / &t0) >> 1u32
        } else {
            let sq = &t0 * &t0;
            let den = BigInt::from(&t0 << 1u32);
            let t1 = BigInt::from(t0) + (BigInt::from(w) - BigInt::from(sq)) / den;
            let (_, mag) = t1.into_parts();
            mag
        };

        s_cur = s;
    }

    let mut r = &v >> EXTRA;

    // an overshoot can only leave the dropped bits almost empty,
    // everything else needs no verification
    if !any_bit_in_range(&v, 2, EXTRA) && &r * &r > *x {
        r -= 1u32;
    }

    r
}

impl BigFloat {
    /// Computes the square root of the number. The result carries
    /// roughly as many mantissa bits as `self` does.
    ///
    /// ## Errors
    ///
    ///  - ExponentOverflow: the scale of the result does not fit `Scale`.
    ///  - InvalidArgument: `self` is negative.
    pub fn sqrt(&self) -> Result<Self, Error> {
        if self.is_negative() {
            return Err(Error::InvalidArgument);
        }

        if self.is_zero() {
            return Ok(self.clone());
        }

        let e = self.scale() as i64 - GUARD_BITS as i64;

        // shift the mantissa left so that the remaining exponent is even
        let mut k = self.size();
        if (e - k as i64) & 1 != 0 {
            k += 1;
        }

        let w = self.mantissa().magnitude() << k;
        let r = isqrt(&w);

        let scale = (e - k as i64) / 2 + GUARD_BITS as i64;

        Ok(BigFloat::from_parts(BigInt::from(r), checked_scale(scale)?))
    }
}
