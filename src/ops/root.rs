//! N-th root.

use crate::common::util::{checked_scale, log2_approx};
use crate::defs::{Error, Sign, GUARD_BITS};
use crate::num::BigFloat;
use crate::ops::pow::pow_msb;
use num_bigint::{BigInt, BigUint};
use num_traits::{One, Pow, Zero};

/// Computes the integer part of the n-th root of `x`. The result `r`
/// satisfies `r^n <= x < (r + 1)^n`.
///
/// ## Errors
///
///  - InvalidArgument: `n` is zero.
///  - ExponentOverflow: an intermediate power is too large to size.
pub fn nth_root_int(x: &BigUint, n: u32) -> Result<BigUint, Error> {
    if n == 0 {
        return Err(Error::InvalidArgument);
    }

    if n == 1 || x.is_zero() {
        return Ok(x.clone());
    }

    // x below 2^n keeps the root below 2
    if x.bits() <= n as u64 {
        return Ok(BigUint::one());
    }

    // seed from the floating point logarithm, pushed above the root
    let lg = log2_approx(x) / n as f64;
    let e = lg as u64;
    let m = ((lg - e as f64).exp2() * (1u64 << 52) as f64) as u64;
    let mut r = if e >= 52 {
        BigUint::from(m) << (e - 52)
    } else {
        BigUint::from(m >> (52 - e))
    };
    r += (&r >> 30u32) + 1u32;

    // Newton steps downward; the divisor takes only the most significant
    // bits of the power, slightly more of them than the root carries
    loop {
        let w = r.bits() + GUARD_BITS;
        let (top, sh) = pow_msb(&r, n as u64 - 1, w, true)?;
        let q = (x >> sh as u64) / top;
        let t = (&r * (n - 1) + q) / n;
        if t >= r {
            break;
        }
        r = t;
    }

    // the shortened divisor can leave the result a step or two off the floor
    while Pow::pow(&r, n) > *x {
        r -= 1u32;
    }
    while Pow::pow(&(&r + 1u32), n) <= *x {
        r += 1u32;
    }

    Ok(r)
}

impl BigFloat {
    /// Computes the n-th root of the number. For an odd `n` the root of a
    /// negative number is negative.
    ///
    /// ## Errors
    ///
    ///  - InvalidArgument: `n` is zero, or `n` is even and the number is
    ///    negative.
    ///  - ExponentOverflow: the scale of the result does not fit `Scale`.
    pub fn nth_root(&self, n: u32) -> Result<Self, Error> {
        if n == 0 {
            return Err(Error::InvalidArgument);
        }

        if self.is_negative() && n & 1 == 0 {
            return Err(Error::InvalidArgument);
        }

        if self.is_zero() {
            return Ok(self.clone());
        }

        let e = self.scale() as i64 - GUARD_BITS as i64;

        // widen the mantissa so that the root keeps the precision of the
        // number, and so that the scale division below is whole
        let k0 = (n as u128 - 1) * self.size() as u128;
        if k0 > (i64::MAX / 4) as u128 {
            return Err(Error::ExponentOverflow(Sign::Neg));
        }
        let k = k0 as u64 + (e - k0 as i64).rem_euclid(n as i64) as u64;

        let r = nth_root_int(&(self.mantissa().magnitude() << k), n)?;
        let scale = checked_scale((e - k as i64) / n as i64 + GUARD_BITS as i64)?;

        let sign = if self.is_negative() {
            num_bigint::Sign::Minus
        } else {
            num_bigint::Sign::Plus
        };

        Ok(BigFloat::from_parts(BigInt::from_biguint(sign, r), scale))
    }
}
