//! Reciprocal.

use crate::common::util::{checked_scale, size_ladder, top_u64};
use crate::defs::{Error, GUARD_BITS};
use crate::mantissa::shr_round_mag;
use crate::num::BigFloat;
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

// extra bits carried by the Newton iteration and rounded off at the end
const EXTRA: u64 = 32;

// divisors up to this size are inverted by a plain division
const DIV_INV_MAX: u64 = 512;

/// Computes `n` most significant bits of the reciprocal of `x`: the result
/// is `2^(L + n - 1) / x` rounded to the nearest integer, ties away from
/// zero, where `L` is the bit length of `x`.
///
/// ## Errors
///
///  - DivisionByZero: `x` is zero.
///  - InvalidArgument: `n` is zero.
pub fn inv_bits(x: &BigUint, n: u64) -> Result<BigUint, Error> {
    if x.is_zero() {
        return Err(Error::DivisionByZero);
    }

    if n == 0 {
        return Err(Error::InvalidArgument);
    }

    // trailing zeroes of the divisor only move the binary point
    let tz = x.trailing_zeros().unwrap_or(0);
    let xs = x >> tz;
    let l = xs.bits();

    if l <= DIV_INV_MAX {
        let num = BigUint::one() << (l + n - 1);
        let (mut q, r) = num.div_rem(&xs);
        if &r << 1u32 >= xs {
            q += 1u32;
        }
        return Ok(q);
    }

    let work = n + EXTRA;
    let (s0, sizes) = size_ladder(work, 32);

    // seed from the top bits of the divisor
    let x0 = top_u64(&xs, s0);
    let mut r = BigUint::from(((1u128 << (2 * s0 - 1)) / x0 as u128) as u64);
    let mut s_cur = s0;

    for &s in &sizes {
        let d = s - s_cur;
        let xw = if l >= s { &xs >> (l - s) } else { &xs << (s - l) };

        // r' = 2r - r^2 x in a fixed point scaled to the window of x
        let t0 = &r << d;
        r = (&t0 << 1u32) - ((&t0 * &t0 * &xw) >> (2 * s - 1));

        s_cur = s;
    }

    let mut r = shr_round_mag(&r, EXTRA);

    // the iteration leaves the result within half an ulp of the true
    // quotient; the exact remainder settles the boundary cases
    let prod = (&xs * &r) << 1u32;
    let pow = BigUint::one() << (l + n);
    if prod >= &pow + &xs {
        r -= 1u32;
    } else if &prod + &xs <= pow {
        r += 1u32;
    }

    Ok(r)
}

impl BigFloat {
    /// Computes the reciprocal of the number carrying as many mantissa
    /// bits as `self` does.
    ///
    /// ## Errors
    ///
    ///  - ExponentOverflow: the scale of the result does not fit `Scale`.
    ///  - DivisionByZero: `self` is zero.
    pub fn inverse(&self) -> Result<Self, Error> {
        if self.is_zero() {
            return Err(Error::DivisionByZero);
        }

        let l = self.size();
        let r = inv_bits(self.mantissa().magnitude(), l)?;

        let e = self.scale() as i64 - GUARD_BITS as i64;
        let scale = 1 - 2 * l as i64 - e + GUARD_BITS as i64;

        let v = BigFloat::from_parts(BigInt::from(r), checked_scale(scale)?);

        Ok(if self.is_negative() { v.neg() } else { v })
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::common::consts::ONE;
    use crate::common::util::random_biguint;
    use crate::defs::Scale;
    use rand::random;
    use std::cmp::Ordering;

    fn inv_ref(x: &BigUint, n: u64) -> BigUint {
        let num = BigUint::one() << (x.bits() + n - 1);
        let (mut q, r) = num.div_rem(x);
        if &r << 1u32 >= *x {
            q += 1u32;
        }
        q
    }

    #[test]
    fn test_inv_bits() {
        // 1/8 to 4 bits: 2^(4 + 4 - 1) / 8 == 16
        let r = inv_bits(&BigUint::from(8u32), 4).unwrap();
        assert_eq!(r, BigUint::from(16u32));

        // powers of two invert to powers of two
        for k in [0u64, 1, 7, 100, 999] {
            let x = BigUint::one() << k;
            let r = inv_bits(&x, 20).unwrap();
            assert_eq!(r, BigUint::one() << 20);
        }

        assert_eq!(
            inv_bits(&BigUint::zero(), 5).unwrap_err(),
            Error::DivisionByZero
        );
        assert_eq!(
            inv_bits(&BigUint::from(3u32), 0).unwrap_err(),
            Error::InvalidArgument
        );

        // short divisors
        for _ in 0..1000 {
            let bits = random::<u64>() % 512 + 1;
            let x = random_biguint(bits);
            let n = random::<u64>() % 200 + 1;
            assert_eq!(inv_bits(&x, n).unwrap(), inv_ref(&x, n));
        }

        // long divisors take the Newton path and still round exactly
        for _ in 0..100 {
            let bits = random::<u64>() % 2000 + 513;
            let x = random_biguint(bits);
            let n = random::<u64>() % 600 + 1;
            assert_eq!(inv_bits(&x, n).unwrap(), inv_ref(&x, n), "{} bits", bits);
        }

        // trailing zeroes of the divisor do not change the result
        for _ in 0..100 {
            let x = random_biguint(random::<u64>() % 700 + 1);
            let n = random::<u64>() % 100 + 1;
            let r1 = inv_bits(&x, n).unwrap();
            let r2 = inv_bits(&(&x << 137u32), n).unwrap();
            assert_eq!(r1, r2);
        }
    }

    #[test]
    fn test_inverse() {
        // 1/8 is exact
        let r = BigFloat::from(8i64).inverse().unwrap();
        let eighth = BigFloat::from_parts(BigInt::one() << 32, -3);
        assert_eq!(r.cmp_exact(&eighth), Ordering::Equal);

        let r = BigFloat::from(1i64).inverse().unwrap();
        assert_eq!(r.cmp(&ONE), Ordering::Equal);

        let r = BigFloat::from(-4i64).inverse().unwrap();
        assert_eq!(r.cmp(&BigFloat::from_f64(-0.25).unwrap()), Ordering::Equal);

        assert_eq!(BigFloat::new().inverse().unwrap_err(), Error::DivisionByZero);

        for _ in 0..1000 {
            let bits = random::<u64>() % 300 + 40;
            let m = random_biguint(bits);
            let scale = (random::<i32>() % 200) as Scale;
            let mut x = BigFloat::from_parts(BigInt::from(m), scale);
            if random::<u8>() & 1 == 0 {
                x = x.neg();
            }

            let r = x.inverse().unwrap();

            // x * 1/x == 1
            let p = x.mul(&r).unwrap();
            let one_w = ONE.extend_precision(bits).unwrap();
            assert_eq!(p.cmp(&one_w), Ordering::Equal);

            // the reciprocal agrees with plain division
            let q = one_w.div(&x).unwrap();
            assert_eq!(r.cmp(&q), Ordering::Equal);

            // double reciprocal returns to the argument
            let rr = r.inverse().unwrap();
            assert_eq!(rr.cmp(&x), Ordering::Equal);
        }
    }
}
