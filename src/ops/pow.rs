//! Integer power.

use crate::common::consts::ONE;
use crate::common::util::{log2_ceil, top_u64};
use crate::defs::{Error, Scale, Sign, GUARD_BITS, SCALE_MAX, SCALE_MIN};
use crate::mantissa::shr_round_mag;
use crate::num::BigFloat;
use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};

// extra working bits of the binary exponentiation
const EXTRA: u64 = 8;
const EXTRA_ACCURATE: u64 = 18;

/// Computes the most significant bits of `x` raised to the power `exp`.
/// Returns the top `wanted` bits of the power, rounded to nearest with
/// ties away from zero, along with the number of bits the power was
/// shifted right by. The result is within one ulp of the rounded power;
/// `extra_accurate` widens the working precision for callers that
/// iterate on the result.
///
/// ## Errors
///
///  - ExponentOverflow: the power is too large to size.
///  - InvalidArgument: `wanted` is zero.
pub fn pow_msb(
    x: &BigUint,
    exp: u64,
    wanted: u64,
    extra_accurate: bool,
) -> Result<(BigUint, i64), Error> {
    if wanted == 0 {
        return Err(Error::InvalidArgument);
    }

    if exp == 0 {
        return Ok((BigUint::one(), 0));
    }

    if x.is_zero() {
        return Ok((BigUint::zero(), 0));
    }

    let l = x.bits();

    // the power has about l * exp bits; its shift must stay well inside
    // the scale arithmetic of the callers
    if l as u128 * exp as u128 > (i64::MAX / 4) as u128 {
        return Err(Error::ExponentOverflow(Sign::Pos));
    }

    // small powers fit in a machine word and are computed exactly
    if l * exp <= 63 {
        let p = top_u64(x, 64).pow(exp as u32);
        let bits = 64 - p.leading_zeros() as u64;
        if bits <= wanted {
            return Ok((BigUint::from(p), 0));
        }

        let n = bits - wanted;
        let r = ((p >> (n - 1)) + 1) >> 1;
        return Ok((BigUint::from(r), n as i64));
    }

    let extra = if extra_accurate { EXTRA_ACCURATE } else { EXTRA };
    let work = wanted + log2_ceil(exp) + extra;

    // binary exponentiation; the factors are cut back to the working
    // size after every multiplication, and the cut bits accumulate in
    // the shift counters
    let mut e = exp;
    let mut pw = x.clone();
    let mut pw_shift = 0i64;
    let mut acc = BigUint::one();
    let mut shift = 0i64;

    loop {
        if e & 1 == 1 {
            acc *= &pw;
            shift += pw_shift;

            let bits = acc.bits();
            if bits > work {
                acc >>= bits - work;
                shift += (bits - work) as i64;
            }
        }

        e >>= 1;
        if e == 0 {
            break;
        }

        pw = &pw * &pw;
        pw_shift *= 2;

        let bits = pw.bits();
        if bits > work {
            pw >>= bits - work;
            pw_shift += (bits - work) as i64;
        }
    }

    let bits = acc.bits();
    if bits > wanted {
        let n = bits - wanted;
        acc = shr_round_mag(&acc, n);
        shift += n as i64;
    }

    Ok((acc, shift))
}

impl BigFloat {
    /// Raises the number to the integer power `exp`. A negative `exp`
    /// inverts the result of the positive power.
    ///
    /// ## Errors
    ///
    ///  - ExponentOverflow: the scale of the result does not fit `Scale`.
    ///  - DivisionByZero: `self` is zero and `exp` is negative.
    pub fn powi(&self, exp: i64) -> Result<Self, Error> {
        if exp == 0 {
            return Ok(ONE.clone());
        }

        if self.is_zero() {
            return if exp < 0 {
                Err(Error::DivisionByZero)
            } else {
                Ok(self.clone())
            };
        }

        let e = exp.unsigned_abs();
        let (top, shift) = pow_msb(self.mantissa().magnitude(), e, self.size(), false)?;

        let s = shift as i128
            + e as i128 * (self.scale() as i128 - GUARD_BITS as i128)
            + GUARD_BITS as i128;
        if s > SCALE_MAX as i128 {
            return Err(Error::ExponentOverflow(Sign::Pos));
        }
        if s < SCALE_MIN as i128 {
            return Err(Error::ExponentOverflow(Sign::Neg));
        }

        let sign = if self.is_negative() && exp & 1 == 1 {
            num_bigint::Sign::Minus
        } else {
            num_bigint::Sign::Plus
        };

        let v = BigFloat::from_parts(BigInt::from_biguint(sign, top), s as Scale);

        if exp < 0 {
            v.inverse()
        } else {
            Ok(v)
        }
    }
}
