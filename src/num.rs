//! BigFloat definition and basic arithmetic, comparison, and number manipulation operations.

use crate::common::util::{any_bit_in_range, checked_scale};
use crate::defs::{Error, Scale, GUARD_BITS, KEEP_EXTRA_PREC, PRESHIFT_THRESHOLD};
use crate::mantissa::{bit_len, shr_round, shr_round_mag, shr_round_with_carry};
use num_bigint::{BigInt, BigUint};
use num_traits::Zero;
use std::cmp::Ordering;
use std::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign,
};

/// An arbitrary precision floating point number with a signed unbounded
/// mantissa and a binary scale. The least significant `GUARD_BITS` bits of
/// the mantissa are guard bits: they take up rounding noise so that the
/// reported precision covers only trustworthy bits. The value represented
/// is `mantissa` * 2 ^ (`scale` - `GUARD_BITS`).
#[derive(Debug, Clone)]
pub struct BigFloat {
    m: BigInt,
    scale: Scale,
}

impl BigFloat {
    /// Returns a new number with value of 0.
    pub fn new() -> Self {
        BigFloat {
            m: BigInt::zero(),
            scale: 0,
        }
    }

    /// Constructs a number from the raw mantissa and scale.
    pub fn from_parts(m: BigInt, scale: Scale) -> Self {
        BigFloat { m, scale }
    }

    /// Decomposes the number into the raw mantissa and scale.
    pub fn into_parts(self) -> (BigInt, Scale) {
        (self.m, self.scale)
    }

    /// Returns a reference to the mantissa, guard bits included.
    pub fn mantissa(&self) -> &BigInt {
        &self.m
    }

    /// Returns the scale of the number.
    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Returns the bit length of the mantissa, guard bits included.
    pub fn size(&self) -> u64 {
        self.m.magnitude().bits()
    }

    /// Returns the number of reported bits of the mantissa,
    /// i.e. the size without the guard bits.
    pub fn precision(&self) -> u64 {
        self.size().saturating_sub(GUARD_BITS)
    }

    /// Returns the binary exponent of the most significant reported bit.
    pub fn exponent(&self) -> i64 {
        self.scale as i64 + self.size() as i64 - GUARD_BITS as i64
    }

    /// Returns true if the value is zero: either the mantissa is zero, or
    /// the whole mantissa is rounding noise too small to reach above the
    /// precision floor. Such an underflowed zero keeps its scale.
    pub fn is_zero(&self) -> bool {
        self.m.is_zero()
            || (self.size() < GUARD_BITS
                && self.size() as i64 + self.scale as i64 < GUARD_BITS as i64)
    }

    /// Returns true if fewer bits remain than the guard area holds,
    /// meaning no reported bits are left.
    pub fn is_out_of_precision(&self) -> bool {
        self.size() < GUARD_BITS
    }

    /// Returns true if the value is positive. Zero has no sign.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.m.sign() == num_bigint::Sign::Plus
    }

    /// Returns true if the value is negative. Zero has no sign.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.m.sign() == num_bigint::Sign::Minus
    }

    /// Returns 1 for positive values, -1 for negative values, and 0 for zero.
    pub fn signum(&self) -> i32 {
        if self.is_zero() {
            0
        } else if self.m.sign() == num_bigint::Sign::Minus {
            -1
        } else {
            1
        }
    }

    /// Returns the absolute value of the number.
    pub fn abs(&self) -> Self {
        BigFloat {
            m: BigInt::from_biguint(num_bigint::Sign::Plus, self.m.magnitude().clone()),
            scale: self.scale,
        }
    }

    /// Returns the number with the sign inverted.
    pub fn neg(&self) -> Self {
        BigFloat {
            m: -&self.m,
            scale: self.scale,
        }
    }

    /// Adds `rhs` to `self` and returns the result.
    ///
    /// ## Errors
    ///
    ///  - ExponentOverflow: the scale of the result does not fit `Scale`.
    pub fn add(&self, rhs: &Self) -> Result<Self, Error> {
        self.add_sub(rhs, false)
    }

    /// Subtracts `rhs` from `self` and returns the result.
    ///
    /// ## Errors
    ///
    ///  - ExponentOverflow: the scale of the result does not fit `Scale`.
    pub fn sub(&self, rhs: &Self) -> Result<Self, Error> {
        self.add_sub(rhs, true)
    }

    fn add_sub(&self, rhs: &Self, subtract: bool) -> Result<Self, Error> {
        let other = if subtract { rhs.neg() } else { rhs.clone() };

        if other.is_zero() {
            return Ok(self.clone());
        }

        if self.is_zero() {
            return Ok(other);
        }

        // an operand lying entirely below the precision floor of the other
        // one cannot contribute any reported bits
        let ea = self.exponent();
        let eb = other.exponent();
        if self.precision() > 0 && ea - eb > self.precision() as i64 {
            return Ok(self.clone());
        }
        if other.precision() > 0 && eb - ea > other.precision() as i64 {
            return Ok(other);
        }

        // align the addends at the larger scale; the scale of the result
        // is kept even if the mantissas cancel out
        let (m, scale) = if self.scale >= other.scale {
            let d = self.scale as i64 - other.scale as i64;
            (&self.m + shr_round(&other.m, d), self.scale)
        } else {
            let d = other.scale as i64 - self.scale as i64;
            (shr_round(&self.m, d) + &other.m, other.scale)
        };

        Ok(BigFloat { m, scale })
    }

    /// Multiplies `self` by `rhs` and returns the result. The size of the
    /// result targets the size of the smaller operand; when the operand
    /// sizes differ a lot, the larger mantissa is shortened beforehand,
    /// keeping `KEEP_EXTRA_PREC` additional bits.
    ///
    /// ## Errors
    ///
    ///  - ExponentOverflow: the scale of the result does not fit `Scale`.
    pub fn mul(&self, rhs: &Self) -> Result<Self, Error> {
        if self.is_zero() || rhs.is_zero() {
            let s = self.scale as i64 + rhs.scale as i64 - GUARD_BITS as i64;
            return Ok(BigFloat {
                m: BigInt::zero(),
                scale: s.clamp(Scale::MIN as i64, Scale::MAX as i64) as Scale,
            });
        }

        let s1 = self.size();
        let s2 = rhs.size();
        let diff = s1 as i64 - s2 as i64;

        let (preshift, prod, should_be) = if diff.unsigned_abs() < PRESHIFT_THRESHOLD {
            (0, &self.m * &rhs.m, s1.min(s2))
        } else if diff > 0 {
            let sh = diff as u64 - KEEP_EXTRA_PREC;
            let cut = BigInt::from_biguint(self.m.sign(), self.m.magnitude() >> sh);
            (sh, cut * &rhs.m, s2)
        } else {
            let sh = (-diff) as u64 - KEEP_EXTRA_PREC;
            let cut = BigInt::from_biguint(rhs.m.sign(), rhs.m.magnitude() >> sh);
            (sh, &self.m * cut, s1)
        };

        let shrink = bit_len(&prod) as i64 - should_be as i64;
        let m = shr_round(&prod, shrink);

        let scale =
            self.scale as i64 + rhs.scale as i64 + shrink + preshift as i64 - GUARD_BITS as i64;

        Ok(BigFloat {
            m,
            scale: checked_scale(scale)?,
        })
    }

    /// Divides `self` by `rhs` and returns the result. The precision of the
    /// result targets the smaller of the operand precisions, reduced by one
    /// when the divisor aligned to the dividend is numerically smaller, so
    /// that the quotient does not gain an unsupported top bit.
    ///
    /// ## Errors
    ///
    ///  - ExponentOverflow: the scale of the result does not fit `Scale`.
    ///  - DivisionByZero: `rhs` is zero.
    pub fn div(&self, rhs: &Self) -> Result<Self, Error> {
        if rhs.is_zero() {
            return Err(Error::DivisionByZero);
        }

        if self.is_zero() {
            return Ok(self.clone());
        }

        let s1 = self.size();
        let s2 = rhs.size();
        let a = self.m.magnitude();
        let b = rhs.m.magnitude();

        let mut wanted = self.precision().min(rhs.precision());
        let aligned_smaller = if s2 >= s1 {
            &(b >> (s2 - s1)) < a
        } else {
            &(b << (s1 - s2)) < a
        };
        if aligned_smaller && wanted > 0 {
            wanted -= 1;
        }

        let w = wanted + GUARD_BITS;
        let lshift = w as i64 + s2 as i64 - s1 as i64;
        let l = lshift.max(0) as u64;

        let q = (a << l) / b;
        let shrink = q.bits() - w;
        let q = shr_round_mag(&q, shrink);

        let scale =
            self.scale as i64 - rhs.scale as i64 - l as i64 + shrink as i64 + GUARD_BITS as i64;

        let sign = if self.m.sign() == rhs.m.sign() {
            num_bigint::Sign::Plus
        } else {
            num_bigint::Sign::Minus
        };

        Ok(BigFloat {
            m: BigInt::from_biguint(sign, q),
            scale: checked_scale(scale)?,
        })
    }

    /// Returns the remainder of division of `self` by `rhs`. The sign of
    /// the result follows the sign of `self`. The operation is exact: both
    /// mantissas are aligned at the smaller scale before dividing.
    ///
    /// ## Errors
    ///
    ///  - DivisionByZero: `rhs` is zero.
    pub fn rem(&self, rhs: &Self) -> Result<Self, Error> {
        let (r, _, scale) = self.rem_aligned(rhs)?;
        Ok(BigFloat { m: r, scale })
    }

    /// Returns `self` reduced modulo `rhs` with the result taking the sign
    /// of `rhs`, which makes it a floored modulo.
    ///
    /// ## Errors
    ///
    ///  - DivisionByZero: `rhs` is zero.
    pub fn modulo(&self, rhs: &Self) -> Result<Self, Error> {
        let (mut r, mb, scale) = self.rem_aligned(rhs)?;
        if !r.is_zero() && r.sign() != mb.sign() {
            r += mb;
        }
        Ok(BigFloat { m: r, scale })
    }

    fn rem_aligned(&self, rhs: &Self) -> Result<(BigInt, BigInt, Scale), Error> {
        if rhs.is_zero() {
            return Err(Error::DivisionByZero);
        }

        if self.is_zero() {
            return Ok((BigInt::zero(), rhs.m.clone(), self.scale));
        }

        let common = self.scale.min(rhs.scale);
        let ma = &self.m << (self.scale as i64 - common as i64) as u64;
        let mb = &rhs.m << (rhs.scale as i64 - common as i64) as u64;

        Ok((&ma % &mb, mb, common))
    }

    /// Compares `self` to `rhs` at the precision the operands carry:
    /// the numbers are considered equal when their difference stays under
    /// half an ulp of the less precise operand.
    pub fn cmp(&self, rhs: &Self) -> Ordering {
        self.cmp_noise(rhs, 0)
    }

    /// Compares `self` to `rhs` ignoring `n` additional low bits of
    /// the reported precision.
    pub fn cmp_ignoring_low_bits(&self, rhs: &Self, n: u64) -> Ordering {
        self.cmp_noise(rhs, n)
    }

    /// Compares `self` to `rhs` exactly, guard bits included.
    pub fn cmp_exact(&self, rhs: &Self) -> Ordering {
        let common = self.scale.min(rhs.scale);
        let ma = &self.m << (self.scale as i64 - common as i64) as u64;
        let mb = &rhs.m << (rhs.scale as i64 - common as i64) as u64;
        ma.cmp(&mb)
    }

    fn cmp_noise(&self, rhs: &Self, extra: u64) -> Ordering {
        match (self.is_zero(), rhs.is_zero()) {
            (true, true) => return Ordering::Equal,
            (true, false) => {
                return if rhs.m.sign() == num_bigint::Sign::Minus {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
            (false, true) => {
                return if self.m.sign() == num_bigint::Sign::Minus {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
            _ => {}
        }

        let neg = self.m.sign() == num_bigint::Sign::Minus;
        if neg != (rhs.m.sign() == num_bigint::Sign::Minus) {
            return if neg { Ordering::Less } else { Ordering::Greater };
        }

        // in-precision operands more than one exponent step apart cannot
        // be equal; adjacent exponents can still collide, e.g. a power of
        // two against a value rounding up into it, and fall through to the
        // full subtraction below
        if extra == 0 && self.size() > GUARD_BITS && rhs.size() > GUARD_BITS {
            let d = self.exponent() - rhs.exponent();
            if d > 1 {
                return if neg { Ordering::Less } else { Ordering::Greater };
            }
            if d < -1 {
                return if neg { Ordering::Greater } else { Ordering::Less };
            }
        }

        let d = self.scale as i64 - rhs.scale as i64;
        let shift = d.unsigned_abs();
        let diff = if d >= 0 {
            (&self.m << shift) - &rhs.m
        } else {
            &self.m - (&rhs.m << shift)
        };

        if diff.is_zero() {
            return Ordering::Equal;
        }

        if bit_len(&diff) < GUARD_BITS + extra + shift {
            Ordering::Equal
        } else if diff.sign() == num_bigint::Sign::Minus {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }

    // Rounds the magnitude at the guard midpoint so that near-integer noise
    // collapses, and reports whether real fractional bits remain.
    // `p` is the number of fractional bit positions.
    fn rounded_mag(&self, p: u64) -> (BigUint, bool) {
        let q = p.min(GUARD_BITS / 2);
        let r = shr_round_mag(self.m.magnitude(), q) << q;
        let real_frac = any_bit_in_range(&r, GUARD_BITS / 2, p);
        (r, real_frac)
    }

    /// Returns the smallest integer the value rounds up to. Fractional bits
    /// in the lower half of the guard area are treated as noise: a value
    /// sitting within that noise of an integer is that integer already.
    /// The result is re-based as an integer with a scale of zero.
    pub fn ceil(&self) -> Self {
        if self.is_zero() {
            return self.clone();
        }

        let p = GUARD_BITS as i64 - self.scale as i64;
        if p <= 0 {
            return self.clone();
        }

        let (r, real_frac) = self.rounded_mag(p as u64);
        let mut int_mag = r >> p as u64;
        if real_frac && self.m.sign() == num_bigint::Sign::Plus {
            int_mag += 1u32;
        }

        BigFloat {
            m: BigInt::from_biguint(self.m.sign(), int_mag << GUARD_BITS),
            scale: 0,
        }
    }

    /// Returns the largest integer the value rounds down to.
    /// This reuses `ceil` on the negated value.
    pub fn floor(&self) -> Self {
        self.neg().ceil().neg()
    }

    /// Like `ceil`, but the fractional bits are cleared in place:
    /// the scale of the number is preserved.
    pub fn ceil_preserving_accuracy(&self) -> Self {
        if self.is_zero() {
            return self.clone();
        }

        let p = GUARD_BITS as i64 - self.scale as i64;
        if p <= 0 {
            return self.clone();
        }

        let p = p as u64;
        let (r, real_frac) = self.rounded_mag(p);
        let mut kept = (r >> p) << p;
        if real_frac && self.m.sign() == num_bigint::Sign::Plus {
            kept += BigUint::from(1u8) << p;
        }

        BigFloat {
            m: BigInt::from_biguint(self.m.sign(), kept),
            scale: self.scale,
        }
    }

    /// Like `floor`, but the fractional bits are cleared in place:
    /// the scale of the number is preserved.
    pub fn floor_preserving_accuracy(&self) -> Self {
        self.neg().ceil_preserving_accuracy().neg()
    }

    /// Returns the integer part of the number, rounding towards zero.
    pub fn trunc(&self) -> Self {
        if self.is_zero() {
            return self.clone();
        }

        let p = GUARD_BITS as i64 - self.scale as i64;
        if p <= 0 {
            return self.clone();
        }

        let (r, _) = self.rounded_mag(p as u64);

        BigFloat {
            m: BigInt::from_biguint(self.m.sign(), (r >> p as u64) << GUARD_BITS),
            scale: 0,
        }
    }

    /// Returns the fractional part of the number, guard bits included.
    /// The sign of the result follows the sign of `self`.
    pub fn fract(&self) -> Self {
        let p = GUARD_BITS as i64 - self.scale as i64;
        if p <= 0 {
            return BigFloat {
                m: BigInt::zero(),
                scale: self.scale,
            };
        }

        let p = p as u64;
        if p >= self.size() {
            return self.clone();
        }

        let kept = self.m.magnitude() % (BigUint::from(1u8) << p);

        BigFloat {
            m: BigInt::from_biguint(self.m.sign(), kept),
            scale: self.scale,
        }
    }

    /// Returns true if the value is an integer. Fractional bits in the
    /// lower half of the guard area are treated as noise.
    pub fn is_integer(&self) -> bool {
        if self.is_zero() {
            return true;
        }

        let p = GUARD_BITS as i64 - self.scale as i64;
        if p <= 0 {
            return true;
        }

        let (_, real_frac) = self.rounded_mag(p as u64);
        !real_frac
    }

    /// Appends `bits` zero bits at the bottom of the mantissa. The value
    /// is unchanged.
    ///
    /// ## Errors
    ///
    ///  - ExponentOverflow: the scale of the result does not fit `Scale`.
    ///  - InvalidArgument: `bits` does not fit the scale range.
    pub fn extend_precision(&self, bits: u64) -> Result<Self, Error> {
        let sh = i64::try_from(bits).map_err(|_| Error::InvalidArgument)?;

        Ok(BigFloat {
            m: &self.m << bits,
            scale: checked_scale(self.scale as i64 - sh)?,
        })
    }

    /// Drops `bits` low bits of the mantissa without rounding.
    ///
    /// ## Errors
    ///
    ///  - ExponentOverflow: the scale of the result does not fit `Scale`.
    ///  - InvalidArgument: `bits` does not fit the scale range.
    pub fn reduce_precision(&self, bits: u64) -> Result<Self, Error> {
        let sh = i64::try_from(bits).map_err(|_| Error::InvalidArgument)?;

        Ok(BigFloat {
            m: BigInt::from_biguint(self.m.sign(), self.m.magnitude() >> bits),
            scale: checked_scale(self.scale as i64 + sh)?,
        })
    }

    /// Rounds or extends the mantissa so that exactly `p` reported bits
    /// remain. When rounding carries into a new top bit, the mantissa
    /// becomes a power of two and the scale takes up the difference.
    ///
    /// ## Errors
    ///
    ///  - ExponentOverflow: the scale of the result does not fit `Scale`.
    pub fn set_precision(&self, p: u64) -> Result<Self, Error> {
        let target = p + GUARD_BITS;
        let size = self.size();

        match size.cmp(&target) {
            Ordering::Equal => Ok(self.clone()),
            Ordering::Less => self.extend_precision(target - size),
            Ordering::Greater => {
                let remove = size - target;
                let (m, carried) = shr_round_with_carry(&self.m, remove);
                let (m, extra) = if carried { (shr_round(&m, 1), 1) } else { (m, 0) };

                Ok(BigFloat {
                    m,
                    scale: checked_scale(self.scale as i64 + remove as i64 + extra)?,
                })
            }
        }
    }
}

impl Default for BigFloat {
    fn default() -> Self {
        BigFloat::new()
    }
}

impl PartialEq for BigFloat {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for BigFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

macro_rules! impl_binary_op {
    ($tr:ident, $f:ident, $tr_assign:ident, $f_assign:ident, $method:ident, $msg:literal) => {
        impl $tr for BigFloat {
            type Output = BigFloat;

            fn $f(self, rhs: BigFloat) -> BigFloat {
                BigFloat::$method(&self, &rhs).expect($msg)
            }
        }

        impl $tr<&BigFloat> for BigFloat {
            type Output = BigFloat;

            fn $f(self, rhs: &BigFloat) -> BigFloat {
                BigFloat::$method(&self, rhs).expect($msg)
            }
        }

        impl $tr for &BigFloat {
            type Output = BigFloat;

            fn $f(self, rhs: &BigFloat) -> BigFloat {
                BigFloat::$method(self, rhs).expect($msg)
            }
        }

        impl $tr_assign<&BigFloat> for BigFloat {
            fn $f_assign(&mut self, rhs: &BigFloat) {
                *self = BigFloat::$method(self, rhs).expect($msg);
            }
        }

        impl $tr_assign for BigFloat {
            fn $f_assign(&mut self, rhs: BigFloat) {
                *self = BigFloat::$method(self, &rhs).expect($msg);
            }
        }
    };
}

impl_binary_op!(Add, add, AddAssign, add_assign, add, "addition failed");
impl_binary_op!(Sub, sub, SubAssign, sub_assign, sub, "subtraction failed");
impl_binary_op!(Mul, mul, MulAssign, mul_assign, mul, "multiplication failed");
impl_binary_op!(Div, div, DivAssign, div_assign, div, "division failed");
impl_binary_op!(Rem, rem, RemAssign, rem_assign, rem, "remainder failed");

impl Neg for BigFloat {
    type Output = BigFloat;

    fn neg(self) -> BigFloat {
        BigFloat::neg(&self)
    }
}

impl Neg for &BigFloat {
    type Output = BigFloat;

    fn neg(self) -> BigFloat {
        BigFloat::neg(self)
    }
}
