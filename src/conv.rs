//! Conversion utilities.

use crate::common::util::top_u64;
use crate::defs::{Error, Scale, Sign, GUARD_BITS};
use crate::num::BigFloat;
use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for BigFloat {
                fn from(v: $t) -> Self {
                    BigFloat::from_parts(BigInt::from(v) << GUARD_BITS, 0)
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl BigFloat {
    /// Constructs a number from an f64 value. The conversion is exact.
    ///
    /// ## Errors
    ///
    ///  - ExponentOverflow: `f` is infinite or NaN.
    pub fn from_f64(f: f64) -> Result<Self, Error> {
        if !f.is_finite() {
            let s = if f.is_sign_positive() { Sign::Pos } else { Sign::Neg };
            return Err(Error::ExponentOverflow(s));
        }

        if f == 0.0 {
            return Ok(Self::new());
        }

        let u = f.to_bits();
        let biased = (u >> 52) as i64 & 0x7ff;
        let frac = u & ((1u64 << 52) - 1);

        // denormals carry no implicit leading bit
        let (m, scale) = if biased == 0 {
            (frac, -1074)
        } else {
            (frac | (1u64 << 52), biased - 1075)
        };

        let mut m = BigInt::from(m) << GUARD_BITS;
        if f.is_sign_negative() {
            m = -m;
        }

        Ok(Self::from_parts(m, scale as Scale))
    }

    /// Constructs a number from an f32 value. The conversion is exact.
    ///
    /// ## Errors
    ///
    ///  - ExponentOverflow: `f` is infinite or NaN.
    pub fn from_f32(f: f32) -> Result<Self, Error> {
        if !f.is_finite() {
            let s = if f.is_sign_positive() { Sign::Pos } else { Sign::Neg };
            return Err(Error::ExponentOverflow(s));
        }

        if f == 0.0 {
            return Ok(Self::new());
        }

        let u = f.to_bits();
        let biased = (u >> 23) as i64 & 0xff;
        let frac = (u & ((1u32 << 23) - 1)) as u64;

        let (m, scale) = if biased == 0 {
            (frac, -149)
        } else {
            (frac | (1u64 << 23), biased - 150)
        };

        let mut m = BigInt::from(m) << GUARD_BITS;
        if f.is_sign_negative() {
            m = -m;
        }

        Ok(Self::from_parts(m, scale as Scale))
    }

    /// Converts the number to f64, truncating the mantissa to 53 bits.
    /// A number too large in magnitude for f64 becomes infinite, a number
    /// smaller than the smallest subnormal collapses to zero.
    pub fn as_f64(&self) -> f64 {
        if self.is_zero() {
            return 0.0;
        }

        let mag = self.mantissa().magnitude();
        let sz = self.size();
        let mut e = self.scale() as i64 - GUARD_BITS as i64;

        let m = if sz > 53 {
            e += (sz - 53) as i64;
            top_u64(mag, 53)
        } else {
            top_u64(mag, 64)
        };

        // the power is applied in two steps so that a value in the
        // subnormal range survives the scaling
        let e = e.clamp(-2200, 2200) as i32;
        let half = e / 2;
        let f = m as f64 * 2f64.powi(half) * 2f64.powi(e - half);

        if self.is_negative() {
            -f
        } else {
            f
        }
    }

    /// Converts the number to f32, truncating the mantissa to 24 bits.
    /// A number too large in magnitude for f32 becomes infinite, a number
    /// smaller than the smallest subnormal collapses to zero.
    pub fn as_f32(&self) -> f32 {
        if self.is_zero() {
            return 0.0;
        }

        let mag = self.mantissa().magnitude();
        let sz = self.size();
        let mut e = self.scale() as i64 - GUARD_BITS as i64;

        let m = if sz > 24 {
            e += (sz - 24) as i64;
            top_u64(mag, 24)
        } else {
            top_u64(mag, 64)
        };

        let e = e.clamp(-500, 500) as i32;
        let half = e / 2;
        let f = m as f32 * 2f32.powi(half) * 2f32.powi(e - half);

        if self.is_negative() {
            -f
        } else {
            f
        }
    }

    // integer part of the number, truncated toward zero
    fn int_part(&self) -> BigInt {
        if self.is_zero() || self.exponent() <= 0 {
            return BigInt::zero();
        }

        let e = self.scale() as i64 - GUARD_BITS as i64;
        let mag = if e >= 0 {
            self.mantissa().magnitude() << e as u64
        } else {
            self.mantissa().magnitude() >> e.unsigned_abs()
        };

        BigInt::from_biguint(self.mantissa().sign(), mag)
    }
}

/// The integer conversions truncate the number toward zero and return None
/// when the truncated value does not fit the target type.
impl ToPrimitive for BigFloat {
    fn to_i64(&self) -> Option<i64> {
        self.to_i128().and_then(|v| i64::try_from(v).ok())
    }

    fn to_u64(&self) -> Option<u64> {
        self.to_u128().and_then(|v| u64::try_from(v).ok())
    }

    fn to_i128(&self) -> Option<i128> {
        if self.exponent() > 128 {
            return None;
        }

        self.int_part().to_i128()
    }

    fn to_u128(&self) -> Option<u128> {
        if self.exponent() > 128 {
            return None;
        }

        self.int_part().to_u128()
    }

    fn to_f64(&self) -> Option<f64> {
        Some(self.as_f64())
    }

    fn to_f32(&self) -> Option<f32> {
        Some(self.as_f32())
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use num_traits::One;
    use rand::random;
    use std::cmp::Ordering;

    #[test]
    fn test_from_int() {
        assert!(BigFloat::from(0i32).is_zero());

        let n = BigFloat::from(-5i64);
        assert_eq!(n.mantissa(), &(BigInt::from(-5) << 32));
        assert_eq!(n.scale(), 0);

        // all widths agree
        assert_eq!(
            BigFloat::from(42u8).cmp_exact(&BigFloat::from(42i128)),
            Ordering::Equal
        );
        assert_eq!(
            BigFloat::from(-7i8).cmp_exact(&BigFloat::from(-7isize)),
            Ordering::Equal
        );

        assert_eq!(BigFloat::from(u128::MAX).to_u128(), Some(u128::MAX));
        assert_eq!(BigFloat::from(i128::MIN).to_i128(), Some(i128::MIN));

        for _ in 0..1000 {
            let v = random::<i64>();
            assert_eq!(BigFloat::from(v).to_i64(), Some(v));

            let v = random::<u64>();
            assert_eq!(BigFloat::from(v).to_u64(), Some(v));
        }
    }

    #[test]
    fn test_from_f64() {
        assert!(BigFloat::from_f64(0.0).unwrap().is_zero());
        assert!(BigFloat::from_f64(-0.0).unwrap().is_zero());

        assert!(matches!(
            BigFloat::from_f64(f64::NAN).unwrap_err(),
            Error::ExponentOverflow(_)
        ));
        assert_eq!(
            BigFloat::from_f64(f64::INFINITY).unwrap_err(),
            Error::ExponentOverflow(Sign::Pos)
        );
        assert_eq!(
            BigFloat::from_f64(f64::NEG_INFINITY).unwrap_err(),
            Error::ExponentOverflow(Sign::Neg)
        );

        // integer valued floats match the integer conversion
        assert_eq!(
            BigFloat::from_f64(2.0)
                .unwrap()
                .cmp_exact(&BigFloat::from(2i64)),
            Ordering::Equal
        );
        assert_eq!(
            BigFloat::from_f64(-1024.0)
                .unwrap()
                .cmp_exact(&BigFloat::from(-1024i64)),
            Ordering::Equal
        );

        // 5.5 = 11 * 2^-1
        let n = BigFloat::from_f64(5.5).unwrap();
        assert_eq!(
            n.cmp_exact(&BigFloat::from_parts(BigInt::from(11) << 32, -1)),
            Ordering::Equal
        );

        // exact round trips, denormals included
        for f in [
            1.0,
            -1.0,
            0.5,
            std::f64::consts::PI,
            f64::MAX,
            f64::MIN,
            f64::MIN_POSITIVE,
            f64::from_bits(1),
            f64::from_bits(0xfffffffffffff),
        ] {
            assert_eq!(BigFloat::from_f64(f).unwrap().as_f64(), f);
        }

        for _ in 0..1000 {
            let f = f64::from_bits(random::<u64>());
            if f.is_finite() {
                assert_eq!(BigFloat::from_f64(f).unwrap().as_f64(), f);
            }
        }
    }

    #[test]
    fn test_from_f32() {
        assert!(BigFloat::from_f32(0.0).unwrap().is_zero());

        assert!(matches!(
            BigFloat::from_f32(f32::NAN).unwrap_err(),
            Error::ExponentOverflow(_)
        ));
        assert_eq!(
            BigFloat::from_f32(f32::NEG_INFINITY).unwrap_err(),
            Error::ExponentOverflow(Sign::Neg)
        );

        // -2.5 = -5 * 2^-1
        let n = BigFloat::from_f32(-2.5).unwrap();
        assert_eq!(
            n.cmp_exact(&BigFloat::from_parts(BigInt::from(-5) << 32, -1)),
            Ordering::Equal
        );

        for f in [1.0f32, -0.625, f32::MAX, f32::MIN_POSITIVE, f32::from_bits(1)] {
            assert_eq!(BigFloat::from_f32(f).unwrap().as_f32(), f);
        }

        for _ in 0..1000 {
            let f = f32::from_bits(random::<u32>());
            if f.is_finite() {
                assert_eq!(BigFloat::from_f32(f).unwrap().as_f32(), f);
            }
        }
    }

    #[test]
    fn test_as_f64() {
        // the mantissa is truncated, not rounded
        let n = BigFloat::from_parts(BigInt::from((1u64 << 54) - 1), 32);
        assert_eq!(n.as_f64(), ((1u64 << 54) - 2) as f64);

        // huge and tiny magnitudes saturate
        let n = BigFloat::from_parts(BigInt::one() << 3000, 0);
        assert_eq!(n.as_f64(), f64::INFINITY);
        assert_eq!(n.neg().as_f64(), f64::NEG_INFINITY);

        let n = BigFloat::from_parts(BigInt::one() << 40, -3000);
        assert_eq!(n.as_f64(), 0.0);

        // a value in the denormal range of f64
        let n = BigFloat::from_parts(BigInt::from(3) << 32, -1073);
        assert_eq!(n.as_f64(), f64::from_bits(6));

        // guard noise converts to zero
        let n = BigFloat::from_parts(BigInt::from(3), 0);
        assert!(n.is_zero());
        assert_eq!(n.as_f64(), 0.0);
    }

    #[test]
    fn test_to_int() {
        // truncation toward zero
        assert_eq!(BigFloat::from_f64(3.7).unwrap().to_i64(), Some(3));
        assert_eq!(BigFloat::from_f64(-3.7).unwrap().to_i64(), Some(-3));
        assert_eq!(BigFloat::from_f64(-0.5).unwrap().to_i64(), Some(0));
        assert_eq!(BigFloat::from_f64(-0.5).unwrap().to_u64(), Some(0));
        assert_eq!(BigFloat::new().to_i64(), Some(0));

        // range limits
        assert_eq!(BigFloat::from(i64::MAX).to_i64(), Some(i64::MAX));
        assert_eq!(BigFloat::from(i64::MIN).to_i64(), Some(i64::MIN));
        assert_eq!(BigFloat::from(1u64 << 63).to_i64(), None);
        assert_eq!(BigFloat::from(1u64 << 63).to_u64(), Some(1 << 63));
        assert_eq!(BigFloat::from(-1i32).to_u64(), None);
        assert_eq!(BigFloat::from(u128::MAX).to_i128(), None);
        assert_eq!(BigFloat::from(u128::MAX).to_u128(), Some(u128::MAX));

        // far out of range of any integer
        let n = BigFloat::from_parts(BigInt::one() << 40, 1000);
        assert_eq!(n.to_u128(), None);
        assert_eq!(n.to_i64(), None);

        for _ in 0..1000 {
            let f = (random::<f64>() - 0.5) * 1.0e9;
            let n = BigFloat::from_f64(f).unwrap();
            assert_eq!(n.to_i64(), Some(f.trunc() as i64));
        }
    }
}
