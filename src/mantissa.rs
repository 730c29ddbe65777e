//! Low-level operations on the mantissa of a number.

use num_bigint::{BigInt, BigUint};
use num_traits::Zero;

/// Bit length of the magnitude of `x`.
#[inline]
pub fn bit_len(x: &BigInt) -> u64 {
    x.magnitude().bits()
}

/// Shifts the magnitude right by `n` bits, rounding half away from zero.
pub(crate) fn shr_round_mag(m: &BigUint, n: u64) -> BigUint {
    if n == 0 {
        return m.clone();
    }

    ((m >> (n - 1)) + 1u32) >> 1u32
}

/// Shifts `x` right by `n` bits rounding half away from zero,
/// e.g. `0b111` shifted right by one becomes `0b100`.
/// A negative `n` shifts to the left, which is always exact.
pub fn shr_round(x: &BigInt, n: i64) -> BigInt {
    if n <= 0 {
        return x << n.unsigned_abs();
    }

    let r = shr_round_mag(x.magnitude(), n as u64);
    BigInt::from_biguint(x.sign(), r)
}

/// Shifts `x` right by `n` bits rounding half away from zero, and reports
/// whether rounding carried into a new top bit, i.e. whether the result is
/// one bit longer than a plain shift would leave. When all bits are shifted
/// out and the value still rounds up to 1, the carry is reported as well.
pub fn shr_round_with_carry(x: &BigInt, n: u64) -> (BigInt, bool) {
    if n == 0 || x.is_zero() {
        return (x.clone(), false);
    }

    let len = x.magnitude().bits();
    let r = shr_round_mag(x.magnitude(), n);
    let carried = r.bits() > len.saturating_sub(n);

    (BigInt::from_biguint(x.sign(), r), carried)
}
