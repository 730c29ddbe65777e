//! Definitions.

use core::fmt::Display;

/// The base-2 scale of a number: the power of two the mantissa is weighted by,
/// counted from the top of the guard region. The value of a number is
/// `mantissa * 2^(scale - GUARD_BITS)`.
pub type Scale = i32;

/// Maximum scale value.
pub const SCALE_MAX: Scale = Scale::MAX;

/// Minimum scale value.
pub const SCALE_MIN: Scale = Scale::MIN;

/// Number of low-order guard bits every mantissa carries below its reported
/// precision. Guard bits absorb rounding noise; they are never counted as
/// precision.
pub const GUARD_BITS: u64 = 32;

/// Extra low bits of the larger operand that multiplication retains when it
/// pre-shifts a size disparity away, so that the final rounding of the product
/// sees accurate input.
pub const KEEP_EXTRA_PREC: u64 = 16;

/// Size disparity below which multiplication skips pre-shifting entirely.
pub const PRESHIFT_THRESHOLD: u64 = 32;

/// Sign.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
pub enum Sign {
    /// Negative.
    Neg = -1,

    /// Positive.
    Pos = 1,
}

impl Sign {
    /// Changes the sign to the opposite.
    pub fn invert(&self) -> Self {
        match *self {
            Sign::Pos => Sign::Neg,
            Sign::Neg => Sign::Pos,
        }
    }

    /// Returns true if `self` is positive.
    pub fn is_positive(&self) -> bool {
        *self == Sign::Pos
    }

    /// Returns true if `self` is negative.
    pub fn is_negative(&self) -> bool {
        *self == Sign::Neg
    }

    /// Returns 1 for the positive sign and -1 for the negative sign.
    pub fn to_int(&self) -> i8 {
        *self as i8
    }
}

/// Possible errors.
#[derive(Debug, Clone, Copy)]
pub enum Error {
    /// The scale or an internal shift counter becomes greater than the upper
    /// limit of the range of scale values.
    ExponentOverflow(Sign),

    /// Divizor is zero.
    DivisionByZero,

    /// Invalid argument.
    InvalidArgument,
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let repr = match self {
            Error::ExponentOverflow(s) => {
                if s.is_positive() {
                    "positive overflow"
                } else {
                    "negative overflow"
                }
            }
            Error::DivisionByZero => "division by zero",
            Error::InvalidArgument => "invalid argument",
        };
        f.write_str(repr)
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::ExponentOverflow(l0), Self::ExponentOverflow(r0)) => l0 == r0,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}
