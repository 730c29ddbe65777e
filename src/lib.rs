//! Arbitrary precision floating point numbers that track the precision of every value.
//!
//! A [BigFloat] is a signed unbounded mantissa paired with a binary scale; the value
//! represented is `mantissa * 2^(scale - GUARD_BITS)`. The low [GUARD_BITS] bits of
//! every mantissa hold rounding noise and are not counted as precision, so precision
//! is not a global setting but a property a value carries: operations never report
//! more precision than their least precise input supports, and rounding is always
//! half away from zero.
//!
//! ```rust
//! use guard_float::BigFloat;
//!
//! // the reported precision travels with every value
//! let two = BigFloat::from(2i64).extend_precision(190).unwrap();
//! assert_eq!(two.precision(), 192);
//!
//! // sqrt(2) squared returns 2 within the tracked precision
//! let r = two.sqrt().unwrap();
//! assert_eq!(r.mul(&r).unwrap(), two);
//! ```
//!
//! String parsing and formatting are not part of the crate: the raw parts of a number
//! and the shift-and-round primitives are public, so external formatters can round
//! correctly without duplicating the logic. The optional `serde` feature serializes
//! the raw parts losslessly.

#![deny(missing_docs)]
#![deny(clippy::suspicious)]
#![allow(clippy::should_implement_trait)]

mod common;
mod conv;
mod defs;
mod mantissa;
mod num;
mod ops;

#[cfg(feature = "serde")]
mod for_3rd;

pub use crate::defs::Error;
pub use crate::defs::Scale;
pub use crate::defs::Sign;
pub use crate::num::BigFloat;

pub use crate::defs::GUARD_BITS;
pub use crate::defs::SCALE_MAX;
pub use crate::defs::SCALE_MIN;

pub use crate::mantissa::bit_len;
pub use crate::mantissa::shr_round;
pub use crate::mantissa::shr_round_with_carry;

pub use crate::ops::inv_bits;
pub use crate::ops::isqrt;
pub use crate::ops::nth_root_int;
pub use crate::ops::pow_msb;
