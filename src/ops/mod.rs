//! High-level operations on the numbers.

mod inv;
mod pow;
mod root;
mod sqrt;

pub use inv::inv_bits;
pub use pow::pow_msb;
pub use root::nth_root_int;
pub use sqrt::isqrt;
