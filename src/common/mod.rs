//! Helpers shared by the rest of the crate.

pub mod consts;
pub mod util;
