//! Static constants.

use crate::num::BigFloat;
use lazy_static::lazy_static;

lazy_static! {

    /// 1
    pub(crate) static ref ONE: BigFloat = BigFloat::from(1i64);
}
