//! Deserialization of BigFloat.

use crate::defs::Scale;
use crate::num::BigFloat;
use num_bigint::BigInt;
use serde::{Deserialize, Deserializer};

impl<'de> Deserialize<'de> for BigFloat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (m, scale) = <(BigInt, Scale)>::deserialize(deserializer)?;

        Ok(BigFloat::from_parts(m, scale))
    }
}
