//! Serialization of BigFloat.
//! The raw parts are serialized losslessly as a (mantissa, scale) tuple.

use crate::num::BigFloat;
use serde::{Serialize, Serializer};

impl Serialize for BigFloat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.mantissa(), self.scale()).serialize(serializer)
    }
}

#[cfg(test)]
mod tests {

    use serde_json::{from_str, to_string};
    use std::cmp::Ordering;

    use crate::common::util::random_bigint;
    use crate::BigFloat;
    use rand::random;

    #[test]
    fn to_json() {
        // the round trip preserves the raw parts exactly
        for x in [
            BigFloat::new(),
            BigFloat::from(7i64),
            BigFloat::from(-5i32),
            BigFloat::from(u128::MAX),
            BigFloat::from_f64(-83.591552734375).unwrap(),
            BigFloat::from_f64(f64::from_bits(1)).unwrap(),
        ] {
            let s = to_string(&x).unwrap();
            let y: BigFloat = from_str(&s).unwrap();

            assert_eq!(x.mantissa(), y.mantissa());
            assert_eq!(x.scale(), y.scale());
            assert_eq!(x.cmp_exact(&y), Ordering::Equal);
        }

        for _ in 0..1000 {
            let bits = random::<u64>() % 200 + 1;
            let scale = random::<i32>() % 10000;
            let x = BigFloat::from_parts(random_bigint(bits), scale);

            let s = to_string(&x).unwrap();
            let y: BigFloat = from_str(&s).unwrap();

            assert_eq!(x.mantissa(), y.mantissa());
            assert_eq!(x.scale(), y.scale());
        }
    }
}
