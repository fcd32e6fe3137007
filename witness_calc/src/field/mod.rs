use std::{
    fmt::{self, Debug},
    hash::Hash,
    iter::{Product, Sum},
    ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};

pub use ethnum::U256;
use rand::RngCore;
use serde::{de::DeserializeOwned, Serialize};

pub mod bn254;
pub mod m31;
pub mod ops;

pub use bn254::BN254;
pub use m31::M31;

/// Prime field the witness is computed over.
///
/// Every value is kept reduced; `to_u256` returns the canonical
/// representative in `[0, MODULUS)`.
pub trait Field:
    Copy
    + Clone
    + Debug
    + Hash
    + Default
    + PartialEq
    + Eq
    + From<u32>
    + From<u64>
    + Neg<Output = Self>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Sum
    + Product
    + for<'a> Add<&'a Self, Output = Self>
    + for<'a> Sub<&'a Self, Output = Self>
    + for<'a> Mul<&'a Self, Output = Self>
    + for<'a> Sum<&'a Self>
    + for<'a> Product<&'a Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + for<'a> AddAssign<&'a Self>
    + for<'a> SubAssign<&'a Self>
    + for<'a> MulAssign<&'a Self>
    + fmt::Display
    + Serialize
    + DeserializeOwned
    + 'static
{
    /// Modulus
    const MODULUS: U256;

    /// Zero element
    fn zero() -> Self;

    /// Is zero
    fn is_zero(&self) -> bool;

    /// Identity element
    fn one() -> Self;

    /// create a random element from rng.
    /// test only -- the output may not be uniformly random.
    fn random_unsafe(rng: impl RngCore) -> Self;

    #[inline(always)]
    fn square(&self) -> Self {
        *self * *self
    }

    /// find the inverse of the element; return None if not exist
    fn inv(&self) -> Option<Self>;

    /// Canonical representative.
    fn to_u256(&self) -> U256;

    /// Reduces `x` modulo the field modulus.
    fn from_u256(x: U256) -> Self;

    /// Number of bytes used for one element in the `.wtns` format.
    fn n8() -> usize {
        let bits = 256 - Self::MODULUS.leading_zeros() as usize;
        (bits - 1) / 64 * 8 + 8
    }
}

/// Parses a decimal or `0x`-prefixed hex string, with an optional leading
/// `-` meaning `p - x`. Values are reduced modulo `p`.
pub fn parse_field<F: Field>(s: &str) -> Option<F> {
    let s = s.trim();
    let (neg, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let v = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => U256::from_str_radix(hex, 16).ok()?,
        None => U256::from_str_radix(digits, 10).ok()?,
    };
    let x = F::from_u256(v);
    Some(if neg { -x } else { x })
}

pub(crate) struct DecimalVisitor<F>(pub(crate) std::marker::PhantomData<F>);

impl<F: Field> serde::de::Visitor<'_> for DecimalVisitor<F> {
    type Value = F;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a field element as a decimal string or an integer")
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<F, E> {
        parse_field(v).ok_or_else(|| E::custom(format!("invalid field element {v:?}")))
    }

    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<F, E> {
        Ok(F::from(v))
    }

    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<F, E> {
        let x = F::from(v.unsigned_abs());
        Ok(if v < 0 { -x } else { x })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field() {
        assert_eq!(parse_field::<BN254>("11"), Some(BN254::from(11u32)));
        assert_eq!(parse_field::<BN254>("0x1f"), Some(BN254::from(31u32)));
        assert_eq!(parse_field::<BN254>("-1"), Some(-BN254::one()));
        assert_eq!(parse_field::<M31>("2147483648"), Some(M31::one()));
        assert_eq!(parse_field::<BN254>("twelve"), None);
    }

    #[test]
    fn test_n8() {
        assert_eq!(BN254::n8(), 32);
        assert_eq!(M31::n8(), 8);
    }
}
