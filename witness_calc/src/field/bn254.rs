use std::{
    fmt,
    hash::{Hash, Hasher},
    iter::{Product, Sum},
    marker::PhantomData,
    ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};

use halo2curves::{bn256::Fr, ff::Field as Halo2Field};
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{DecimalVisitor, Field, U256};

/// Scalar field of BN254, the default field of circom circuits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BN254 {
    v: Fr,
}

const MODULUS: U256 = U256::from_words(
    0x30644e72e131a029b85045b68181585d,
    0x2833e84879b9709143e1f593f0000001,
);

impl Field for BN254 {
    const MODULUS: U256 = MODULUS;

    fn zero() -> Self {
        BN254 { v: Fr::ZERO }
    }

    fn is_zero(&self) -> bool {
        bool::from(self.v.is_zero())
    }

    fn one() -> Self {
        BN254 { v: Fr::ONE }
    }

    fn random_unsafe(rng: impl RngCore) -> Self {
        BN254 { v: Fr::random(rng) }
    }

    fn inv(&self) -> Option<Self> {
        self.v.invert().map(|v| BN254 { v }).into()
    }

    fn to_u256(&self) -> U256 {
        U256::from_le_bytes(self.v.to_bytes())
    }

    fn from_u256(x: U256) -> Self {
        let b = (x % MODULUS).to_le_bytes();
        // a reduced value always has a canonical encoding
        let v = Option::<Fr>::from(Fr::from_bytes(&b)).unwrap_or(Fr::ZERO);
        BN254 { v }
    }
}

// ====================================
// Arithmetics for BN254
// ====================================

impl Mul<&BN254> for BN254 {
    type Output = BN254;
    #[inline(always)]
    fn mul(self, rhs: &BN254) -> Self::Output {
        BN254 {
            v: self.v.mul(&rhs.v),
        }
    }
}

impl Mul for BN254 {
    type Output = BN254;
    #[inline(always)]
    #[allow(clippy::op_ref)]
    fn mul(self, rhs: BN254) -> Self::Output {
        self * &rhs
    }
}

impl MulAssign<&BN254> for BN254 {
    #[inline(always)]
    fn mul_assign(&mut self, rhs: &BN254) {
        *self = *self * rhs;
    }
}

impl MulAssign for BN254 {
    #[inline(always)]
    fn mul_assign(&mut self, rhs: Self) {
        *self *= &rhs;
    }
}

impl<T: ::core::borrow::Borrow<BN254>> Product<T> for BN254 {
    fn product<I: Iterator<Item = T>>(iter: I) -> Self {
        iter.fold(Self::one(), |acc, item| acc * item.borrow())
    }
}

impl Add<&BN254> for BN254 {
    type Output = BN254;
    #[inline(always)]
    fn add(self, rhs: &BN254) -> Self::Output {
        BN254 {
            v: self.v.add(&rhs.v),
        }
    }
}

impl Add for BN254 {
    type Output = BN254;
    #[inline(always)]
    #[allow(clippy::op_ref)]
    fn add(self, rhs: BN254) -> Self::Output {
        self + &rhs
    }
}

impl AddAssign<&BN254> for BN254 {
    #[inline(always)]
    fn add_assign(&mut self, rhs: &BN254) {
        *self = *self + rhs;
    }
}

impl AddAssign for BN254 {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        *self += &rhs;
    }
}

impl<T: ::core::borrow::Borrow<BN254>> Sum<T> for BN254 {
    fn sum<I: Iterator<Item = T>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, item| acc + item.borrow())
    }
}

impl Neg for BN254 {
    type Output = BN254;
    #[inline(always)]
    fn neg(self) -> Self::Output {
        BN254 { v: self.v.neg() }
    }
}

impl Sub<&BN254> for BN254 {
    type Output = BN254;
    #[inline(always)]
    fn sub(self, rhs: &BN254) -> Self::Output {
        BN254 {
            v: self.v.sub(&rhs.v),
        }
    }
}

impl Sub for BN254 {
    type Output = BN254;
    #[inline(always)]
    #[allow(clippy::op_ref)]
    fn sub(self, rhs: BN254) -> Self::Output {
        self - &rhs
    }
}

impl SubAssign<&BN254> for BN254 {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: &BN254) {
        *self = *self - rhs;
    }
}

impl SubAssign for BN254 {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Self) {
        *self -= &rhs;
    }
}

impl From<u32> for BN254 {
    #[inline(always)]
    fn from(x: u32) -> Self {
        BN254 {
            v: Fr::from(x as u64),
        }
    }
}

impl From<u64> for BN254 {
    #[inline(always)]
    fn from(x: u64) -> Self {
        BN254 { v: Fr::from(x) }
    }
}

impl Hash for BN254 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.v.to_bytes().hash(state);
    }
}

impl fmt::Display for BN254 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_u256())
    }
}

impl Serialize for BN254 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for BN254 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DecimalVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bn254_serde() {
        let x = BN254::random_unsafe(rand::thread_rng());
        let s = serde_json::to_string(&x).unwrap();
        let y: BN254 = serde_json::from_str(&s).unwrap();
        assert_eq!(x, y);
        let z: BN254 = serde_json::from_str("42").unwrap();
        assert_eq!(z, BN254::from(42u32));
    }

    #[test]
    fn test_bn254_u256() {
        assert_eq!(
            BN254::MODULUS.to_string(),
            "21888242871839275222246405745257275088548364400416034343698204186575808495617"
        );
        let x = BN254::random_unsafe(rand::thread_rng());
        let y = x.to_u256();
        let z = BN254::from_u256(y);
        assert_eq!(x, z);
        let x = BN254::from(123u32);
        assert_eq!(x.to_u256(), U256::from(123u32));
        assert!(BN254::from_u256(MODULUS).is_zero());
        assert_eq!(BN254::from_u256(MODULUS + U256::from(5u32)), BN254::from(5u32));
    }

    #[test]
    fn test_bn254_inv() {
        assert_eq!(BN254::zero().inv(), None);
        let x = BN254::from(7u32);
        assert_eq!(x * x.inv().unwrap(), BN254::one());
        assert_eq!((-BN254::one()).to_u256(), MODULUS - U256::ONE);
    }
}
