use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{
    fmt,
    iter::{Product, Sum},
    marker::PhantomData,
    ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};

use super::{DecimalVisitor, Field, U256};

pub const M31_MOD: u32 = 2147483647;

#[inline]
fn mod_reduce_u64(x: u64) -> u64 {
    (x & M31_MOD as u64) + (x >> 31)
}

/// Mersenne-31 field. Small enough that overflow paths in circuits are easy
/// to reach in tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct M31 {
    v: u32,
}

impl Field for M31 {
    const MODULUS: U256 = U256::new(M31_MOD as u128);

    #[inline(always)]
    fn zero() -> Self {
        M31 { v: 0 }
    }

    #[inline(always)]
    fn one() -> Self {
        M31 { v: 1 }
    }

    #[inline(always)]
    fn is_zero(&self) -> bool {
        self.v == 0
    }

    fn random_unsafe(mut rng: impl RngCore) -> Self {
        rng.next_u32().into()
    }

    fn inv(&self) -> Option<Self> {
        self.try_inverse()
    }

    fn to_u256(&self) -> U256 {
        U256::new(self.v as u128)
    }

    fn from_u256(x: U256) -> Self {
        M31 {
            v: (x % U256::new(M31_MOD as u128)).as_u32(),
        }
    }
}

// ====================================
// Arithmetics for M31
// ====================================

impl Mul<&M31> for M31 {
    type Output = M31;
    #[inline(always)]
    fn mul(self, rhs: &M31) -> Self::Output {
        let mut vv = mod_reduce_u64(self.v as u64 * rhs.v as u64);
        if vv >= M31_MOD as u64 {
            vv -= M31_MOD as u64;
        }
        M31 { v: vv as u32 }
    }
}

impl Mul for M31 {
    type Output = M31;
    #[inline(always)]
    #[allow(clippy::op_ref)]
    fn mul(self, rhs: M31) -> Self::Output {
        self * &rhs
    }
}

impl MulAssign<&M31> for M31 {
    #[inline(always)]
    fn mul_assign(&mut self, rhs: &M31) {
        *self = *self * rhs;
    }
}

impl MulAssign for M31 {
    #[inline(always)]
    fn mul_assign(&mut self, rhs: Self) {
        *self *= &rhs;
    }
}

impl<T: ::core::borrow::Borrow<M31>> Product<T> for M31 {
    fn product<I: Iterator<Item = T>>(iter: I) -> Self {
        iter.fold(Self::one(), |acc, item| acc * item.borrow())
    }
}

impl Add<&M31> for M31 {
    type Output = M31;
    #[inline(always)]
    fn add(self, rhs: &M31) -> Self::Output {
        let mut vv = self.v + rhs.v;
        if vv >= M31_MOD {
            vv -= M31_MOD;
        }
        M31 { v: vv }
    }
}

impl Add for M31 {
    type Output = M31;
    #[inline(always)]
    #[allow(clippy::op_ref)]
    fn add(self, rhs: M31) -> Self::Output {
        self + &rhs
    }
}

impl AddAssign<&M31> for M31 {
    #[inline(always)]
    fn add_assign(&mut self, rhs: &M31) {
        *self = *self + rhs;
    }
}

impl AddAssign for M31 {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        *self += &rhs;
    }
}

impl<T: ::core::borrow::Borrow<M31>> Sum<T> for M31 {
    fn sum<I: Iterator<Item = T>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, item| acc + item.borrow())
    }
}

impl Neg for M31 {
    type Output = M31;
    #[inline(always)]
    fn neg(self) -> Self::Output {
        M31 {
            v: if self.v == 0 { 0 } else { M31_MOD - self.v },
        }
    }
}

impl Sub<&M31> for M31 {
    type Output = M31;
    #[inline(always)]
    #[allow(clippy::op_ref)]
    fn sub(self, rhs: &M31) -> Self::Output {
        self + &(-*rhs)
    }
}

impl Sub for M31 {
    type Output = M31;
    #[inline(always)]
    #[allow(clippy::op_ref)]
    fn sub(self, rhs: M31) -> Self::Output {
        self - &rhs
    }
}

impl SubAssign<&M31> for M31 {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: &M31) {
        *self = *self - rhs;
    }
}

impl SubAssign for M31 {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Self) {
        *self -= &rhs;
    }
}

impl From<u32> for M31 {
    #[inline(always)]
    fn from(x: u32) -> Self {
        M31 {
            v: if x < M31_MOD { x } else { x % M31_MOD },
        }
    }
}

impl From<u64> for M31 {
    #[inline(always)]
    fn from(x: u64) -> Self {
        M31 {
            v: (x % M31_MOD as u64) as u32,
        }
    }
}

impl fmt::Display for M31 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.v)
    }
}

impl Serialize for M31 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for M31 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DecimalVisitor(PhantomData))
    }
}

impl M31 {
    #[inline(always)]
    fn exp_power_of_2(&self, power_log: usize) -> Self {
        let mut res = *self;
        for _ in 0..power_log {
            res = res.square();
        }
        res
    }

    /// Fermat inversion, `a^(p-2)` with p-2 = 0b1111111111111111111111111111101.
    #[inline(always)]
    fn try_inverse(&self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }
        let p1 = *self;
        let p101 = p1.exp_power_of_2(2) * p1;
        let p1111 = p101.square() * p101;
        let p11111111 = p1111.exp_power_of_2(4) * p1111;
        let p111111110000 = p11111111.exp_power_of_2(4);
        let p111111111111 = p111111110000 * p1111;
        let p1111111111111111 = p111111110000.exp_power_of_2(4) * p11111111;
        let p1111111111111111111111111111 = p1111111111111111.exp_power_of_2(12) * p111111111111;
        let p1111111111111111111111111111101 =
            p1111111111111111111111111111.exp_power_of_2(3) * p101;
        Some(p1111111111111111111111111111101)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_m31_arith() {
        let a = M31::from(M31_MOD - 1);
        assert_eq!(a + M31::one(), M31::zero());
        assert_eq!(-M31::one(), a);
        assert_eq!(a * a, M31::one());
        assert_eq!(M31::from(u64::MAX).to_u256(), U256::new((u64::MAX % M31_MOD as u64) as u128));
    }

    #[test]
    fn test_m31_inv() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let x = M31::random_unsafe(&mut rng);
            match x.inv() {
                Some(y) => assert_eq!(x * y, M31::one()),
                None => assert!(x.is_zero()),
            }
        }
    }
}
