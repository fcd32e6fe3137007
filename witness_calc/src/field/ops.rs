//! The circom operator set on field elements.
//!
//! Integer-flavored operators (shifts, bitwise, comparisons, integer
//! division) act on the canonical representative in `[0, p)`.

use super::{Field, U256};

pub fn from_bool<F: Field>(b: bool) -> F {
    if b {
        F::one()
    } else {
        F::zero()
    }
}

pub fn is_true<F: Field>(x: &F) -> bool {
    !x.is_zero()
}

/// `a / b`, or `None` when `b` is zero.
pub fn div<F: Field>(a: &F, b: &F) -> Option<F> {
    b.inv().map(|inv| *a * inv)
}

pub fn pow<F: Field>(x: &F, e: &F) -> F {
    let mut t = *x;
    let mut res = F::one();
    let mut e = e.to_u256();
    while e != U256::ZERO {
        if e & U256::ONE != U256::ZERO {
            res *= t;
        }
        e >>= 1;
        t = t.square();
    }
    res
}

fn binop_on_u256<F: Field, G: Fn(U256, U256) -> U256>(a: &F, b: &F, f: G) -> F {
    F::from_u256(f(a.to_u256(), b.to_u256()))
}

/// Integer division of the canonical representatives.
pub fn idiv<F: Field>(a: &F, b: &F) -> Option<F> {
    if b.is_zero() {
        return None;
    }
    Some(binop_on_u256(a, b, |x, y| x / y))
}

/// Integer remainder of the canonical representatives.
pub fn rem<F: Field>(a: &F, b: &F) -> Option<F> {
    if b.is_zero() {
        return None;
    }
    Some(binop_on_u256(a, b, |x, y| x % y))
}

pub fn band<F: Field>(a: &F, b: &F) -> F {
    binop_on_u256(a, b, |x, y| x & y)
}

pub fn bor<F: Field>(a: &F, b: &F) -> F {
    binop_on_u256(a, b, |x, y| x | y)
}

pub fn bxor<F: Field>(a: &F, b: &F) -> F {
    binop_on_u256(a, b, |x, y| x ^ y)
}

/// Complement within the bit length of the modulus, then reduced.
pub fn bnot<F: Field>(a: &F) -> F {
    F::from_u256(!a.to_u256() & modulus_mask::<F>())
}

pub fn shl<F: Field>(a: &F, k: &F) -> F {
    F::from_u256(circom_shift_l_impl::<F>(a.to_u256(), k.to_u256()))
}

pub fn shr<F: Field>(a: &F, k: &F) -> F {
    F::from_u256(circom_shift_r_impl::<F>(a.to_u256(), k.to_u256()))
}

pub fn land<F: Field>(a: &F, b: &F) -> F {
    from_bool(is_true(a) && is_true(b))
}

pub fn lor<F: Field>(a: &F, b: &F) -> F {
    from_bool(is_true(a) || is_true(b))
}

pub fn lnot<F: Field>(a: &F) -> F {
    from_bool(!is_true(a))
}

pub fn eq<F: Field>(a: &F, b: &F) -> F {
    from_bool(a == b)
}

pub fn neq<F: Field>(a: &F, b: &F) -> F {
    from_bool(a != b)
}

pub fn lt<F: Field>(a: &F, b: &F) -> F {
    from_bool(a.to_u256() < b.to_u256())
}

pub fn le<F: Field>(a: &F, b: &F) -> F {
    from_bool(a.to_u256() <= b.to_u256())
}

pub fn gt<F: Field>(a: &F, b: &F) -> F {
    from_bool(a.to_u256() > b.to_u256())
}

pub fn ge<F: Field>(a: &F, b: &F) -> F {
    from_bool(a.to_u256() >= b.to_u256())
}

/// Canonical value as a machine word, if it fits.
pub fn to_usize<F: Field>(a: &F) -> Option<usize> {
    let v = a.to_u256();
    if v > U256::from(u64::MAX) {
        return None;
    }
    usize::try_from(v.as_u64()).ok()
}

pub fn u256_bit_length(x: U256) -> usize {
    256 - x.leading_zeros() as usize
}

fn modulus_mask<F: Field>() -> U256 {
    let bits = u256_bit_length(F::MODULUS);
    if bits >= 256 {
        U256::MAX
    } else {
        (U256::ONE << bits as u32) - U256::ONE
    }
}

pub fn circom_shift_l_impl<F: Field>(x: U256, k: U256) -> U256 {
    let top = F::MODULUS / 2;
    if k <= top {
        let shift = if (k >> 64) == U256::ZERO {
            k.as_u64() as usize
        } else {
            u256_bit_length(F::MODULUS)
        };
        if shift >= 256 {
            return U256::ZERO;
        }
        (x << shift as u32) & modulus_mask::<F>()
    } else {
        circom_shift_r_impl::<F>(x, F::MODULUS - k)
    }
}

pub fn circom_shift_r_impl<F: Field>(x: U256, k: U256) -> U256 {
    let top = F::MODULUS / 2;
    if k <= top {
        let shift = if (k >> 64) == U256::ZERO {
            k.as_u64() as usize
        } else {
            u256_bit_length(F::MODULUS)
        };
        if shift >= 256 {
            return U256::ZERO;
        }
        x >> shift as u32
    } else {
        circom_shift_l_impl::<F>(x, F::MODULUS - k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{BN254, M31};

    #[test]
    fn test_shifts() {
        let x = BN254::from(11u32);
        assert_eq!(shr(&x, &BN254::from(1u32)), BN254::from(5u32));
        assert_eq!(shl(&x, &BN254::from(2u32)), BN254::from(44u32));
        // a negative shift amount shifts the other way
        assert_eq!(shr(&x, &(-BN254::from(2u32))), BN254::from(44u32));
        assert_eq!(shr(&x, &BN254::from(300u32)), BN254::zero());
        // M31: left shifts drop bits above the modulus width
        let y = M31::from(1u32 << 30);
        assert_eq!(shl(&y, &M31::from(1u32)), M31::zero());
    }

    #[test]
    fn test_bitwise() {
        let a = BN254::from(0b1100u32);
        let b = BN254::from(0b1010u32);
        assert_eq!(band(&a, &b), BN254::from(0b1000u32));
        assert_eq!(bor(&a, &b), BN254::from(0b1110u32));
        assert_eq!(bxor(&a, &b), BN254::from(0b0110u32));
        assert_eq!(bnot(&M31::zero()), M31::zero());
        assert_eq!(bnot(&M31::one()), M31::from(M31::MODULUS.as_u32() - 1));
    }

    #[test]
    fn test_comparisons() {
        let one = BN254::one();
        let minus_one = -one;
        assert_eq!(lt(&one, &minus_one), one);
        assert_eq!(gt(&one, &minus_one), BN254::zero());
        assert_eq!(le(&one, &one), one);
        assert_eq!(ge(&BN254::zero(), &one), BN254::zero());
        assert_eq!(eq(&one, &one), one);
        assert_eq!(neq(&one, &one), BN254::zero());
        assert_eq!(land(&one, &BN254::from(7u32)), one);
        assert_eq!(lor(&BN254::zero(), &BN254::zero()), BN254::zero());
        assert_eq!(lnot(&BN254::zero()), one);
    }

    #[test]
    fn test_division() {
        let a = BN254::from(17u32);
        let b = BN254::from(5u32);
        assert_eq!(div(&a, &b).map(|q| q * b), Some(a));
        assert_eq!(div(&a, &BN254::zero()), None);
        assert_eq!(idiv(&a, &b), Some(BN254::from(3u32)));
        assert_eq!(rem(&a, &b), Some(BN254::from(2u32)));
        assert_eq!(idiv(&a, &BN254::zero()), None);
        assert_eq!(pow(&BN254::from(3u32), &BN254::from(5u32)), BN254::from(243u32));
        assert_eq!(to_usize(&BN254::from(9u32)), Some(9));
        assert_eq!(to_usize(&-BN254::one()), None);
    }
}
