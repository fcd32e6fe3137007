mod common;

use circuit_std_rs::{
    babyjub,
    elgamal::{self, ElGamalEncrypt},
    escalarmulfix::{EscalarMulFix, SegmentMulFix, WindowMulFix},
    mux::MultiMux3,
};
use common::{bits, calculator, run_out, std_template_test_helper};
use rand::{rngs::StdRng, RngCore, SeedableRng};
use witness_calc::frontend::*;

fn point(p: (BN254, BN254)) -> Vec<BN254> {
    vec![p.0, p.1]
}

fn to_montgomery(p: (BN254, BN254)) -> Vec<BN254> {
    let one = BN254::one();
    let u = ops::div(&(one + p.1), &(one - p.1)).unwrap();
    let v = ops::div(&u, &p.0).unwrap();
    vec![u, v]
}

fn b8_times(k: u64) -> (BN254, BN254) {
    babyjub::mul_scalar(U256::from(k), &babyjub::base8()).unwrap()
}

#[test]
fn test_multi_mux3() {
    let mut rng = StdRng::seed_from_u64(3);
    let c: Vec<BN254> = (0..16).map(|_| BN254::random_unsafe(&mut rng)).collect();
    for idx in 0..8u64 {
        let inputs = InputSignals::new()
            .with("c", c.clone())
            .with("s", bits(U256::from(idx), 3));
        let out = run_out(MultiMux3::new(2), &inputs).unwrap();
        assert_eq!(out, vec![c[idx as usize], c[8 + idx as usize]]);
    }
    std_template_test_helper::<BN254, MultiMux3>(&2);
}

#[test]
fn test_window_mul_fix() {
    let base = b8_times(3);
    let calc = calculator::<BN254, _>(WindowMulFix);
    for idx in 0..8u64 {
        let inputs = InputSignals::new()
            .with("in", bits(U256::from(idx), 3))
            .with("base", to_montgomery(base));
        let signals = calc.calculate(&inputs).unwrap();
        let expected = babyjub::mul_scalar(U256::from(idx + 1), &base).unwrap();
        assert_eq!(calc.main_signal(&signals, "out").unwrap(), to_montgomery(expected));
        assert_eq!(calc.main_signal(&signals, "out8").unwrap(), to_montgomery(b8_times(24)));
    }
}

#[test]
fn test_segment_mul_fix() {
    let base = b8_times(5);
    let k = 0b101_110_011u64;
    let calc = calculator::<BN254, _>(SegmentMulFix::new(3));
    let inputs = InputSignals::new()
        .with("e", bits(U256::from(k), 9))
        .with("base", point(base));
    let signals = calc.calculate(&inputs).unwrap();
    let expected = babyjub::mul_scalar(U256::from(k), &base).unwrap();
    assert_eq!(calc.main_signal(&signals, "out").unwrap(), point(expected));
    let dbl = babyjub::mul_scalar(U256::from(512u32), &base).unwrap();
    assert_eq!(calc.main_signal(&signals, "dbl").unwrap(), to_montgomery(dbl));
}

fn escalar_mul_fix(n: usize, k: U256) -> Vec<BN254> {
    let inputs = InputSignals::new().with("e", bits(k, n));
    run_out(EscalarMulFix::base8(n), &inputs).unwrap()
}

#[test]
fn test_escalar_mul_fix_single_segment() {
    assert_eq!(escalar_mul_fix(4, U256::from(11u32)), point(b8_times(11)));
    assert_eq!(escalar_mul_fix(4, U256::ZERO), point(babyjub::identity()));
    assert_eq!(escalar_mul_fix(1, U256::ONE), point(b8_times(1)));
}

#[test]
fn test_escalar_mul_fix_two_segments() {
    let mut rng = StdRng::seed_from_u64(11);
    let lo = U256::from_words(rng.next_u64() as u128, rng.next_u64() as u128);
    for k in [lo, lo | (U256::ONE << 250), U256::ONE << 249, U256::ZERO] {
        let expected = babyjub::mul_scalar(k, &babyjub::base8()).unwrap();
        assert_eq!(escalar_mul_fix(251, k), point(expected), "{}", k);
    }
    std_template_test_helper::<BN254, EscalarMulFix>(&251);
}

#[test]
fn test_escalar_mul_fix_segments_layout() {
    let calc = calculator::<BN254, _>(EscalarMulFix::base8(251));
    let layout = calc.layout();
    let main = layout.main_template().unwrap();
    let segments: Vec<_> = main
        .subcomponents
        .iter()
        .filter(|g| g.name == "segments")
        .collect();
    assert_eq!(segments.len(), 2);
    let widths: Vec<usize> = segments
        .iter()
        .map(|g| layout.template(g.template_id).unwrap().io[SegmentMulFix::IO_E].size())
        .collect();
    assert_eq!(widths, vec![249, 3]);
}

#[test]
fn test_escalar_mul_fix_widths() {
    for n in [1, 246, 250, 251, 498] {
        assert!(EscalarMulFix::supports(n), "{}", n);
    }
    for n in [0, 247, 248, 249, 493] {
        assert!(!EscalarMulFix::supports(n), "{}", n);
    }
    let fix = EscalarMulFix::base8(251);
    assert_eq!(fix.num_segments(), 2);
    assert_eq!((fix.segment_bits(0), fix.segment_bits(1)), (249, 2));
}

#[test]
#[should_panic]
fn test_escalar_mul_fix_bad_width() {
    EscalarMulFix::base8(248);
}

fn encrypt_inputs(
    ic0: (BN254, BN254),
    ic1: (BN254, BN254),
    r: U256,
    pk: (BN254, BN254),
) -> InputSignals<BN254> {
    InputSignals::new()
        .with("ic0", point(ic0))
        .with("ic1", point(ic1))
        .with("r", vec![BN254::from_u256(r)])
        .with("pk", point(pk))
}

#[test]
fn test_elgamal_encrypt() {
    let mut rng = StdRng::seed_from_u64(5);
    let (ic0, ic1, pk) = (b8_times(2), b8_times(3), b8_times(1234567));
    let r = elgamal::random_scalar(&mut rng, 251);
    let calc = calculator::<BN254, _>(ElGamalEncrypt::new(251));
    let signals = calc.calculate(&encrypt_inputs(ic0, ic1, r, pk)).unwrap();
    let (c0, c1) = elgamal::encrypt(&ic0, &ic1, r, &pk).unwrap();
    assert_eq!(calc.main_signal(&signals, "c0").unwrap(), point(c0));
    assert_eq!(calc.main_signal(&signals, "c1").unwrap(), point(c1));

    // zero randomness leaves the ciphertext as is
    let signals = calc.calculate(&encrypt_inputs(ic0, ic1, U256::ZERO, pk)).unwrap();
    assert_eq!(calc.main_signal(&signals, "c0").unwrap(), point(ic0));
    assert_eq!(calc.main_signal(&signals, "c1").unwrap(), point(ic1));
}

#[test]
fn test_elgamal_encrypt_randomness_too_wide() {
    let calc = calculator::<BN254, _>(ElGamalEncrypt::new(4));
    let inputs = encrypt_inputs(b8_times(2), b8_times(3), U256::from(16u32), b8_times(5));
    let err = calc.calculate(&inputs).err().unwrap();
    let diag = err.diagnostic().unwrap();
    assert_eq!(diag.template, "Num2Bits");
    assert_eq!(diag.path(), "main.bitDecomposition");
}

#[test]
fn test_elgamal_encrypt_random() {
    std_template_test_helper::<BN254, ElGamalEncrypt>(&4);
    std_template_test_helper::<BN254, ElGamalEncrypt>(&251);
}
