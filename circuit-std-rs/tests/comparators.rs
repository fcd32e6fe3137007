mod common;

use circuit_std_rs::comparators::{CompConstant, IsEqual, IsZero};
use common::{bits, run_out, std_template_test_helper};
use witness_calc::frontend::*;

fn is_zero(x: BN254) -> BN254 {
    let inputs = InputSignals::new().with("in", vec![x]);
    run_out(IsZero, &inputs).unwrap()[0]
}

#[test]
fn test_is_zero() {
    assert_eq!(is_zero(BN254::zero()), BN254::one());
    assert_eq!(is_zero(BN254::from(5u32)), BN254::zero());
    assert_eq!(is_zero(-BN254::one()), BN254::zero());
}

#[test]
fn test_is_zero_inverse_signal() {
    let calc = common::calculator::<BN254, _>(IsZero);
    let inputs = InputSignals::new().with("in", vec![BN254::from(5u32)]);
    let signals = calc.calculate(&inputs).unwrap();
    // out, in, inv
    let inv = signals.get(3).unwrap();
    assert_eq!(inv * BN254::from(5u32), BN254::one());

    let inputs = InputSignals::new().with("in", vec![BN254::zero()]);
    let signals = calc.calculate(&inputs).unwrap();
    assert_eq!(signals.get(1).unwrap(), BN254::one());
    assert_eq!(signals.get(3).unwrap(), BN254::zero());
}

#[test]
fn test_is_equal() {
    let eq = InputSignals::new().with("in", vec![BN254::from(3u32), BN254::from(3u32)]);
    assert_eq!(run_out(IsEqual, &eq).unwrap(), vec![BN254::one()]);
    let ne = InputSignals::new().with("in", vec![BN254::from(3u32), BN254::from(4u32)]);
    assert_eq!(run_out(IsEqual, &ne).unwrap(), vec![BN254::zero()]);
}

#[test]
fn test_comp_constant() {
    let cases: [(u128, u128, u32); 6] = [
        (1000, 1001, 1),
        (1000, 1000, 0),
        (1000, 5, 0),
        (0, 0, 0),
        (0, 1, 1),
        (12345678901234567890, 12345678901234567891, 1),
    ];
    for (ct, v, expected) in cases {
        let inputs = InputSignals::new().with("in", bits::<BN254>(U256::from(v), 254));
        let out = run_out(CompConstant::new(U256::from(ct)), &inputs).unwrap();
        assert_eq!(out, vec![BN254::from(expected)], "{} > {}", v, ct);
    }
}

#[test]
fn test_comparators_random() {
    std_template_test_helper::<BN254, IsZero>(&());
    std_template_test_helper::<BN254, IsEqual>(&());
    std_template_test_helper::<BN254, CompConstant>(&U256::from(123456789u64));
}
