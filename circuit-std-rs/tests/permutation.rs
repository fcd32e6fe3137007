mod common;

use circuit_std_rs::permutation::{Boolean, Permutation};
use common::{calculator, std_template_test_helper};
use witness_calc::frontend::*;

fn matrix(entries: &[u32]) -> InputSignals<BN254> {
    InputSignals::new().with("in", entries.iter().map(|&v| BN254::from(v)).collect())
}

#[test]
fn test_boolean() {
    let calc = calculator::<BN254, _>(Boolean);
    let ok = InputSignals::new().with("in", vec![BN254::zero()]);
    let eval = calc.evaluate(&ok).unwrap();
    assert_eq!(eval.stats.evaluated, 1);

    let bad = InputSignals::new().with("in", vec![BN254::from(2u32)]);
    let err = calc.evaluate(&bad).err().unwrap();
    assert!(matches!(err, Error::ConstraintViolation(_)));
    assert!(err.is_user());
    let diag = err.diagnostic().unwrap();
    assert_eq!(diag.template, "Boolean");
    assert_eq!(diag.path(), "main");
    assert!(err.to_string().contains("Followed trace of components: main"));
}

#[test]
fn test_permutation() {
    let calc = calculator::<BN254, _>(Permutation { n: 3 });
    let eval = calc.evaluate(&matrix(&[0, 1, 0, 0, 0, 1, 1, 0, 0])).unwrap();
    assert_eq!(eval.stats.evaluated, 10);
    assert_eq!(calc.layout().num_signals, 1 + 9 + 9);
}

#[test]
fn test_permutation_failures() {
    let calc = calculator::<BN254, _>(Permutation { n: 3 });

    let err = calc
        .evaluate(&matrix(&[1, 1, 0, 0, 0, 0, 0, 0, 1]))
        .err()
        .unwrap();
    let diag = err.diagnostic().unwrap();
    assert_eq!(diag.template, "Permutation");
    assert_eq!(diag.site, "row sum == 1");

    let err = calc
        .evaluate(&matrix(&[1, 0, 0, 0, 1, 0, 0, 0, 0]))
        .err()
        .unwrap();
    assert_eq!(err.diagnostic().unwrap().site, "row sum == 1");

    let err = calc
        .evaluate(&matrix(&[1, 0, 0, 1, 0, 0, 0, 0, 1]))
        .err()
        .unwrap();
    assert_eq!(err.diagnostic().unwrap().site, "column sum == 1");

    let err = calc
        .evaluate(&matrix(&[1, 0, 0, 0, 2, 0, 0, 0, 1]))
        .err()
        .unwrap();
    let diag = err.diagnostic().unwrap();
    assert_eq!(diag.template, "Boolean");
    assert_eq!(diag.path(), "main.boolean_check[4]");
}

#[test]
fn test_permutation_random() {
    std_template_test_helper::<BN254, Boolean>(&());
    std_template_test_helper::<BN254, Permutation>(&5);
    std_template_test_helper::<M31, Permutation>(&4);
}
