#![allow(dead_code)]

use circuit_std_rs::StdTemplate;
use rand::{rngs::StdRng, SeedableRng};
use witness_calc::frontend::*;

pub fn calculator<F: Field, T: TemplateDef<F> + 'static>(root: T) -> WitnessCalculator<F> {
    let (layout, registry) = build_circuit(root).unwrap();
    WitnessCalculator::new(layout, registry).unwrap()
}

/// Runs `root` on `inputs` and returns the values of main's `out`.
pub fn run_out<F: Field, T: TemplateDef<F> + 'static>(
    root: T,
    inputs: &InputSignals<F>,
) -> Result<Vec<F>, Error> {
    let calc = calculator(root);
    let signals = calc.calculate(inputs)?;
    calc.main_signal(&signals, "out")
}

/// Evaluates a random valid assignment and checks that every component ran
/// exactly once and was released.
pub fn std_template_test_helper<F, T>(params: &T::Params)
where
    F: Field,
    T: StdTemplate<F>,
{
    let mut rng = StdRng::seed_from_u64(1234);
    let calc = calculator(T::new_template(params));
    let inputs = T::new_assignment(params, &mut rng);
    let eval = calc.evaluate(&inputs).unwrap();
    let num_components = calc.layout().num_components;
    assert_eq!(eval.stats.allocated, num_components);
    assert_eq!(eval.stats.evaluated, num_components);
    assert_eq!(eval.stats.released, num_components);
    assert_eq!(eval.stats.released_unevaluated, 0);
    assert_eq!(eval.signals.get(0).unwrap(), F::one());
}

pub fn bits<F: Field>(v: U256, n: usize) -> Vec<F> {
    (0..n)
        .map(|i| F::from_u256((v >> i as u32) & U256::ONE))
        .collect()
}
