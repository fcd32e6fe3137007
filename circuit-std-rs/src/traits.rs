use std::fmt::Debug;

use rand::RngCore;
use witness_calc::frontend::{Field, InputSignals, TemplateDef};

// All std templates must implement the following trait
pub trait StdTemplate<F: Field>: Clone + TemplateDef<F> + 'static {
    type Params: Clone + Debug;

    // Create a new template instance with the given parameters
    fn new_template(params: &Self::Params) -> Self;

    // Create a new random input assignment that satisfies the template
    fn new_assignment(params: &Self::Params, rng: impl RngCore) -> InputSignals<F>;
}
