use rand::{seq::SliceRandom, RngCore};
use witness_calc::frontend::*;

use crate::traits::StdTemplate;

/// `in * (in - 1) === 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Boolean;

impl<F: Field> Template<F> for Boolean {
    fn run(&self, ctx: &mut Context<'_, F>, id: ComponentId) -> Result<(), Error> {
        let x = ctx.get(id, 0)?;
        ctx.assert(id, x * (x - F::one()) == F::zero(), "in * (in - 1) === 0")
    }
}

impl<F: Field> TemplateDef<F> for Boolean {
    fn name(&self) -> String {
        "Boolean".to_string()
    }

    fn signals(&self) -> Vec<SignalDecl> {
        vec![SignalDecl::input("in", &[])]
    }
}

impl<F: Field> StdTemplate<F> for Boolean {
    type Params = ();

    fn new_template(_: &()) -> Self {
        Boolean
    }

    fn new_assignment(_: &(), mut rng: impl RngCore) -> InputSignals<F> {
        InputSignals::new().with("in", vec![F::from(rng.next_u32() & 1)])
    }
}

/// Checks that the row-major `n x n` matrix `in` is a permutation matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permutation {
    pub n: usize,
}

impl<F: Field> Template<F> for Permutation {
    fn run(&self, ctx: &mut Context<'_, F>, id: ComponentId) -> Result<(), Error> {
        let n = self.n;
        ctx.create_all_subcomponents(id)?;
        for i in 0..n * n {
            let v = ctx.get(id, i)?;
            ctx.feed_with(id, i, 0, v, &Boolean)?;
        }
        for i in 0..n {
            let mut sum = F::zero();
            for j in 0..n {
                sum += ctx.get(id, i * n + j)?;
            }
            ctx.assert(id, sum == F::one(), "row sum == 1")?;
        }
        for j in 0..n {
            let mut sum = F::zero();
            for i in 0..n {
                sum += ctx.get(id, i * n + j)?;
            }
            ctx.assert(id, sum == F::one(), "column sum == 1")?;
        }
        Ok(())
    }
}

impl<F: Field> TemplateDef<F> for Permutation {
    fn name(&self) -> String {
        "Permutation".to_string()
    }

    fn instance_key(&self) -> String {
        format!("Permutation({})", self.n)
    }

    fn signals(&self) -> Vec<SignalDecl> {
        vec![SignalDecl::input("in", &[self.n * self.n])]
    }

    fn subcomponents(&self) -> Vec<SubcomponentDecl<F>> {
        vec![SubcomponentDecl::array(
            "boolean_check",
            &[self.n * self.n],
            Boolean,
        )]
    }
}

impl<F: Field> StdTemplate<F> for Permutation {
    type Params = usize;

    fn new_template(params: &usize) -> Self {
        Permutation { n: *params }
    }

    fn new_assignment(params: &usize, mut rng: impl RngCore) -> InputSignals<F> {
        let n = *params;
        let mut perm: Vec<usize> = (0..n).collect();
        perm.shuffle(&mut rng);
        let mut m = vec![F::zero(); n * n];
        for (i, &j) in perm.iter().enumerate() {
            m[i * n + j] = F::one();
        }
        InputSignals::new().with("in", m)
    }
}
