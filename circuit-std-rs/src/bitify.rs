use rand::RngCore;
use witness_calc::frontend::*;

use crate::traits::StdTemplate;

/// Decomposes `in` into `n` little-endian bits.
///
/// Signals: `out[n]` at `0..n`, `in` at `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Num2Bits {
    pub n: usize,
}

impl Num2Bits {
    pub fn new(n: usize) -> Self {
        Num2Bits { n }
    }

    pub fn out(&self, i: usize) -> usize {
        i
    }

    pub fn input(&self) -> usize {
        self.n
    }
}

impl<F: Field> Template<F> for Num2Bits {
    fn run(&self, ctx: &mut Context<'_, F>, id: ComponentId) -> Result<(), Error> {
        let input = ctx.get(id, self.input())?;
        let mut lc1 = F::zero();
        let mut e2 = F::one();
        for i in 0..self.n {
            let bit = ops::band(&ops::shr(&input, &F::from(i as u64)), &F::one());
            ctx.set(id, self.out(i), bit)?;
            ctx.assert_eq(id, bit * (bit - F::one()), F::zero(), "out[i] * (out[i] - 1) === 0")?;
            lc1 += bit * e2;
            e2 = e2 + e2;
        }
        ctx.assert_eq(id, lc1, input, "lc1 === in")
    }
}

impl<F: Field> TemplateDef<F> for Num2Bits {
    fn name(&self) -> String {
        "Num2Bits".to_string()
    }

    fn instance_key(&self) -> String {
        format!("Num2Bits({})", self.n)
    }

    fn signals(&self) -> Vec<SignalDecl> {
        vec![
            SignalDecl::output("out", &[self.n]),
            SignalDecl::input("in", &[]),
        ]
    }
}

impl<F: Field> StdTemplate<F> for Num2Bits {
    type Params = usize;

    fn new_template(params: &usize) -> Self {
        Num2Bits::new(*params)
    }

    fn new_assignment(params: &usize, mut rng: impl RngCore) -> InputSignals<F> {
        let mut x = U256::ZERO;
        for i in 0..(*params).min(250) {
            if rng.next_u32() & 1 == 1 {
                x |= U256::ONE << i as u32;
            }
        }
        InputSignals::new().with("in", vec![F::from_u256(x)])
    }
}

/// Recomposes `n` little-endian bits. Signals: `out` at 0, `in[n]` at `1..=n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bits2Num {
    pub n: usize,
}

impl<F: Field> Template<F> for Bits2Num {
    fn run(&self, ctx: &mut Context<'_, F>, id: ComponentId) -> Result<(), Error> {
        let mut lc1 = F::zero();
        let mut e2 = F::one();
        for i in 0..self.n {
            lc1 += ctx.get(id, 1 + i)? * e2;
            e2 = e2 + e2;
        }
        ctx.set(id, 0, lc1)
    }
}

impl<F: Field> TemplateDef<F> for Bits2Num {
    fn name(&self) -> String {
        "Bits2Num".to_string()
    }

    fn instance_key(&self) -> String {
        format!("Bits2Num({})", self.n)
    }

    fn signals(&self) -> Vec<SignalDecl> {
        vec![
            SignalDecl::output("out", &[]),
            SignalDecl::input("in", &[self.n]),
        ]
    }
}

impl<F: Field> StdTemplate<F> for Bits2Num {
    type Params = usize;

    fn new_template(params: &usize) -> Self {
        Bits2Num { n: *params }
    }

    fn new_assignment(params: &usize, mut rng: impl RngCore) -> InputSignals<F> {
        let bits = (0..*params).map(|_| F::from(rng.next_u32() & 1)).collect();
        InputSignals::new().with("in", bits)
    }
}
