use rand::RngCore;
use witness_calc::frontend::*;

use crate::traits::StdTemplate;

/// Selects between two points: `out = sel ? in[1] : in[0]`.
///
/// Signals: `out[2]` at 0, `sel` at 2, `in[2][2]` at `3..7`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Multiplexor2;

impl Multiplexor2 {
    pub const SEL: usize = 2;

    pub fn out(k: usize) -> usize {
        k
    }

    pub fn input(i: usize, k: usize) -> usize {
        3 + i * 2 + k
    }
}

impl<F: Field> Template<F> for Multiplexor2 {
    fn run(&self, ctx: &mut Context<'_, F>, id: ComponentId) -> Result<(), Error> {
        let sel = ctx.get(id, Self::SEL)?;
        for k in 0..2 {
            let in0 = ctx.get(id, Self::input(0, k))?;
            let in1 = ctx.get(id, Self::input(1, k))?;
            ctx.set(id, Self::out(k), (in1 - in0) * sel + in0)?;
        }
        Ok(())
    }
}

impl<F: Field> TemplateDef<F> for Multiplexor2 {
    fn name(&self) -> String {
        "Multiplexor2".to_string()
    }

    fn signals(&self) -> Vec<SignalDecl> {
        vec![
            SignalDecl::input("sel", &[]),
            SignalDecl::input("in", &[2, 2]),
            SignalDecl::output("out", &[2]),
        ]
    }
}

/// Selects one of 8 constants per output: `out[i] = c[i][s0 + 2*s1 + 4*s2]`.
///
/// Signals: `out[n]` at 0, `c[n][8]` at `n`, `s[3]` at `9n`, then the
/// intermediates `a210`, `a21`, `a20`, `a2`, `a10`, `a1`, `a0`, `a` (each
/// `[n]`) and `s10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiMux3 {
    n: usize,
}

impl MultiMux3 {
    pub fn new(n: usize) -> Self {
        MultiMux3 { n }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn out(&self, i: usize) -> usize {
        i
    }

    pub fn c(&self, i: usize, j: usize) -> usize {
        self.n + i * 8 + j
    }

    pub fn s(&self, k: usize) -> usize {
        9 * self.n + k
    }

    // k-th coefficient group, in declaration order starting at a210
    fn coef(&self, k: usize, i: usize) -> usize {
        9 * self.n + 3 + k * self.n + i
    }

    fn s10(&self) -> usize {
        17 * self.n + 3
    }
}

impl<F: Field> Template<F> for MultiMux3 {
    fn run(&self, ctx: &mut Context<'_, F>, id: ComponentId) -> Result<(), Error> {
        let s = [
            ctx.get(id, self.s(0))?,
            ctx.get(id, self.s(1))?,
            ctx.get(id, self.s(2))?,
        ];
        let s10 = s[1] * s[0];
        ctx.set(id, self.s10(), s10)?;
        for i in 0..self.n {
            let mut c = [F::zero(); 8];
            for (j, cj) in c.iter_mut().enumerate() {
                *cj = ctx.get(id, self.c(i, j))?;
            }
            let coefs = [
                (c[7] - c[6] - c[5] + c[4] - c[3] + c[2] + c[1] - c[0]) * s10,
                (c[6] - c[4] - c[2] + c[0]) * s[1],
                (c[5] - c[4] - c[1] + c[0]) * s[0],
                c[4] - c[0],
                (c[3] - c[2] - c[1] + c[0]) * s10,
                (c[2] - c[0]) * s[1],
                (c[1] - c[0]) * s[0],
                c[0],
            ];
            for (k, v) in coefs.iter().enumerate() {
                ctx.set(id, self.coef(k, i), *v)?;
            }
            let hi = coefs[0] + coefs[1] + coefs[2] + coefs[3];
            let lo = coefs[4] + coefs[5] + coefs[6] + coefs[7];
            ctx.set(id, self.out(i), hi * s[2] + lo)?;
        }
        Ok(())
    }
}

impl<F: Field> TemplateDef<F> for MultiMux3 {
    fn name(&self) -> String {
        "MultiMux3".to_string()
    }

    fn instance_key(&self) -> String {
        format!("MultiMux3({})", self.n)
    }

    fn signals(&self) -> Vec<SignalDecl> {
        let mut res = vec![
            SignalDecl::input("c", &[self.n, 8]),
            SignalDecl::input("s", &[3]),
            SignalDecl::output("out", &[self.n]),
        ];
        for name in ["a210", "a21", "a20", "a2", "a10", "a1", "a0", "a"] {
            res.push(SignalDecl::intermediate(name, &[self.n]));
        }
        res.push(SignalDecl::intermediate("s10", &[]));
        res
    }
}

impl<F: Field> StdTemplate<F> for MultiMux3 {
    type Params = usize;

    fn new_template(params: &usize) -> Self {
        MultiMux3::new(*params)
    }

    fn new_assignment(params: &usize, mut rng: impl RngCore) -> InputSignals<F> {
        let c = (0..*params * 8).map(|_| F::random_unsafe(&mut rng)).collect();
        let s = (0..3).map(|_| F::from(rng.next_u32() & 1)).collect();
        InputSignals::new().with("c", c).with("s", s)
    }
}
