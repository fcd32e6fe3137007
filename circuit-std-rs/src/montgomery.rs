//! Conversions between the twisted Edwards form of Baby Jubjub and its
//! Montgomery form `B*y^2 = x^3 + A*x^2 + x`, and Montgomery point
//! arithmetic.
//!
//! Every template here has `out[2]` at 0 and its inputs right after.

use witness_calc::frontend::*;

pub const MONTGOMERY_A: u32 = 168698;
pub const MONTGOMERY_B: u32 = 1;

fn montgomery_constants<F: Field>() -> Vec<F> {
    vec![F::from(MONTGOMERY_A), F::from(MONTGOMERY_B)]
}

fn point_signals(inputs: &[&str]) -> Vec<SignalDecl> {
    let mut res: Vec<SignalDecl> = inputs.iter().map(|n| SignalDecl::input(n, &[2])).collect();
    res.push(SignalDecl::output("out", &[2]));
    res
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Edwards2Montgomery;

impl<F: Field> Template<F> for Edwards2Montgomery {
    fn run(&self, ctx: &mut Context<'_, F>, id: ComponentId) -> Result<(), Error> {
        let x = ctx.get(id, 2)?;
        let y = ctx.get(id, 3)?;
        let out0 = ctx.div(id, F::one() + y, F::one() - y, "out[0] <-- (1 + in[1]) / (1 - in[1])")?;
        let out1 = ctx.div(id, out0, x, "out[1] <-- out[0] / in[0]")?;
        ctx.set(id, 0, out0)?;
        ctx.set(id, 1, out1)?;
        ctx.assert_eq(id, out0 * (F::one() - y), F::one() + y, "out[0] * (1 - in[1]) === 1 + in[1]")?;
        ctx.assert_eq(id, out1 * x, out0, "out[1] * in[0] === out[0]")
    }
}

impl<F: Field> TemplateDef<F> for Edwards2Montgomery {
    fn name(&self) -> String {
        "Edwards2Montgomery".to_string()
    }

    fn signals(&self) -> Vec<SignalDecl> {
        point_signals(&["in"])
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Montgomery2Edwards;

impl<F: Field> Template<F> for Montgomery2Edwards {
    fn run(&self, ctx: &mut Context<'_, F>, id: ComponentId) -> Result<(), Error> {
        let x = ctx.get(id, 2)?;
        let y = ctx.get(id, 3)?;
        let out0 = ctx.div(id, x, y, "out[0] <-- in[0] / in[1]")?;
        let out1 = ctx.div(id, x - F::one(), x + F::one(), "out[1] <-- (in[0] - 1) / (in[0] + 1)")?;
        ctx.set(id, 0, out0)?;
        ctx.set(id, 1, out1)?;
        ctx.assert_eq(id, out0 * y, x, "out[0] * in[1] === in[0]")?;
        ctx.assert_eq(id, out1 * (x + F::one()), x - F::one(), "out[1] * (in[0] + 1) === in[0] - 1")
    }
}

impl<F: Field> TemplateDef<F> for Montgomery2Edwards {
    fn name(&self) -> String {
        "Montgomery2Edwards".to_string()
    }

    fn signals(&self) -> Vec<SignalDecl> {
        point_signals(&["in"])
    }
}

/// Adds two distinct points. Signals: `out[2]`, `in1[2]`, `in2[2]`, `lamda`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MontgomeryAdd;

impl MontgomeryAdd {
    pub fn in1(k: usize) -> usize {
        2 + k
    }

    pub fn in2(k: usize) -> usize {
        4 + k
    }
}

impl<F: Field> Template<F> for MontgomeryAdd {
    fn run(&self, ctx: &mut Context<'_, F>, id: ComponentId) -> Result<(), Error> {
        let a = ctx.constant(id, 0)?;
        let b = ctx.constant(id, 1)?;
        let (x1, y1) = (ctx.get(id, Self::in1(0))?, ctx.get(id, Self::in1(1))?);
        let (x2, y2) = (ctx.get(id, Self::in2(0))?, ctx.get(id, Self::in2(1))?);
        let lamda = ctx.div(id, y2 - y1, x2 - x1, "lamda <-- (in2[1] - in1[1]) / (in2[0] - in1[0])")?;
        ctx.set(id, 6, lamda)?;
        ctx.assert_eq(
            id,
            lamda * (x2 - x1),
            y2 - y1,
            "lamda * (in2[0] - in1[0]) === in2[1] - in1[1]",
        )?;
        let out0 = b * lamda * lamda - a - x1 - x2;
        ctx.set(id, 0, out0)?;
        ctx.set(id, 1, lamda * (x1 - out0) - y1)
    }
}

impl<F: Field> TemplateDef<F> for MontgomeryAdd {
    fn name(&self) -> String {
        "MontgomeryAdd".to_string()
    }

    fn signals(&self) -> Vec<SignalDecl> {
        let mut res = point_signals(&["in1", "in2"]);
        res.push(SignalDecl::intermediate("lamda", &[]));
        res
    }

    fn constants(&self) -> Vec<F> {
        montgomery_constants()
    }
}

/// Doubles a point. Signals: `out[2]`, `in[2]`, `lamda`, `x1_2`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MontgomeryDouble;

impl<F: Field> Template<F> for MontgomeryDouble {
    fn run(&self, ctx: &mut Context<'_, F>, id: ComponentId) -> Result<(), Error> {
        let a = ctx.constant(id, 0)?;
        let b = ctx.constant(id, 1)?;
        let x = ctx.get(id, 2)?;
        let y = ctx.get(id, 3)?;
        let x1_2 = x * x;
        ctx.set(id, 5, x1_2)?;
        let two = F::from(2u32);
        let num = F::from(3u32) * x1_2 + two * a * x + F::one();
        let den = two * b * y;
        let lamda = ctx.div(id, num, den, "lamda <-- (3*x1_2 + 2*A*in[0] + 1) / (2*B*in[1])")?;
        ctx.set(id, 4, lamda)?;
        ctx.assert_eq(id, lamda * den, num, "lamda * (2*B*in[1]) === 3*x1_2 + 2*A*in[0] + 1")?;
        let out0 = b * lamda * lamda - a - two * x;
        ctx.set(id, 0, out0)?;
        ctx.set(id, 1, lamda * (x - out0) - y)
    }
}

impl<F: Field> TemplateDef<F> for MontgomeryDouble {
    fn name(&self) -> String {
        "MontgomeryDouble".to_string()
    }

    fn signals(&self) -> Vec<SignalDecl> {
        let mut res = point_signals(&["in"]);
        res.push(SignalDecl::intermediate("lamda", &[]));
        res.push(SignalDecl::intermediate("x1_2", &[]));
        res
    }

    fn constants(&self) -> Vec<F> {
        montgomery_constants()
    }
}
