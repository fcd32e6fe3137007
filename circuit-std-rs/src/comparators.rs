use rand::RngCore;
use witness_calc::frontend::*;

use crate::{bitify::Num2Bits, traits::StdTemplate};

/// `out = (in == 0)`. Signals: `out`, `in`, `inv`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IsZero;

impl IsZero {
    pub const OUT: usize = 0;
    pub const IN: usize = 1;
    const INV: usize = 2;
}

impl<F: Field> Template<F> for IsZero {
    fn run(&self, ctx: &mut Context<'_, F>, id: ComponentId) -> Result<(), Error> {
        let x = ctx.get(id, Self::IN)?;
        let inv = if x.is_zero() {
            F::zero()
        } else {
            ctx.inv(id, x, "inv <-- 1 / in")?
        };
        ctx.set(id, Self::INV, inv)?;
        let out = -x * inv + F::one();
        ctx.set(id, Self::OUT, out)?;
        ctx.assert_eq(id, x * out, F::zero(), "in * out === 0")
    }
}

impl<F: Field> TemplateDef<F> for IsZero {
    fn name(&self) -> String {
        "IsZero".to_string()
    }

    fn signals(&self) -> Vec<SignalDecl> {
        vec![
            SignalDecl::input("in", &[]),
            SignalDecl::output("out", &[]),
            SignalDecl::intermediate("inv", &[]),
        ]
    }
}

impl<F: Field> StdTemplate<F> for IsZero {
    type Params = ();

    fn new_template(_: &()) -> Self {
        IsZero
    }

    fn new_assignment(_: &(), mut rng: impl RngCore) -> InputSignals<F> {
        let x = if rng.next_u32() & 1 == 0 {
            F::zero()
        } else {
            F::random_unsafe(rng)
        };
        InputSignals::new().with("in", vec![x])
    }
}

/// `out = (in[0] == in[1])` through an `IsZero` of the difference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IsEqual;

impl<F: Field> Template<F> for IsEqual {
    fn run(&self, ctx: &mut Context<'_, F>, id: ComponentId) -> Result<(), Error> {
        ctx.create_all_subcomponents(id)?;
        let diff = ctx.get(id, 2)? - ctx.get(id, 1)?;
        ctx.feed_with(id, 0, IsZero::IN, diff, &IsZero)?;
        let out = ctx.get_sub(id, 0, IsZero::OUT)?;
        ctx.set(id, 0, out)
    }
}

impl<F: Field> TemplateDef<F> for IsEqual {
    fn name(&self) -> String {
        "IsEqual".to_string()
    }

    fn signals(&self) -> Vec<SignalDecl> {
        vec![
            SignalDecl::input("in", &[2]),
            SignalDecl::output("out", &[]),
        ]
    }

    fn subcomponents(&self) -> Vec<SubcomponentDecl<F>> {
        vec![SubcomponentDecl::single("isz", IsZero)]
    }
}

impl<F: Field> StdTemplate<F> for IsEqual {
    type Params = ();

    fn new_template(_: &()) -> Self {
        IsEqual
    }

    fn new_assignment(_: &(), mut rng: impl RngCore) -> InputSignals<F> {
        let a = F::random_unsafe(&mut rng);
        let b = if rng.next_u32() & 1 == 0 {
            a
        } else {
            F::random_unsafe(&mut rng)
        };
        InputSignals::new().with("in", vec![a, b])
    }
}

/// `out = 1` iff the 254-bit number `in` (little-endian bits) is greater
/// than the constant `ct`.
///
/// Signals: `out` at 0, `in[254]` at `1..255`, `parts[127]` at `255..382`,
/// `sout` at 382.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompConstant {
    pub ct: U256,
    num2bits: Num2Bits,
}

impl CompConstant {
    const PARTS: usize = 255;
    const SOUT: usize = 382;

    pub fn new(ct: U256) -> Self {
        CompConstant {
            ct,
            num2bits: Num2Bits::new(135),
        }
    }
}

impl<F: Field> Template<F> for CompConstant {
    fn run(&self, ctx: &mut Context<'_, F>, id: ComponentId) -> Result<(), Error> {
        ctx.create_all_subcomponents(id)?;
        let mut sum = F::zero();
        let mut b = F::from_u256((U256::ONE << 128) - U256::ONE);
        let mut a = F::one();
        let mut e = F::one();
        for i in 0..127 {
            let clsb = (self.ct >> (i * 2) as u32) & U256::ONE == U256::ONE;
            let cmsb = (self.ct >> (i * 2 + 1) as u32) & U256::ONE == U256::ONE;
            let slsb = ctx.get(id, 1 + i * 2)?;
            let smsb = ctx.get(id, 1 + i * 2 + 1)?;
            let part = match (cmsb, clsb) {
                (false, false) => -b * smsb * slsb + b * smsb + b * slsb,
                (false, true) => a * smsb * slsb - a * slsb + b * smsb - a * smsb + a,
                (true, false) => b * smsb * slsb - a * smsb + a,
                (true, true) => -a * smsb * slsb + a,
            };
            ctx.set(id, Self::PARTS + i, part)?;
            sum += part;
            b -= e;
            a += e;
            e = e + e;
        }
        ctx.set(id, Self::SOUT, sum)?;
        ctx.feed_with(id, 0, self.num2bits.input(), sum, &self.num2bits)?;
        let out = ctx.get_sub(id, 0, self.num2bits.out(127))?;
        ctx.set(id, 0, out)
    }
}

impl<F: Field> TemplateDef<F> for CompConstant {
    fn name(&self) -> String {
        "CompConstant".to_string()
    }

    fn instance_key(&self) -> String {
        format!("CompConstant({})", self.ct)
    }

    fn signals(&self) -> Vec<SignalDecl> {
        vec![
            SignalDecl::input("in", &[254]),
            SignalDecl::output("out", &[]),
            SignalDecl::intermediate("parts", &[127]),
            SignalDecl::intermediate("sout", &[]),
        ]
    }

    fn subcomponents(&self) -> Vec<SubcomponentDecl<F>> {
        vec![SubcomponentDecl::single("num2bits", self.num2bits)]
    }
}

impl<F: Field> StdTemplate<F> for CompConstant {
    type Params = U256;

    fn new_template(params: &U256) -> Self {
        CompConstant::new(*params)
    }

    fn new_assignment(_: &U256, mut rng: impl RngCore) -> InputSignals<F> {
        let bits = (0..254).map(|_| F::from(rng.next_u32() & 1)).collect();
        InputSignals::new().with("in", bits)
    }
}
