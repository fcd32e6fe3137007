//! Scalar multiplication of an arbitrary Baby Jubjub point, in segments of
//! at most 148 bits computed in Montgomery form.

use rand::RngCore;
use witness_calc::frontend::*;

use crate::{
    babyjub::{self, BabyAdd},
    comparators::IsZero,
    montgomery::{Edwards2Montgomery, Montgomery2Edwards, MontgomeryAdd, MontgomeryDouble},
    mux::Multiplexor2,
    traits::StdTemplate,
};

pub const SEGMENT_BITS: usize = 148;

/// One double-and-add step on Montgomery points.
///
/// Signals: `dblOut[2]` 0, `addOut[2]` 2, `sel` 4, `dblIn[2]` 5, `addIn[2]` 7.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitElementMulAny;

impl BitElementMulAny {
    pub const DBL_OUT: usize = 0;
    pub const ADD_OUT: usize = 2;
    pub const SEL: usize = 4;
    pub const DBL_IN: usize = 5;
    pub const ADD_IN: usize = 7;

    const DOUBLER: usize = 0;
    const ADDER: usize = 1;
    const SELECTOR: usize = 2;
}

impl<F: Field> Template<F> for BitElementMulAny {
    fn run(&self, ctx: &mut Context<'_, F>, id: ComponentId) -> Result<(), Error> {
        ctx.create_all_subcomponents(id)?;
        for k in 0..2 {
            let v = ctx.get(id, Self::DBL_IN + k)?;
            ctx.feed_with(id, Self::DOUBLER, 2 + k, v, &MontgomeryDouble)?;
        }
        for k in 0..2 {
            let dbl = ctx.get_sub(id, Self::DOUBLER, k)?;
            let add_in = ctx.get(id, Self::ADD_IN + k)?;
            ctx.feed_with(id, Self::ADDER, MontgomeryAdd::in1(k), dbl, &MontgomeryAdd)?;
            ctx.feed_with(id, Self::ADDER, MontgomeryAdd::in2(k), add_in, &MontgomeryAdd)?;
        }
        let sel = ctx.get(id, Self::SEL)?;
        ctx.feed_with(id, Self::SELECTOR, Multiplexor2::SEL, sel, &Multiplexor2)?;
        for k in 0..2 {
            let add_in = ctx.get(id, Self::ADD_IN + k)?;
            let added = ctx.get_sub(id, Self::ADDER, k)?;
            ctx.feed_with(id, Self::SELECTOR, Multiplexor2::input(0, k), add_in, &Multiplexor2)?;
            ctx.feed_with(id, Self::SELECTOR, Multiplexor2::input(1, k), added, &Multiplexor2)?;
        }
        for k in 0..2 {
            let dbl = ctx.get_sub(id, Self::DOUBLER, k)?;
            let out = ctx.get_sub(id, Self::SELECTOR, Multiplexor2::out(k))?;
            ctx.set(id, Self::DBL_OUT + k, dbl)?;
            ctx.set(id, Self::ADD_OUT + k, out)?;
        }
        Ok(())
    }
}

impl<F: Field> TemplateDef<F> for BitElementMulAny {
    fn name(&self) -> String {
        "BitElementMulAny".to_string()
    }

    fn signals(&self) -> Vec<SignalDecl> {
        vec![
            SignalDecl::input("sel", &[]),
            SignalDecl::input("dblIn", &[2]),
            SignalDecl::input("addIn", &[2]),
            SignalDecl::output("dblOut", &[2]),
            SignalDecl::output("addOut", &[2]),
        ]
    }

    fn subcomponents(&self) -> Vec<SubcomponentDecl<F>> {
        vec![
            SubcomponentDecl::single("doubler", MontgomeryDouble),
            SubcomponentDecl::single("adder", MontgomeryAdd),
            SubcomponentDecl::single("selector", Multiplexor2),
        ]
    }
}

/// `e * p` for an `n`-bit little-endian `e`, plus the doubled base
/// `2^(n-1) * p` in Montgomery form for the next segment.
///
/// Signals: `out[2]` 0, `dbl[2]` 2, `e[n]` 4, `p[2]` `4 + n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentMulAny {
    n: usize,
}

impl SegmentMulAny {
    pub const IO_OUT: usize = 0;
    pub const IO_DBL: usize = 1;
    pub const IO_E: usize = 2;
    pub const IO_P: usize = 3;

    const E2M: usize = 0;
    const BITS: usize = 1;

    pub fn new(n: usize) -> Self {
        assert!(n >= 2, "a segment needs at least 2 bits, got {}", n);
        SegmentMulAny { n }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    fn e(&self, i: usize) -> usize {
        4 + i
    }

    fn p(&self, k: usize) -> usize {
        4 + self.n + k
    }

    fn m2e(&self) -> usize {
        Self::BITS + self.n - 1
    }

    fn eadder(&self) -> usize {
        self.m2e() + 1
    }

    fn last_sel(&self) -> usize {
        self.m2e() + 2
    }
}

impl<F: Field> Template<F> for SegmentMulAny {
    fn run(&self, ctx: &mut Context<'_, F>, id: ComponentId) -> Result<(), Error> {
        ctx.create_all_subcomponents(id)?;
        let p = (ctx.get(id, self.p(0))?, ctx.get(id, self.p(1))?);
        ctx.feed_with(id, Self::E2M, 2, p.0, &Edwards2Montgomery)?;
        ctx.feed_with(id, Self::E2M, 3, p.1, &Edwards2Montgomery)?;

        let bit = &BitElementMulAny;
        for i in 0..self.n - 1 {
            let slot = Self::BITS + i;
            for k in 0..2 {
                let (dbl, add) = if i == 0 {
                    let m = ctx.get_sub(id, Self::E2M, k)?;
                    (m, m)
                } else {
                    (
                        ctx.get_sub(id, slot - 1, BitElementMulAny::DBL_OUT + k)?,
                        ctx.get_sub(id, slot - 1, BitElementMulAny::ADD_OUT + k)?,
                    )
                };
                ctx.feed_with(id, slot, BitElementMulAny::DBL_IN + k, dbl, bit)?;
                ctx.feed_with(id, slot, BitElementMulAny::ADD_IN + k, add, bit)?;
            }
            let sel = ctx.get(id, self.e(i + 1))?;
            ctx.feed_with(id, slot, BitElementMulAny::SEL, sel, bit)?;
        }
        let last = Self::BITS + self.n - 2;
        for k in 0..2 {
            let dbl = ctx.get_sub(id, last, BitElementMulAny::DBL_OUT + k)?;
            ctx.set(id, 2 + k, dbl)?;
            let add = ctx.get_sub(id, last, BitElementMulAny::ADD_OUT + k)?;
            ctx.feed_with(id, self.m2e(), 2 + k, add, &Montgomery2Edwards)?;
        }

        let m2e = (ctx.get_sub(id, self.m2e(), 0)?, ctx.get_sub(id, self.m2e(), 1)?);
        let eadder = self.eadder();
        ctx.feed_with(id, eadder, BabyAdd::X1, m2e.0, &BabyAdd)?;
        ctx.feed_with(id, eadder, BabyAdd::Y1, m2e.1, &BabyAdd)?;
        ctx.feed_with(id, eadder, BabyAdd::X2, -p.0, &BabyAdd)?;
        ctx.feed_with(id, eadder, BabyAdd::Y2, p.1, &BabyAdd)?;

        let sel = self.last_sel();
        let e0 = ctx.get(id, self.e(0))?;
        ctx.feed_with(id, sel, Multiplexor2::SEL, e0, &Multiplexor2)?;
        for k in 0..2 {
            let sub = ctx.get_sub(id, eadder, BabyAdd::XOUT + k)?;
            ctx.feed_with(id, sel, Multiplexor2::input(0, k), sub, &Multiplexor2)?;
            let m = if k == 0 { m2e.0 } else { m2e.1 };
            ctx.feed_with(id, sel, Multiplexor2::input(1, k), m, &Multiplexor2)?;
        }
        for k in 0..2 {
            let out = ctx.get_sub(id, sel, Multiplexor2::out(k))?;
            ctx.set(id, k, out)?;
        }
        Ok(())
    }
}

impl<F: Field> TemplateDef<F> for SegmentMulAny {
    fn name(&self) -> String {
        "SegmentMulAny".to_string()
    }

    fn instance_key(&self) -> String {
        format!("SegmentMulAny({})", self.n)
    }

    fn signals(&self) -> Vec<SignalDecl> {
        vec![
            SignalDecl::input("e", &[self.n]),
            SignalDecl::input("p", &[2]),
            SignalDecl::output("out", &[2]),
            SignalDecl::output("dbl", &[2]),
        ]
    }

    fn subcomponents(&self) -> Vec<SubcomponentDecl<F>> {
        vec![
            SubcomponentDecl::single("e2m", Edwards2Montgomery),
            SubcomponentDecl::array("bits", &[self.n - 1], BitElementMulAny),
            SubcomponentDecl::single("m2e", Montgomery2Edwards),
            SubcomponentDecl::single("eadder", BabyAdd),
            SubcomponentDecl::single("lastSel", Multiplexor2),
        ]
    }
}

/// `e * p` for an `n`-bit little-endian `e` and any curve point `p`. The
/// point `(0, 1)` maps to itself.
///
/// Signals: `out[2]` 0, `e[n]` 2, `p[2]` `2 + n`.
///
/// `segments` holds up to two template instances: full 148-bit segments and
/// the shorter last one. Its elements are driven through their signal
/// tables, not a statically known template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscalarMulAny {
    n: usize,
}

impl EscalarMulAny {
    pub fn new(n: usize) -> Self {
        assert!(
            Self::supports(n),
            "cannot split {} bits into segments of at least 2 bits",
            n
        );
        EscalarMulAny { n }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// Whether `n` bits split into segments that all have at least 2 bits.
    pub fn supports(n: usize) -> bool {
        n >= 2 && (n - 1) % SEGMENT_BITS >= 1
    }

    pub fn num_segments(&self) -> usize {
        (self.n - 1) / SEGMENT_BITS + 1
    }

    pub fn last_segment_bits(&self) -> usize {
        self.n - (self.num_segments() - 1) * SEGMENT_BITS
    }

    fn e(&self, i: usize) -> usize {
        2 + i
    }

    fn p(&self, k: usize) -> usize {
        2 + self.n + k
    }

    fn doubler(&self, s: usize) -> usize {
        self.num_segments() + s
    }

    fn m2e(&self, s: usize) -> usize {
        2 * self.num_segments() - 1 + s
    }

    fn adder(&self, s: usize) -> usize {
        3 * self.num_segments() - 2 + s
    }

    fn zeropoint(&self) -> usize {
        4 * self.num_segments() - 3
    }
}

impl<F: Field> Template<F> for EscalarMulAny {
    fn run(&self, ctx: &mut Context<'_, F>, id: ComponentId) -> Result<(), Error> {
        let nseg = self.num_segments();
        ctx.create_all_subcomponents(id)?;
        let p = (ctx.get(id, self.p(0))?, ctx.get(id, self.p(1))?);
        ctx.feed_with(id, self.zeropoint(), IsZero::IN, p.0, &IsZero)?;
        let z = ctx.get_sub(id, self.zeropoint(), IsZero::OUT)?;
        let base8 = (ctx.constant(id, 0)?, ctx.constant(id, 1)?);

        let mut acc = (F::zero(), F::one());
        for s in 0..nseg {
            let bits = if s + 1 < nseg {
                SEGMENT_BITS
            } else {
                self.last_segment_bits()
            };
            for i in 0..bits {
                let e = ctx.get(id, self.e(s * SEGMENT_BITS + i))?;
                ctx.feed_io(id, s, SegmentMulAny::IO_E, i, e)?;
            }
            if s == 0 {
                ctx.feed_io(id, 0, SegmentMulAny::IO_P, 0, p.0 + (base8.0 - p.0) * z)?;
                ctx.feed_io(id, 0, SegmentMulAny::IO_P, 1, p.1 + (base8.1 - p.1) * z)?;
                acc = (
                    ctx.get_sub_io(id, 0, SegmentMulAny::IO_OUT, 0)?,
                    ctx.get_sub_io(id, 0, SegmentMulAny::IO_OUT, 1)?,
                );
                continue;
            }
            let (doubler, m2e, adder) = (self.doubler(s - 1), self.m2e(s - 1), self.adder(s - 1));
            for k in 0..2 {
                let dbl = ctx.get_sub_io(id, s - 1, SegmentMulAny::IO_DBL, k)?;
                ctx.feed_with(id, doubler, 2 + k, dbl, &MontgomeryDouble)?;
            }
            for k in 0..2 {
                let v = ctx.get_sub(id, doubler, k)?;
                ctx.feed_with(id, m2e, 2 + k, v, &Montgomery2Edwards)?;
            }
            for k in 0..2 {
                let v = ctx.get_sub(id, m2e, k)?;
                ctx.feed_io(id, s, SegmentMulAny::IO_P, k, v)?;
            }
            let seg_out = (
                ctx.get_sub_io(id, s, SegmentMulAny::IO_OUT, 0)?,
                ctx.get_sub_io(id, s, SegmentMulAny::IO_OUT, 1)?,
            );
            ctx.feed_with(id, adder, BabyAdd::X1, acc.0, &BabyAdd)?;
            ctx.feed_with(id, adder, BabyAdd::Y1, acc.1, &BabyAdd)?;
            ctx.feed_with(id, adder, BabyAdd::X2, seg_out.0, &BabyAdd)?;
            ctx.feed_with(id, adder, BabyAdd::Y2, seg_out.1, &BabyAdd)?;
            acc = (
                ctx.get_sub(id, adder, BabyAdd::XOUT)?,
                ctx.get_sub(id, adder, BabyAdd::YOUT)?,
            );
        }

        ctx.set(id, 0, acc.0 * (F::one() - z))?;
        ctx.set(id, 1, acc.1 + (F::one() - acc.1) * z)
    }
}

impl<F: Field> TemplateDef<F> for EscalarMulAny {
    fn name(&self) -> String {
        "EscalarMulAny".to_string()
    }

    fn instance_key(&self) -> String {
        format!("EscalarMulAny({})", self.n)
    }

    fn signals(&self) -> Vec<SignalDecl> {
        vec![
            SignalDecl::input("e", &[self.n]),
            SignalDecl::input("p", &[2]),
            SignalDecl::output("out", &[2]),
        ]
    }

    fn subcomponents(&self) -> Vec<SubcomponentDecl<F>> {
        let nseg = self.num_segments();
        let dims = [nseg];
        let mut res = Vec::new();
        if nseg > 1 {
            res.push(SubcomponentDecl::part(
                "segments",
                &dims,
                0,
                nseg - 1,
                SegmentMulAny::new(SEGMENT_BITS),
            ));
        }
        res.push(SubcomponentDecl::part(
            "segments",
            &dims,
            nseg - 1,
            1,
            SegmentMulAny::new(self.last_segment_bits()),
        ));
        if nseg > 1 {
            let dims = [nseg - 1];
            res.push(SubcomponentDecl::array("doublers", &dims, MontgomeryDouble));
            res.push(SubcomponentDecl::array("m2e", &dims, Montgomery2Edwards));
            res.push(SubcomponentDecl::array("adders", &dims, BabyAdd));
        }
        res.push(SubcomponentDecl::single("zeropoint", IsZero));
        res
    }

    fn constants(&self) -> Vec<F> {
        let b = babyjub::base8::<F>();
        vec![b.0, b.1]
    }
}

impl<F: Field> StdTemplate<F> for EscalarMulAny {
    type Params = usize;

    fn new_template(params: &usize) -> Self {
        EscalarMulAny::new(*params)
    }

    fn new_assignment(params: &usize, mut rng: impl RngCore) -> InputSignals<F> {
        let k = U256::from(rng.next_u64()) + U256::ONE;
        let p = babyjub::mul_scalar(k, &babyjub::base8::<F>()).unwrap_or_else(babyjub::identity);
        let e = (0..*params).map(|_| F::from(rng.next_u32() & 1)).collect();
        InputSignals::new().with("e", e).with("p", vec![p.0, p.1])
    }
}
