//! Scalar multiplication of a fixed Baby Jubjub point, 3 bits at a time.
//!
//! Each segment walks windows in Montgomery form and starts from an offset
//! point so that no window addition ever sees the identity; the offset is
//! subtracted once at the end in Edwards form.

use rand::RngCore;
use witness_calc::frontend::*;

use crate::{
    babyjub::{self, BabyAdd},
    montgomery::{Edwards2Montgomery, Montgomery2Edwards, MontgomeryAdd, MontgomeryDouble},
    mux::MultiMux3,
    traits::StdTemplate,
};

/// Bits taken by every segment but the last.
pub const SEGMENT_BITS: usize = 249;

/// `out = (in + 1) * base` and `out8 = 8 * base`, for a 3-bit `in`. All
/// points are in Montgomery form.
///
/// Signals: `out[2]` 0, `out8[2]` 2, `in[3]` 4, `base[2]` 7.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowMulFix;

impl WindowMulFix {
    pub const OUT: usize = 0;
    pub const OUT8: usize = 2;
    pub const IN: usize = 4;
    pub const BASE: usize = 7;

    const MUX: usize = 0;
    const DBL2: usize = 1;
    const MUX_WIDTH: usize = 2;

    // adrK computes K * base
    fn adr(k: usize) -> usize {
        k - 1
    }
}

impl<F: Field> Template<F> for WindowMulFix {
    fn run(&self, ctx: &mut Context<'_, F>, id: ComponentId) -> Result<(), Error> {
        ctx.create_all_subcomponents(id)?;
        let mux = &MultiMux3::new(Self::MUX_WIDTH);
        let base = [ctx.get(id, Self::BASE)?, ctx.get(id, Self::BASE + 1)?];
        for k in 0..3 {
            let v = ctx.get(id, Self::IN + k)?;
            ctx.feed_with(id, Self::MUX, mux.s(k), v, mux)?;
        }
        for k in 0..2 {
            ctx.feed_with(id, Self::MUX, mux.c(k, 0), base[k], mux)?;
            ctx.feed_with(id, Self::DBL2, 2 + k, base[k], &MontgomeryDouble)?;
        }
        let mut prev = [F::zero(); 2];
        for k in 0..2 {
            prev[k] = ctx.get_sub(id, Self::DBL2, k)?;
            ctx.feed_with(id, Self::MUX, mux.c(k, 1), prev[k], mux)?;
        }
        for m in 3..=8 {
            let adr = Self::adr(m);
            prev = feed_montgomery_add(ctx, id, adr, base, prev)?;
            for k in 0..2 {
                ctx.feed_with(id, Self::MUX, mux.c(k, m - 1), prev[k], mux)?;
            }
        }
        for k in 0..2 {
            ctx.set(id, Self::OUT8 + k, prev[k])?;
            let out = ctx.get_sub(id, Self::MUX, mux.out(k))?;
            ctx.set(id, Self::OUT + k, out)?;
        }
        Ok(())
    }
}

impl<F: Field> TemplateDef<F> for WindowMulFix {
    fn name(&self) -> String {
        "WindowMulFix".to_string()
    }

    fn signals(&self) -> Vec<SignalDecl> {
        vec![
            SignalDecl::input("in", &[3]),
            SignalDecl::input("base", &[2]),
            SignalDecl::output("out", &[2]),
            SignalDecl::output("out8", &[2]),
        ]
    }

    fn subcomponents(&self) -> Vec<SubcomponentDecl<F>> {
        let mut res = vec![
            SubcomponentDecl::single("mux", MultiMux3::new(Self::MUX_WIDTH)),
            SubcomponentDecl::single("dbl2", MontgomeryDouble),
        ];
        for m in 3..=8 {
            res.push(SubcomponentDecl::single(&format!("adr{}", m), MontgomeryAdd));
        }
        res
    }
}

/// `e * base` for a little-endian `e` of `3 * windows` bits, plus the
/// Montgomery point `2^(3 * windows) * base` that seeds the next segment.
///
/// Signals: `out[2]` 0, `dbl[2]` 2, `e[3 * windows]` 4, `base[2]` after `e`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentMulFix {
    windows: usize,
}

impl SegmentMulFix {
    pub const IO_OUT: usize = 0;
    pub const IO_DBL: usize = 1;
    pub const IO_E: usize = 2;
    pub const IO_BASE: usize = 3;

    const E2M: usize = 0;
    const WINDOWS: usize = 1;

    pub fn new(windows: usize) -> Self {
        assert!(windows >= 1, "a segment needs at least one window");
        SegmentMulFix { windows }
    }

    pub fn windows(&self) -> usize {
        self.windows
    }

    fn e(&self, i: usize) -> usize {
        4 + i
    }

    fn base(&self, k: usize) -> usize {
        4 + 3 * self.windows + k
    }

    fn adder(&self, i: usize) -> usize {
        Self::WINDOWS + self.windows + i
    }

    fn cadder(&self, i: usize) -> usize {
        Self::WINDOWS + 2 * self.windows + i
    }

    fn dbl_last(&self) -> usize {
        Self::WINDOWS + 3 * self.windows
    }

    fn m2e(&self) -> usize {
        self.dbl_last() + 1
    }

    fn cm2e(&self) -> usize {
        self.dbl_last() + 2
    }

    fn cadd(&self) -> usize {
        self.dbl_last() + 3
    }
}

fn feed_montgomery_add<F: Field>(
    ctx: &mut Context<'_, F>,
    id: ComponentId,
    slot: usize,
    in1: [F; 2],
    in2: [F; 2],
) -> Result<[F; 2], Error> {
    for k in 0..2 {
        ctx.feed_with(id, slot, MontgomeryAdd::in1(k), in1[k], &MontgomeryAdd)?;
        ctx.feed_with(id, slot, MontgomeryAdd::in2(k), in2[k], &MontgomeryAdd)?;
    }
    Ok([ctx.get_sub(id, slot, 0)?, ctx.get_sub(id, slot, 1)?])
}

fn feed_point<F: Field, T: TemplateDef<F>>(
    ctx: &mut Context<'_, F>,
    id: ComponentId,
    slot: usize,
    p: [F; 2],
    template: &T,
) -> Result<[F; 2], Error> {
    for k in 0..2 {
        ctx.feed_with(id, slot, 2 + k, p[k], template)?;
    }
    Ok([ctx.get_sub(id, slot, 0)?, ctx.get_sub(id, slot, 1)?])
}

impl<F: Field> Template<F> for SegmentMulFix {
    fn run(&self, ctx: &mut Context<'_, F>, id: ComponentId) -> Result<(), Error> {
        ctx.create_all_subcomponents(id)?;
        let nw = self.windows;
        let base = [ctx.get(id, self.base(0))?, ctx.get(id, self.base(1))?];
        let m_base = feed_point(ctx, id, Self::E2M, base, &Edwards2Montgomery)?;

        let mut win_out = Vec::with_capacity(nw);
        let mut win_out8 = Vec::with_capacity(nw);
        let mut wbase = m_base;
        for i in 0..nw {
            let slot = Self::WINDOWS + i;
            for k in 0..3 {
                let e = ctx.get(id, self.e(3 * i + k))?;
                ctx.feed_with(id, slot, WindowMulFix::IN + k, e, &WindowMulFix)?;
            }
            for k in 0..2 {
                ctx.feed_with(id, slot, WindowMulFix::BASE + k, wbase[k], &WindowMulFix)?;
            }
            let out = [
                ctx.get_sub(id, slot, WindowMulFix::OUT)?,
                ctx.get_sub(id, slot, WindowMulFix::OUT + 1)?,
            ];
            wbase = [
                ctx.get_sub(id, slot, WindowMulFix::OUT8)?,
                ctx.get_sub(id, slot, WindowMulFix::OUT8 + 1)?,
            ];
            win_out.push(out);
            win_out8.push(wbase);
        }
        let dbl_last = feed_point(ctx, id, self.dbl_last(), wbase, &MontgomeryDouble)?;

        let mut acc = dbl_last;
        for i in 0..nw {
            acc = feed_montgomery_add(ctx, id, self.adder(i), acc, win_out[i])?;
        }
        let mut cacc = m_base;
        for i in 0..nw {
            let in2 = if i + 1 < nw { win_out8[i] } else { dbl_last };
            cacc = feed_montgomery_add(ctx, id, self.cadder(i), cacc, in2)?;
        }

        let sum = feed_point(ctx, id, self.m2e(), acc, &Montgomery2Edwards)?;
        let offset = feed_point(ctx, id, self.cm2e(), cacc, &Montgomery2Edwards)?;
        let cadd = self.cadd();
        ctx.feed_with(id, cadd, BabyAdd::X1, sum[0], &BabyAdd)?;
        ctx.feed_with(id, cadd, BabyAdd::Y1, sum[1], &BabyAdd)?;
        ctx.feed_with(id, cadd, BabyAdd::X2, -offset[0], &BabyAdd)?;
        ctx.feed_with(id, cadd, BabyAdd::Y2, offset[1], &BabyAdd)?;

        let out = [
            ctx.get_sub(id, cadd, BabyAdd::XOUT)?,
            ctx.get_sub(id, cadd, BabyAdd::YOUT)?,
        ];
        ctx.set(id, 0, out[0])?;
        ctx.set(id, 1, out[1])?;
        ctx.set(id, 2, wbase[0])?;
        ctx.set(id, 3, wbase[1])
    }
}

impl<F: Field> TemplateDef<F> for SegmentMulFix {
    fn name(&self) -> String {
        "SegmentMulFix".to_string()
    }

    fn instance_key(&self) -> String {
        format!("SegmentMulFix({})", self.windows)
    }

    fn signals(&self) -> Vec<SignalDecl> {
        vec![
            SignalDecl::input("e", &[3 * self.windows]),
            SignalDecl::input("base", &[2]),
            SignalDecl::output("out", &[2]),
            SignalDecl::output("dbl", &[2]),
        ]
    }

    fn subcomponents(&self) -> Vec<SubcomponentDecl<F>> {
        let dims = [self.windows];
        vec![
            SubcomponentDecl::single("e2m", Edwards2Montgomery),
            SubcomponentDecl::array("windows", &dims, WindowMulFix),
            SubcomponentDecl::array("adders", &dims, MontgomeryAdd),
            SubcomponentDecl::array("cadders", &dims, MontgomeryAdd),
            SubcomponentDecl::single("dblLast", MontgomeryDouble),
            SubcomponentDecl::single("m2e", Montgomery2Edwards),
            SubcomponentDecl::single("cm2e", Montgomery2Edwards),
            SubcomponentDecl::single("cadd", BabyAdd),
        ]
    }
}

/// `e * BASE` for an `n`-bit little-endian `e` and a point fixed when the
/// template is instantiated.
///
/// Signals: `out[2]` 0, `e[n]` 2.
///
/// Like [`crate::escalarmulany::EscalarMulAny`], `segments` mixes a full
/// segment instance with a shorter last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscalarMulFix {
    n: usize,
    base: [U256; 2],
}

impl EscalarMulFix {
    pub fn new(n: usize, base: [U256; 2]) -> Self {
        assert!(
            Self::supports(n),
            "cannot split {} bits into fixed-base segments",
            n
        );
        EscalarMulFix { n, base }
    }

    /// Multiplication of the subgroup generator.
    pub fn base8(n: usize) -> Self {
        let b = babyjub::base8::<BN254>();
        Self::new(n, [b.0.to_u256(), b.1.to_u256()])
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// Whether `n` bits leave a non-empty last segment. Segment counts are
    /// derived from 246 bits but segments take 249, so some widths such as
    /// 247 have none.
    pub fn supports(n: usize) -> bool {
        n >= 1 && n > ((n - 1) / 246) * SEGMENT_BITS
    }

    pub fn num_segments(&self) -> usize {
        (self.n - 1) / 246 + 1
    }

    pub fn segment_bits(&self, s: usize) -> usize {
        if s + 1 < self.num_segments() {
            SEGMENT_BITS
        } else {
            self.n - (self.num_segments() - 1) * SEGMENT_BITS
        }
    }

    fn segment(&self, s: usize) -> SegmentMulFix {
        SegmentMulFix::new((self.segment_bits(s) - 1) / 3 + 1)
    }

    fn m2e(&self, s: usize) -> usize {
        self.num_segments() + s
    }

    fn adder(&self, s: usize) -> usize {
        2 * self.num_segments() - 1 + s
    }
}

impl<F: Field> Template<F> for EscalarMulFix {
    fn run(&self, ctx: &mut Context<'_, F>, id: ComponentId) -> Result<(), Error> {
        let nseg = self.num_segments();
        ctx.create_all_subcomponents(id)?;

        let mut base = [ctx.constant(id, 0)?, ctx.constant(id, 1)?];
        let mut acc = [F::zero(), F::one()];
        for s in 0..nseg {
            let bits = self.segment_bits(s);
            let width = 3 * self.segment(s).windows();
            for i in 0..width {
                let e = if i < bits {
                    ctx.get(id, 2 + s * SEGMENT_BITS + i)?
                } else {
                    F::zero()
                };
                ctx.feed_io(id, s, SegmentMulFix::IO_E, i, e)?;
            }
            if s > 0 {
                let mut dbl = [F::zero(); 2];
                for k in 0..2 {
                    dbl[k] = ctx.get_sub_io(id, s - 1, SegmentMulFix::IO_DBL, k)?;
                }
                base = feed_point(ctx, id, self.m2e(s - 1), dbl, &Montgomery2Edwards)?;
            }
            for k in 0..2 {
                ctx.feed_io(id, s, SegmentMulFix::IO_BASE, k, base[k])?;
            }
            let out = [
                ctx.get_sub_io(id, s, SegmentMulFix::IO_OUT, 0)?,
                ctx.get_sub_io(id, s, SegmentMulFix::IO_OUT, 1)?,
            ];
            if s == 0 {
                acc = out;
                continue;
            }
            let adder = self.adder(s - 1);
            ctx.feed_with(id, adder, BabyAdd::X1, acc[0], &BabyAdd)?;
            ctx.feed_with(id, adder, BabyAdd::Y1, acc[1], &BabyAdd)?;
            ctx.feed_with(id, adder, BabyAdd::X2, out[0], &BabyAdd)?;
            ctx.feed_with(id, adder, BabyAdd::Y2, out[1], &BabyAdd)?;
            acc = [
                ctx.get_sub(id, adder, BabyAdd::XOUT)?,
                ctx.get_sub(id, adder, BabyAdd::YOUT)?,
            ];
        }
        ctx.set(id, 0, acc[0])?;
        ctx.set(id, 1, acc[1])
    }
}

impl<F: Field> TemplateDef<F> for EscalarMulFix {
    fn name(&self) -> String {
        "EscalarMulFix".to_string()
    }

    fn instance_key(&self) -> String {
        format!("EscalarMulFix({}, {}, {})", self.n, self.base[0], self.base[1])
    }

    fn signals(&self) -> Vec<SignalDecl> {
        vec![
            SignalDecl::input("e", &[self.n]),
            SignalDecl::output("out", &[2]),
        ]
    }

    fn subcomponents(&self) -> Vec<SubcomponentDecl<F>> {
        let nseg = self.num_segments();
        let dims = [nseg];
        let (full, last) = (self.segment(0), self.segment(nseg - 1));
        let mut res = Vec::new();
        if full == last {
            res.push(SubcomponentDecl::array("segments", &dims, full));
        } else {
            res.push(SubcomponentDecl::part("segments", &dims, 0, nseg - 1, full));
            res.push(SubcomponentDecl::part("segments", &dims, nseg - 1, 1, last));
        }
        if nseg > 1 {
            let dims = [nseg - 1];
            res.push(SubcomponentDecl::array("m2e", &dims, Montgomery2Edwards));
            res.push(SubcomponentDecl::array("adders", &dims, BabyAdd));
        }
        res
    }

    fn constants(&self) -> Vec<F> {
        vec![F::from_u256(self.base[0]), F::from_u256(self.base[1])]
    }
}

impl<F: Field> StdTemplate<F> for EscalarMulFix {
    type Params = usize;

    fn new_template(params: &usize) -> Self {
        EscalarMulFix::base8(*params)
    }

    fn new_assignment(params: &usize, mut rng: impl RngCore) -> InputSignals<F> {
        let e = (0..*params).map(|_| F::from(rng.next_u32() & 1)).collect();
        InputSignals::new().with("e", e)
    }
}
