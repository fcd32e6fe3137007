//! ElGamal re-encryption of a Baby Jubjub ciphertext.

use rand::RngCore;
use witness_calc::frontend::*;

use crate::{
    babyjub::{self, BabyAdd, Point},
    bitify::Num2Bits,
    escalarmulany::EscalarMulAny,
    escalarmulfix::EscalarMulFix,
    traits::StdTemplate,
};

/// `c0 = ic0 + r * B8`, `c1 = ic1 + r * pk` for an `r` of `num_bits` bits.
///
/// Signals: `c0[2]` 0, `c1[2]` 2, `ic0[2]` 4, `ic1[2]` 6, `r` 8, `pk[2]` 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElGamalEncrypt {
    num_bits: usize,
}

impl ElGamalEncrypt {
    pub const C0: usize = 0;
    pub const C1: usize = 2;
    pub const IC0: usize = 4;
    pub const IC1: usize = 6;
    pub const R: usize = 8;
    pub const PK: usize = 9;

    const BITS: usize = 0;
    const COMPUTE_C0: usize = 1;
    const ADDER0: usize = 2;
    const COMPUTE_C1: usize = 3;
    const ADDER1: usize = 4;

    pub fn new(num_bits: usize) -> Self {
        assert!(
            Self::supports(num_bits),
            "no scalar multiplication over {} bits",
            num_bits
        );
        ElGamalEncrypt { num_bits }
    }

    pub fn supports(num_bits: usize) -> bool {
        EscalarMulFix::supports(num_bits) && EscalarMulAny::supports(num_bits)
    }

    pub fn num_bits(&self) -> usize {
        self.num_bits
    }
}

fn add_points<F: Field>(
    ctx: &mut Context<'_, F>,
    id: ComponentId,
    slot: usize,
    p: [F; 2],
    q: [F; 2],
) -> Result<[F; 2], Error> {
    ctx.feed_with(id, slot, BabyAdd::X1, p[0], &BabyAdd)?;
    ctx.feed_with(id, slot, BabyAdd::Y1, p[1], &BabyAdd)?;
    ctx.feed_with(id, slot, BabyAdd::X2, q[0], &BabyAdd)?;
    ctx.feed_with(id, slot, BabyAdd::Y2, q[1], &BabyAdd)?;
    Ok([
        ctx.get_sub(id, slot, BabyAdd::XOUT)?,
        ctx.get_sub(id, slot, BabyAdd::YOUT)?,
    ])
}

impl<F: Field> Template<F> for ElGamalEncrypt {
    fn run(&self, ctx: &mut Context<'_, F>, id: ComponentId) -> Result<(), Error> {
        let n = self.num_bits;
        ctx.create_all_subcomponents(id)?;
        let n2b = &Num2Bits::new(n);
        let r = ctx.get(id, Self::R)?;
        ctx.feed_with(id, Self::BITS, n2b.input(), r, n2b)?;

        let fix = &EscalarMulFix::base8(n);
        let any = &EscalarMulAny::new(n);
        for i in 0..n {
            let bit = ctx.get_sub(id, Self::BITS, n2b.out(i))?;
            ctx.feed_with(id, Self::COMPUTE_C0, 2 + i, bit, fix)?;
            ctx.feed_with(id, Self::COMPUTE_C1, 2 + i, bit, any)?;
        }
        for k in 0..2 {
            let pk = ctx.get(id, Self::PK + k)?;
            ctx.feed_with(id, Self::COMPUTE_C1, 2 + n + k, pk, any)?;
        }

        let rb = [
            ctx.get_sub(id, Self::COMPUTE_C0, 0)?,
            ctx.get_sub(id, Self::COMPUTE_C0, 1)?,
        ];
        let ic0 = [ctx.get(id, Self::IC0)?, ctx.get(id, Self::IC0 + 1)?];
        let c0 = add_points(ctx, id, Self::ADDER0, rb, ic0)?;

        let rpk = [
            ctx.get_sub(id, Self::COMPUTE_C1, 0)?,
            ctx.get_sub(id, Self::COMPUTE_C1, 1)?,
        ];
        let ic1 = [ctx.get(id, Self::IC1)?, ctx.get(id, Self::IC1 + 1)?];
        let c1 = add_points(ctx, id, Self::ADDER1, rpk, ic1)?;

        for k in 0..2 {
            ctx.set(id, Self::C0 + k, c0[k])?;
            ctx.set(id, Self::C1 + k, c1[k])?;
        }
        Ok(())
    }
}

impl<F: Field> TemplateDef<F> for ElGamalEncrypt {
    fn name(&self) -> String {
        "ElGamalEncrypt".to_string()
    }

    fn instance_key(&self) -> String {
        format!("ElGamalEncrypt({})", self.num_bits)
    }

    fn signals(&self) -> Vec<SignalDecl> {
        vec![
            SignalDecl::input("ic0", &[2]),
            SignalDecl::input("ic1", &[2]),
            SignalDecl::input("r", &[]),
            SignalDecl::input("pk", &[2]),
            SignalDecl::output("c0", &[2]),
            SignalDecl::output("c1", &[2]),
        ]
    }

    fn subcomponents(&self) -> Vec<SubcomponentDecl<F>> {
        let n = self.num_bits;
        vec![
            SubcomponentDecl::single("bitDecomposition", Num2Bits::new(n)),
            SubcomponentDecl::single("computeC0", EscalarMulFix::base8(n)),
            SubcomponentDecl::single("adder0", BabyAdd),
            SubcomponentDecl::single("computeC1", EscalarMulAny::new(n)),
            SubcomponentDecl::single("adder1", BabyAdd),
        ]
    }
}

/// Native ElGamal re-encryption, `None` only on a degenerate addition.
pub fn encrypt<F: Field>(
    ic0: &Point<F>,
    ic1: &Point<F>,
    r: U256,
    pk: &Point<F>,
) -> Option<(Point<F>, Point<F>)> {
    let rb = babyjub::mul_scalar(r, &babyjub::base8())?;
    let rpk = babyjub::mul_scalar(r, pk)?;
    Some((babyjub::add(&rb, ic0)?, babyjub::add(&rpk, ic1)?))
}

/// A random point of the prime-order subgroup.
pub fn random_point<F: Field>(rng: &mut impl RngCore) -> Point<F> {
    let k = U256::from(rng.next_u64()) + U256::ONE;
    babyjub::mul_scalar(k, &babyjub::base8()).unwrap_or_else(babyjub::identity)
}

/// A random scalar of at most `num_bits` bits.
pub fn random_scalar(rng: &mut impl RngCore, num_bits: usize) -> U256 {
    let mut r = U256::ZERO;
    for i in 0..num_bits.min(250) {
        if rng.next_u32() & 1 == 1 {
            r |= U256::ONE << i as u32;
        }
    }
    r
}

impl<F: Field> StdTemplate<F> for ElGamalEncrypt {
    type Params = usize;

    fn new_template(params: &usize) -> Self {
        ElGamalEncrypt::new(*params)
    }

    fn new_assignment(params: &usize, mut rng: impl RngCore) -> InputSignals<F> {
        let ic0: Point<F> = random_point(&mut rng);
        let ic1: Point<F> = random_point(&mut rng);
        let pk: Point<F> = random_point(&mut rng);
        let r = random_scalar(&mut rng, *params);
        InputSignals::new()
            .with("ic0", vec![ic0.0, ic0.1])
            .with("ic1", vec![ic1.0, ic1.1])
            .with("r", vec![F::from_u256(r)])
            .with("pk", vec![pk.0, pk.1])
    }
}
