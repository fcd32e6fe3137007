use rand::RngCore;
use witness_calc::frontend::*;

use crate::traits::StdTemplate;

pub const BABYJUB_A: u32 = 168700;
pub const BABYJUB_D: u32 = 168696;

pub type Point<F> = (F, F);

/// Generator of the prime-order subgroup.
pub fn base8<F: Field>() -> Point<F> {
    (
        F::from_u256(U256::from_words(
            0x0bb77a6ad63e739b4eacb2e09d6277c1,
            0x2ab8d8010534e0b62893f3f6bb957051,
        )),
        F::from_u256(U256::from_words(
            0x25797203f7a0b24925572e1cd16bf9ed,
            0xfce0051fb9e133774b3c257a872d7d8b,
        )),
    )
}

pub fn identity<F: Field>() -> Point<F> {
    (F::zero(), F::one())
}

pub fn in_curve<F: Field>(p: &Point<F>) -> bool {
    let (x2, y2) = (p.0 * p.0, p.1 * p.1);
    F::from(BABYJUB_A) * x2 + y2 == F::one() + F::from(BABYJUB_D) * x2 * y2
}

/// Native twisted Edwards addition, with the same formulas as [`BabyAdd`].
pub fn add<F: Field>(p: &Point<F>, q: &Point<F>) -> Option<Point<F>> {
    let (a, d) = (F::from(BABYJUB_A), F::from(BABYJUB_D));
    let beta = p.0 * q.1;
    let gamma = p.1 * q.0;
    let delta = (-a * p.0 + p.1) * (q.0 + q.1);
    let tau = d * beta * gamma;
    let x = ops::div(&(beta + gamma), &(F::one() + tau))?;
    let y = ops::div(&(delta + a * beta - gamma), &(F::one() - tau))?;
    Some((x, y))
}

/// Native double-and-add.
pub fn mul_scalar<F: Field>(k: U256, p: &Point<F>) -> Option<Point<F>> {
    let mut res = identity();
    let mut q = *p;
    let mut k = k;
    while k != U256::ZERO {
        if k & U256::ONE == U256::ONE {
            res = add(&res, &q)?;
        }
        q = add(&q, &q)?;
        k >>= 1;
    }
    Some(res)
}

/// Edwards point addition on Baby Jubjub.
///
/// Signals: `xout` 0, `yout` 1, `x1` 2, `y1` 3, `x2` 4, `y2` 5, then the
/// intermediates `beta`, `gamma`, `delta`, `tau`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BabyAdd;

impl BabyAdd {
    pub const XOUT: usize = 0;
    pub const YOUT: usize = 1;
    pub const X1: usize = 2;
    pub const Y1: usize = 3;
    pub const X2: usize = 4;
    pub const Y2: usize = 5;
}

impl<F: Field> Template<F> for BabyAdd {
    fn run(&self, ctx: &mut Context<'_, F>, id: ComponentId) -> Result<(), Error> {
        let a = ctx.constant(id, 0)?;
        let d = ctx.constant(id, 1)?;
        let x1 = ctx.get(id, Self::X1)?;
        let y1 = ctx.get(id, Self::Y1)?;
        let x2 = ctx.get(id, Self::X2)?;
        let y2 = ctx.get(id, Self::Y2)?;

        let beta = x1 * y2;
        let gamma = y1 * x2;
        let delta = (-a * x1 + y1) * (x2 + y2);
        let tau = d * beta * gamma;
        ctx.set(id, 6, beta)?;
        ctx.set(id, 7, gamma)?;
        ctx.set(id, 8, delta)?;
        ctx.set(id, 9, tau)?;

        let xout = ctx.div(id, beta + gamma, F::one() + tau, "xout <-- (beta + gamma) / (1 + tau)")?;
        ctx.set(id, Self::XOUT, xout)?;
        ctx.assert_eq(
            id,
            (F::one() + tau) * xout,
            beta + gamma,
            "(1 + tau) * xout === beta + gamma",
        )?;

        let yout = ctx.div(
            id,
            delta + a * beta - gamma,
            F::one() - tau,
            "yout <-- (delta + a*beta - gamma) / (1 - tau)",
        )?;
        ctx.set(id, Self::YOUT, yout)?;
        ctx.assert_eq(
            id,
            (F::one() - tau) * yout,
            delta + a * beta - gamma,
            "(1 - tau) * yout === delta + a*beta - gamma",
        )
    }
}

impl<F: Field> TemplateDef<F> for BabyAdd {
    fn name(&self) -> String {
        "BabyAdd".to_string()
    }

    fn signals(&self) -> Vec<SignalDecl> {
        vec![
            SignalDecl::input("x1", &[]),
            SignalDecl::input("y1", &[]),
            SignalDecl::input("x2", &[]),
            SignalDecl::input("y2", &[]),
            SignalDecl::output("xout", &[]),
            SignalDecl::output("yout", &[]),
            SignalDecl::intermediate("beta", &[]),
            SignalDecl::intermediate("gamma", &[]),
            SignalDecl::intermediate("delta", &[]),
            SignalDecl::intermediate("tau", &[]),
        ]
    }

    fn constants(&self) -> Vec<F> {
        vec![F::from(BABYJUB_A), F::from(BABYJUB_D)]
    }
}

fn random_point<F: Field>(mut rng: impl RngCore) -> Point<F> {
    let k = U256::from(rng.next_u64()) + U256::ONE;
    mul_scalar(k, &base8()).unwrap_or_else(identity)
}

impl<F: Field> StdTemplate<F> for BabyAdd {
    type Params = ();

    fn new_template(_: &()) -> Self {
        BabyAdd
    }

    fn new_assignment(_: &(), mut rng: impl RngCore) -> InputSignals<F> {
        let p = random_point::<F>(&mut rng);
        let q = random_point::<F>(&mut rng);
        InputSignals::new()
            .with("x1", vec![p.0])
            .with("y1", vec![p.1])
            .with("x2", vec![q.0])
            .with("y2", vec![q.1])
    }
}
