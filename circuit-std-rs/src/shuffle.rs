//! Shuffle-and-re-encrypt of a deck of ElGamal-encrypted cards.
//!
//! A deck of `n` cards is four rows of `n` coordinates: `c0.x`, `c0.y`,
//! `c1.x`, `c1.y`. The compressed variant carries only the x coordinates
//! plus a sign bit and a `delta` hint per y coordinate.

use rand::{seq::SliceRandom, RngCore};
use witness_calc::frontend::*;

use crate::{
    babyjub::{self, Point, BABYJUB_A, BABYJUB_D},
    bitify::Num2Bits,
    comparators::CompConstant,
    elgamal::{self, ElGamalEncrypt},
    permutation::Permutation,
    traits::StdTemplate,
};

/// Bits of the re-encryption randomness in the deployed circuit.
pub const NUM_BITS: usize = 251;

/// Largest deck whose sign bits fit one field element.
pub const MAX_CARDS: usize = 253;

/// `out = A * B` for a row-major `m x n` matrix `A` and a vector `B`.
///
/// Signals: `out[m]` 0, `A[m * n]` `m`, `B[n]` after `A`, then `tmp[m * n]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixMultiplication {
    m: usize,
    n: usize,
}

impl MatrixMultiplication {
    pub fn new(m: usize, n: usize) -> Self {
        MatrixMultiplication { m, n }
    }

    pub fn a(&self, i: usize, j: usize) -> usize {
        self.m + i * self.n + j
    }

    pub fn b(&self, j: usize) -> usize {
        self.m + self.m * self.n + j
    }

    fn tmp(&self, i: usize, j: usize) -> usize {
        self.m + self.m * self.n + self.n + i * self.n + j
    }
}

impl<F: Field> Template<F> for MatrixMultiplication {
    fn run(&self, ctx: &mut Context<'_, F>, id: ComponentId) -> Result<(), Error> {
        for i in 0..self.m {
            let mut sum = F::zero();
            for j in 0..self.n {
                let t = ctx.get(id, self.a(i, j))? * ctx.get(id, self.b(j))?;
                ctx.set(id, self.tmp(i, j), t)?;
                sum += t;
            }
            ctx.set(id, i, sum)?;
        }
        Ok(())
    }
}

impl<F: Field> TemplateDef<F> for MatrixMultiplication {
    fn name(&self) -> String {
        "matrixMultiplication".to_string()
    }

    fn instance_key(&self) -> String {
        format!("matrixMultiplication({}, {})", self.m, self.n)
    }

    fn signals(&self) -> Vec<SignalDecl> {
        vec![
            SignalDecl::input("A", &[self.m, self.n]),
            SignalDecl::input("B", &[self.n]),
            SignalDecl::output("out", &[self.m]),
            SignalDecl::intermediate("tmp", &[self.m, self.n]),
        ]
    }
}

impl<F: Field> StdTemplate<F> for MatrixMultiplication {
    type Params = (usize, usize);

    fn new_template(params: &(usize, usize)) -> Self {
        MatrixMultiplication::new(params.0, params.1)
    }

    fn new_assignment(params: &(usize, usize), mut rng: impl RngCore) -> InputSignals<F> {
        let (m, n) = *params;
        let a = (0..m * n).map(|_| F::random_unsafe(&mut rng)).collect();
        let b = (0..n).map(|_| F::random_unsafe(&mut rng)).collect();
        InputSignals::new().with("A", a).with("B", b)
    }
}

/// Recovers the y coordinate of a curve point from its x coordinate, the
/// hint `delta = min(y, -y)` and the sign bit `s` (`1` when `y = delta`).
///
/// Signals: `out` 0, `x` 1, `s` 2, `delta` 3, then `x2`, `y2`, `sdelta`,
/// `ndelta`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EcDecompress;

impl EcDecompress {
    pub const OUT: usize = 0;
    pub const X: usize = 1;
    pub const S: usize = 2;
    pub const DELTA: usize = 3;

    const X2: usize = 4;
    const Y2: usize = 5;
    const SDELTA: usize = 6;
    const NDELTA: usize = 7;

    const N2B: usize = 0;
    const CMP: usize = 1;

    fn num2bits() -> Num2Bits {
        Num2Bits::new(254)
    }

    fn half<F: Field>() -> CompConstant {
        CompConstant::new((F::MODULUS - U256::ONE) >> 1)
    }
}

impl<F: Field> Template<F> for EcDecompress {
    fn run(&self, ctx: &mut Context<'_, F>, id: ComponentId) -> Result<(), Error> {
        ctx.create_all_subcomponents(id)?;
        let (n2b, cmp) = (&Self::num2bits(), &Self::half::<F>());
        let delta = ctx.get(id, Self::DELTA)?;
        ctx.feed_with(id, Self::N2B, n2b.input(), delta, n2b)?;
        for i in 0..254 {
            let bit = ctx.get_sub(id, Self::N2B, n2b.out(i))?;
            ctx.feed_with(id, Self::CMP, 1 + i, bit, cmp)?;
        }
        let above = ctx.get_sub(id, Self::CMP, 0)?;
        ctx.assert(id, above == F::zero(), "cmp.out == 0")?;

        let x = ctx.get(id, Self::X)?;
        let x2 = x * x;
        let y2 = delta * delta;
        ctx.set(id, Self::X2, x2)?;
        ctx.set(id, Self::Y2, y2)?;
        let (a, d) = (ctx.constant(id, 0)?, ctx.constant(id, 1)?);
        ctx.assert(
            id,
            a * x2 + y2 == F::one() + d * x2 * y2,
            "a * x2 + y2 == 1 + d * x2 * y2",
        )?;

        let s = ctx.get(id, Self::S)?;
        let sdelta = s * delta;
        let ndelta = (s - F::one()) * delta;
        ctx.set(id, Self::SDELTA, sdelta)?;
        ctx.set(id, Self::NDELTA, ndelta)?;
        ctx.set(id, Self::OUT, sdelta + ndelta)
    }
}

impl<F: Field> TemplateDef<F> for EcDecompress {
    fn name(&self) -> String {
        "ecDecompress".to_string()
    }

    fn signals(&self) -> Vec<SignalDecl> {
        vec![
            SignalDecl::input("x", &[]),
            SignalDecl::input("s", &[]),
            SignalDecl::input("delta", &[]),
            SignalDecl::output("out", &[]),
            SignalDecl::intermediate("x2", &[]),
            SignalDecl::intermediate("y2", &[]),
            SignalDecl::intermediate("sdelta", &[]),
            SignalDecl::intermediate("ndelta", &[]),
        ]
    }

    fn subcomponents(&self) -> Vec<SubcomponentDecl<F>> {
        vec![
            SubcomponentDecl::single("n2b", Self::num2bits()),
            SubcomponentDecl::single("cmp", Self::half::<F>()),
        ]
    }

    fn constants(&self) -> Vec<F> {
        vec![F::from(BABYJUB_A), F::from(BABYJUB_D)]
    }
}

/// `(x, delta, s)` with `delta = y` and `s = 1` when `y <= (p - 1) / 2`,
/// otherwise `delta = -y` and `s = 0`.
pub fn compress<F: Field>(p: &Point<F>) -> (F, F, bool) {
    let half = (F::MODULUS - U256::ONE) >> 1;
    if p.1.to_u256() <= half {
        (p.0, p.1, true)
    } else {
        (p.0, -p.1, false)
    }
}

impl<F: Field> StdTemplate<F> for EcDecompress {
    type Params = ();

    fn new_template(_: &()) -> Self {
        EcDecompress
    }

    fn new_assignment(_: &(), mut rng: impl RngCore) -> InputSignals<F> {
        let p: Point<F> = elgamal::random_point(&mut rng);
        let (x, delta, s) = compress(&p);
        InputSignals::new()
            .with("x", vec![x])
            .with("s", vec![F::from(s as u32)])
            .with("delta", vec![delta])
    }
}

/// Permutes a deck by the permutation matrix `A` and re-encrypts every card
/// under `pk` with randomness `R[i]`.
///
/// Signals: `B[4n]` 0, `A[n * n]` `4n`, `X[4n]`, `R[n]`, `pk[2]`, then the
/// permuted deck `Y[4n]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShuffleEncrypt {
    num_cards: usize,
    num_bits: usize,
}

impl ShuffleEncrypt {
    const PERMUTATION: usize = 0;
    const SHUFFLE: usize = 1;
    const ELGAMAL: usize = 5;

    pub fn new(num_cards: usize, num_bits: usize) -> Self {
        assert!(num_cards >= 1, "an empty deck cannot be shuffled");
        assert!(
            ElGamalEncrypt::supports(num_bits),
            "no re-encryption with {}-bit randomness",
            num_bits
        );
        ShuffleEncrypt {
            num_cards,
            num_bits,
        }
    }

    pub fn a(&self, i: usize) -> usize {
        4 * self.num_cards + i
    }

    pub fn x(&self, i: usize) -> usize {
        4 * self.num_cards + self.num_cards * self.num_cards + i
    }

    pub fn r(&self, i: usize) -> usize {
        8 * self.num_cards + self.num_cards * self.num_cards + i
    }

    pub fn pk(&self, k: usize) -> usize {
        9 * self.num_cards + self.num_cards * self.num_cards + k
    }

    fn y(&self, i: usize) -> usize {
        self.pk(2) + i
    }
}

impl<F: Field> Template<F> for ShuffleEncrypt {
    fn run(&self, ctx: &mut Context<'_, F>, id: ComponentId) -> Result<(), Error> {
        let n = self.num_cards;
        ctx.create_all_subcomponents(id)?;
        let perm = &Permutation { n };
        let mm = &MatrixMultiplication::new(n, n);
        for i in 0..n * n {
            let a = ctx.get(id, self.a(i))?;
            ctx.feed_with(id, Self::PERMUTATION, i, a, perm)?;
            for row in 0..4 {
                ctx.feed_with(id, Self::SHUFFLE + row, mm.a(i / n, i % n), a, mm)?;
            }
        }
        for row in 0..4 {
            for j in 0..n {
                let x = ctx.get(id, self.x(row * n + j))?;
                ctx.feed_with(id, Self::SHUFFLE + row, mm.b(j), x, mm)?;
            }
            for j in 0..n {
                let y = ctx.get_sub(id, Self::SHUFFLE + row, j)?;
                ctx.set(id, self.y(row * n + j), y)?;
            }
        }

        let elgamal = &ElGamalEncrypt::new(self.num_bits);
        let pk = [ctx.get(id, self.pk(0))?, ctx.get(id, self.pk(1))?];
        for i in 0..n {
            let slot = Self::ELGAMAL + i;
            for row in 0..4 {
                let y = ctx.get(id, self.y(row * n + i))?;
                let at = if row < 2 {
                    ElGamalEncrypt::IC0 + row
                } else {
                    ElGamalEncrypt::IC1 + row - 2
                };
                ctx.feed_with(id, slot, at, y, elgamal)?;
            }
            let r = ctx.get(id, self.r(i))?;
            ctx.feed_with(id, slot, ElGamalEncrypt::R, r, elgamal)?;
            for k in 0..2 {
                ctx.feed_with(id, slot, ElGamalEncrypt::PK + k, pk[k], elgamal)?;
            }
            for row in 0..4 {
                let b = ctx.get_sub(id, slot, ElGamalEncrypt::C0 + row)?;
                ctx.set(id, row * n + i, b)?;
            }
        }
        Ok(())
    }
}

impl<F: Field> TemplateDef<F> for ShuffleEncrypt {
    fn name(&self) -> String {
        "ShuffleEncryptTemplate".to_string()
    }

    fn instance_key(&self) -> String {
        format!("ShuffleEncryptTemplate({}, {})", self.num_cards, self.num_bits)
    }

    fn signals(&self) -> Vec<SignalDecl> {
        let n = self.num_cards;
        vec![
            SignalDecl::input("A", &[n * n]),
            SignalDecl::input("X", &[4 * n]),
            SignalDecl::input("R", &[n]),
            SignalDecl::input("pk", &[2]),
            SignalDecl::output("B", &[4 * n]),
            SignalDecl::intermediate("Y", &[4 * n]),
        ]
    }

    fn subcomponents(&self) -> Vec<SubcomponentDecl<F>> {
        let n = self.num_cards;
        vec![
            SubcomponentDecl::single("permutation", Permutation { n }),
            SubcomponentDecl::array("shuffle", &[4], MatrixMultiplication::new(n, n)),
            SubcomponentDecl::array("elgamal", &[n], ElGamalEncrypt::new(self.num_bits)),
        ]
    }
}

/// Named input rows of the compressed shuffle, in the order the inner
/// template declares them.
const COMPRESSED_ROWS: [&str; 8] = [
    "UX0", "UX1", "VX0", "VX1", "UDelta0", "UDelta1", "VDelta0", "VDelta1",
];

/// [`ShuffleEncrypt`] over compressed decks: the input deck `U` and the
/// claimed output deck `V` are checked against the shuffle instead of
/// being returned.
///
/// Signals (all inputs): `pk[2]` 0, `UX0`, `UX1`, `VX0`, `VX1`, `UDelta0`,
/// `UDelta1`, `VDelta0`, `VDelta1` (each `[n]`), `s_u[2]`, `s_v[2]`,
/// `A[n * n]`, `R[n]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShuffleEncryptV2Template {
    num_cards: usize,
    num_bits: usize,
}

impl ShuffleEncryptV2Template {
    const SIGNS: usize = 0;
    const DECOMPRESS: usize = 4;

    pub fn new(num_cards: usize, num_bits: usize) -> Self {
        assert!(
            Self::supports(num_cards, num_bits),
            "cannot shuffle {} cards with {}-bit randomness",
            num_cards,
            num_bits
        );
        ShuffleEncryptV2Template {
            num_cards,
            num_bits,
        }
    }

    pub fn supports(num_cards: usize, num_bits: usize) -> bool {
        (1..=MAX_CARDS).contains(&num_cards) && ElGamalEncrypt::supports(num_bits)
    }

    pub fn pk(&self, k: usize) -> usize {
        k
    }

    /// Element `i` of the `row`-th entry of `COMPRESSED_ROWS`.
    fn row(&self, row: usize, i: usize) -> usize {
        2 + row * self.num_cards + i
    }

    fn s_u(&self, k: usize) -> usize {
        2 + 8 * self.num_cards + k
    }

    fn s_v(&self, k: usize) -> usize {
        4 + 8 * self.num_cards + k
    }

    fn a(&self, i: usize) -> usize {
        6 + 8 * self.num_cards + i
    }

    fn r(&self, i: usize) -> usize {
        6 + 8 * self.num_cards + self.num_cards * self.num_cards + i
    }

    fn shuffle(&self) -> usize {
        Self::DECOMPRESS + 4 * self.num_cards
    }
}

impl<F: Field> Template<F> for ShuffleEncryptV2Template {
    fn run(&self, ctx: &mut Context<'_, F>, id: ComponentId) -> Result<(), Error> {
        let n = self.num_cards;
        ctx.assert(id, n <= MAX_CARDS, "numCards <= 253")?;
        ctx.create_all_subcomponents(id)?;

        let n2b = &Num2Bits::new(n);
        let signs = [self.s_u(0), self.s_u(1), self.s_v(0), self.s_v(1)];
        for (k, &at) in signs.iter().enumerate() {
            let v = ctx.get(id, at)?;
            ctx.feed_with(id, Self::SIGNS + k, n2b.input(), v, n2b)?;
        }

        // decompress[q * n + i] takes UX0, UX1, VX0, VX1 for q = 0..4
        let dec = &EcDecompress;
        for q in 0..4 {
            for i in 0..n {
                let slot = Self::DECOMPRESS + q * n + i;
                let x = ctx.get(id, self.row(q, i))?;
                let s = ctx.get_sub(id, Self::SIGNS + q, n2b.out(i))?;
                let delta = ctx.get(id, self.row(4 + q, i))?;
                ctx.feed_with(id, slot, EcDecompress::X, x, dec)?;
                ctx.feed_with(id, slot, EcDecompress::S, s, dec)?;
                ctx.feed_with(id, slot, EcDecompress::DELTA, delta, dec)?;
            }
        }

        let inner = &ShuffleEncrypt::new(n, self.num_bits);
        let shuffle = self.shuffle();
        for i in 0..n * n {
            let a = ctx.get(id, self.a(i))?;
            ctx.feed_with(id, shuffle, inner.a(i), a, inner)?;
        }
        for i in 0..n {
            let deck = [
                ctx.get(id, self.row(0, i))?,
                ctx.get_sub(id, Self::DECOMPRESS + i, EcDecompress::OUT)?,
                ctx.get(id, self.row(1, i))?,
                ctx.get_sub(id, Self::DECOMPRESS + n + i, EcDecompress::OUT)?,
            ];
            for (row, v) in deck.into_iter().enumerate() {
                ctx.feed_with(id, shuffle, inner.x(row * n + i), v, inner)?;
            }
        }
        for i in 0..n {
            let r = ctx.get(id, self.r(i))?;
            ctx.feed_with(id, shuffle, inner.r(i), r, inner)?;
        }
        for k in 0..2 {
            let pk = ctx.get(id, self.pk(k))?;
            ctx.feed_with(id, shuffle, inner.pk(k), pk, inner)?;
        }

        for i in 0..n {
            let expected = [
                ctx.get(id, self.row(2, i))?,
                ctx.get_sub(id, Self::DECOMPRESS + 2 * n + i, EcDecompress::OUT)?,
                ctx.get(id, self.row(3, i))?,
                ctx.get_sub(id, Self::DECOMPRESS + 3 * n + i, EcDecompress::OUT)?,
            ];
            for (row, v) in expected.into_iter().enumerate() {
                let b = ctx.get_sub(id, shuffle, row * n + i)?;
                ctx.assert_eq(id, b, v, "shuffleEncryptV1.B === V")?;
            }
        }
        Ok(())
    }
}

impl<F: Field> TemplateDef<F> for ShuffleEncryptV2Template {
    fn name(&self) -> String {
        "ShuffleEncryptV2Template".to_string()
    }

    fn instance_key(&self) -> String {
        format!(
            "ShuffleEncryptV2Template({}, {})",
            self.num_cards, self.num_bits
        )
    }

    fn signals(&self) -> Vec<SignalDecl> {
        let n = self.num_cards;
        let mut res = vec![SignalDecl::input("pk", &[2])];
        for name in COMPRESSED_ROWS {
            res.push(SignalDecl::input(name, &[n]));
        }
        res.push(SignalDecl::input("s_u", &[2]));
        res.push(SignalDecl::input("s_v", &[2]));
        res.push(SignalDecl::input("A", &[n * n]));
        res.push(SignalDecl::input("R", &[n]));
        res
    }

    fn subcomponents(&self) -> Vec<SubcomponentDecl<F>> {
        let n = self.num_cards;
        let mut res: Vec<SubcomponentDecl<F>> = ["n2b_u0", "n2b_u1", "n2b_v0", "n2b_v1"]
            .iter()
            .map(|name| SubcomponentDecl::single(name, Num2Bits::new(n)))
            .collect();
        res.push(SubcomponentDecl::array("decompress", &[4 * n], EcDecompress));
        res.push(SubcomponentDecl::single(
            "shuffleEncryptV1",
            ShuffleEncrypt::new(n, self.num_bits),
        ));
        res
    }
}

/// Root of the compressed shuffle. Besides the checks of
/// [`ShuffleEncryptV2Template`] it outputs `pk[0] * pk[1]`, which binds the
/// public key into the witness.
///
/// Signals: `out` 0, then the inputs `pk[2]`, `UX0`, `UX1`, `VX0`, `VX1`,
/// `s_u[2]`, `s_v[2]`, `UDelta0`, `UDelta1`, `VDelta0`, `VDelta1`, `A`, `R`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShuffleEncryptV2 {
    inner: ShuffleEncryptV2Template,
}

impl ShuffleEncryptV2 {
    pub fn new(num_cards: usize, num_bits: usize) -> Self {
        ShuffleEncryptV2 {
            inner: ShuffleEncryptV2Template::new(num_cards, num_bits),
        }
    }

    pub fn num_cards(&self) -> usize {
        self.inner.num_cards
    }

    /// Own inputs in declaration order: name, size and the offset of its
    /// first element in the inner template.
    fn inputs(&self) -> Vec<(&'static str, usize, usize)> {
        let t = &self.inner;
        let n = t.num_cards;
        let mut res = vec![("pk", 2, t.pk(0))];
        for q in 0..4 {
            res.push((COMPRESSED_ROWS[q], n, t.row(q, 0)));
        }
        res.push(("s_u", 2, t.s_u(0)));
        res.push(("s_v", 2, t.s_v(0)));
        for q in 4..8 {
            res.push((COMPRESSED_ROWS[q], n, t.row(q, 0)));
        }
        res.push(("A", n * n, t.a(0)));
        res.push(("R", n, t.r(0)));
        res
    }
}

impl<F: Field> Template<F> for ShuffleEncryptV2 {
    fn run(&self, ctx: &mut Context<'_, F>, id: ComponentId) -> Result<(), Error> {
        ctx.create_all_subcomponents(id)?;
        let pk = [ctx.get(id, 1)?, ctx.get(id, 2)?];
        ctx.set(id, 0, pk[0] * pk[1])?;
        let mut at = 1;
        for (_, size, to) in self.inputs() {
            for i in 0..size {
                let v = ctx.get(id, at + i)?;
                ctx.feed_with(id, 0, to + i, v, &self.inner)?;
            }
            at += size;
        }
        Ok(())
    }
}

impl<F: Field> TemplateDef<F> for ShuffleEncryptV2 {
    fn name(&self) -> String {
        "ShuffleEncryptV2".to_string()
    }

    fn instance_key(&self) -> String {
        format!(
            "ShuffleEncryptV2({}, {})",
            self.inner.num_cards, self.inner.num_bits
        )
    }

    fn signals(&self) -> Vec<SignalDecl> {
        let mut res = vec![SignalDecl::output("out", &[])];
        for (name, size, _) in self.inputs() {
            res.push(SignalDecl::input(name, &[size]));
        }
        res
    }

    fn subcomponents(&self) -> Vec<SubcomponentDecl<F>> {
        vec![SubcomponentDecl::single("shuffle_encrypt", self.inner)]
    }
}

/// A satisfying assignment of [`ShuffleEncryptV2`]: a random deck, a random
/// permutation and randomness, and the deck they produce.
pub fn random_deal<F: Field>(
    num_cards: usize,
    num_bits: usize,
    mut rng: impl RngCore,
) -> InputSignals<F> {
    let n = num_cards;
    let pk: Point<F> = elgamal::random_point(&mut rng);
    let deck: Vec<(Point<F>, Point<F>)> = (0..n)
        .map(|_| (elgamal::random_point(&mut rng), elgamal::random_point(&mut rng)))
        .collect();
    let mut perm: Vec<usize> = (0..n).collect();
    perm.shuffle(&mut rng);
    let mut a = vec![F::zero(); n * n];
    for (i, &j) in perm.iter().enumerate() {
        a[i * n + j] = F::one();
    }
    let r: Vec<U256> = (0..n)
        .map(|_| elgamal::random_scalar(&mut rng, num_bits))
        .collect();
    let dealt: Vec<(Point<F>, Point<F>)> = (0..n)
        .map(|i| {
            let (c0, c1) = deck[perm[i]];
            elgamal::encrypt(&c0, &c1, r[i], &pk)
                .unwrap_or((babyjub::identity(), babyjub::identity()))
        })
        .collect();

    let mut inputs = InputSignals::new().with("pk", vec![pk.0, pk.1]);
    let mut signs = [U256::ZERO; 4];
    for (q, cards) in [&deck, &deck, &dealt, &dealt].into_iter().enumerate() {
        let mut xs = Vec::with_capacity(n);
        let mut deltas = Vec::with_capacity(n);
        for (i, card) in cards.iter().enumerate() {
            let p = if q % 2 == 0 { card.0 } else { card.1 };
            let (x, delta, s) = compress(&p);
            xs.push(x);
            deltas.push(delta);
            if s {
                signs[q] |= U256::ONE << i as u32;
            }
        }
        inputs = inputs
            .with(COMPRESSED_ROWS[q], xs)
            .with(COMPRESSED_ROWS[4 + q], deltas);
    }
    inputs
        .with("s_u", vec![F::from_u256(signs[0]), F::from_u256(signs[1])])
        .with("s_v", vec![F::from_u256(signs[2]), F::from_u256(signs[3])])
        .with("A", a)
        .with("R", r.into_iter().map(F::from_u256).collect())
}

impl<F: Field> StdTemplate<F> for ShuffleEncryptV2 {
    type Params = (usize, usize);

    fn new_template(params: &(usize, usize)) -> Self {
        ShuffleEncryptV2::new(params.0, params.1)
    }

    fn new_assignment(params: &(usize, usize), rng: impl RngCore) -> InputSignals<F> {
        random_deal(params.0, params.1, rng)
    }
}
