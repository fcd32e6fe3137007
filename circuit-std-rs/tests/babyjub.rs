mod common;

use circuit_std_rs::{
    babyjub::{self, BabyAdd},
    escalarmulany::{EscalarMulAny, SegmentMulAny},
    montgomery::{Edwards2Montgomery, Montgomery2Edwards},
};
use common::{bits, calculator, run_out, std_template_test_helper};
use witness_calc::frontend::*;

const SUBGROUP_ORDER: (u128, u128) = (
    0x060c89ce5c263405370a08b6d0302b0b,
    0xab3eedb83920ee0a677297dc392126f1,
);

fn point(p: (BN254, BN254)) -> Vec<BN254> {
    vec![p.0, p.1]
}

/// Edwards to Montgomery and back.
#[derive(Clone, Copy)]
struct RoundTrip;

impl<F: Field> Template<F> for RoundTrip {
    fn run(&self, ctx: &mut Context<'_, F>, id: ComponentId) -> Result<(), Error> {
        ctx.create_all_subcomponents(id)?;
        for k in 0..2 {
            let v = ctx.get(id, 2 + k)?;
            ctx.feed_with(id, 0, 2 + k, v, &Edwards2Montgomery)?;
        }
        for k in 0..2 {
            let v = ctx.get_sub(id, 0, k)?;
            ctx.feed_with(id, 1, 2 + k, v, &Montgomery2Edwards)?;
        }
        for k in 0..2 {
            let v = ctx.get_sub(id, 1, k)?;
            ctx.set(id, k, v)?;
        }
        Ok(())
    }
}

impl<F: Field> TemplateDef<F> for RoundTrip {
    fn name(&self) -> String {
        "RoundTrip".to_string()
    }

    fn signals(&self) -> Vec<SignalDecl> {
        vec![
            SignalDecl::input("in", &[2]),
            SignalDecl::output("out", &[2]),
        ]
    }

    fn subcomponents(&self) -> Vec<SubcomponentDecl<F>> {
        vec![
            SubcomponentDecl::single("e2m", Edwards2Montgomery),
            SubcomponentDecl::single("m2e", Montgomery2Edwards),
        ]
    }
}

#[test]
fn test_native_curve() {
    let b8 = babyjub::base8::<BN254>();
    assert!(babyjub::in_curve(&b8));
    let order = U256::from_words(SUBGROUP_ORDER.0, SUBGROUP_ORDER.1);
    assert_eq!(babyjub::mul_scalar(order, &b8).unwrap(), babyjub::identity());
    let p = babyjub::mul_scalar(U256::from(7u32), &b8).unwrap();
    assert!(babyjub::in_curve(&p));
}

#[test]
fn test_baby_add() {
    let b8 = babyjub::base8::<BN254>();
    let p = babyjub::mul_scalar(U256::from(3u32), &b8).unwrap();
    let inputs = InputSignals::new()
        .with("x1", vec![b8.0])
        .with("y1", vec![b8.1])
        .with("x2", vec![p.0])
        .with("y2", vec![p.1]);
    let calc = calculator(BabyAdd);
    let signals = calc.calculate(&inputs).unwrap();
    let expected = babyjub::mul_scalar(U256::from(4u32), &b8).unwrap();
    assert_eq!(calc.main_signal(&signals, "xout").unwrap(), vec![expected.0]);
    assert_eq!(calc.main_signal(&signals, "yout").unwrap(), vec![expected.1]);
    std_template_test_helper::<BN254, BabyAdd>(&());
}

#[test]
fn test_montgomery_round_trip() {
    let p = babyjub::mul_scalar(U256::from(5u32), &babyjub::base8::<BN254>()).unwrap();
    let inputs = InputSignals::new().with("in", point(p));
    assert_eq!(run_out(RoundTrip, &inputs).unwrap(), point(p));

    // (x, 1) has no Montgomery image
    let inputs = InputSignals::new().with("in", vec![BN254::from(5u32), BN254::one()]);
    let err = run_out(RoundTrip, &inputs).err().unwrap();
    assert!(matches!(err, Error::ArithmeticError(_)));
    assert_eq!(err.diagnostic().unwrap().path(), "main.e2m");
}

fn escalar_mul(n: usize, k: U256, p: (BN254, BN254)) -> Result<Vec<BN254>, Error> {
    let inputs = InputSignals::new()
        .with("e", bits(k, n))
        .with("p", point(p));
    run_out(EscalarMulAny::new(n), &inputs)
}

#[test]
fn test_escalar_mul_any_single_segment() {
    let b8 = babyjub::base8::<BN254>();
    let k = U256::from(11u32);
    let expected = babyjub::mul_scalar(k, &b8).unwrap();
    assert_eq!(escalar_mul(4, k, b8).unwrap(), point(expected));
}

#[test]
fn test_escalar_mul_any_two_segments() {
    let p = babyjub::mul_scalar(U256::from(7u32), &babyjub::base8::<BN254>()).unwrap();
    let k = (U256::ONE << 149) + (U256::ONE << 148) + U256::from(5u32);
    let expected = babyjub::mul_scalar(k, &p).unwrap();
    assert_eq!(escalar_mul(150, k, p).unwrap(), point(expected));

    let expected = babyjub::mul_scalar(U256::ONE, &p).unwrap();
    assert_eq!(escalar_mul(150, U256::ONE, p).unwrap(), point(expected));
    assert_eq!(
        escalar_mul(150, U256::ZERO, p).unwrap(),
        point(babyjub::identity())
    );
}

#[test]
fn test_escalar_mul_any_zero_point() {
    let zero = babyjub::identity::<BN254>();
    assert_eq!(escalar_mul(4, U256::from(11u32), zero).unwrap(), point(zero));
    assert_eq!(
        escalar_mul(150, U256::from(12345u32), zero).unwrap(),
        point(zero)
    );
}

#[test]
fn test_escalar_mul_any_segments_layout() {
    let calc = calculator::<BN254, _>(EscalarMulAny::new(150));
    let layout = calc.layout();
    let main = layout.main_template().unwrap();
    let segments: Vec<_> = main
        .subcomponents
        .iter()
        .filter(|g| g.name == "segments")
        .collect();
    assert_eq!(segments.len(), 2);
    assert_eq!((segments[0].first_position, segments[0].count), (0, 1));
    assert_eq!((segments[1].first_position, segments[1].count), (1, 1));
    assert_ne!(segments[0].template_id, segments[1].template_id);
    for g in segments.iter() {
        assert_eq!(layout.template(g.template_id).unwrap().name, "SegmentMulAny");
    }
    let short = layout.template(segments[1].template_id).unwrap();
    let long = layout.template(segments[0].template_id).unwrap();
    assert_eq!(short.io[SegmentMulAny::IO_E].size(), 2);
    assert_eq!(long.io[SegmentMulAny::IO_E].size(), 148);
}

#[test]
fn test_escalar_mul_any_failure_trace() {
    let err = escalar_mul(150, U256::from(3u32), (BN254::from(5u32), BN254::one()))
        .err()
        .unwrap();
    let diag = err.diagnostic().unwrap();
    assert_eq!(diag.template, "Edwards2Montgomery");
    assert_eq!(diag.path(), "main.segments[0].e2m");
}

#[test]
fn test_escalar_mul_any_random() {
    std_template_test_helper::<BN254, EscalarMulAny>(&4);
    std_template_test_helper::<BN254, EscalarMulAny>(&150);
}

#[test]
#[should_panic]
fn test_escalar_mul_any_bad_width() {
    EscalarMulAny::new(149);
}

#[test]
#[should_panic]
fn test_segment_mul_any_bad_width() {
    SegmentMulAny::new(1);
}

#[test]
fn test_widths() {
    assert_eq!(SegmentMulAny::new(2).n(), 2);
    assert_eq!(EscalarMulAny::new(150).n(), 150);
    assert_eq!(EscalarMulAny::new(150).num_segments(), 2);
}
