use super::*;
use crate::{
    calcwit::{ComponentState, Context, WitnessCalculator},
    circuit::input::InputSignals,
    field::{M31, U256},
};

struct Square;

impl Template<M31> for Square {
    fn run(&self, ctx: &mut Context<'_, M31>, id: usize) -> Result<(), Error> {
        let x = ctx.get(id, 1)?;
        ctx.set(id, 0, x * x)
    }
}

impl TemplateDef<M31> for Square {
    fn name(&self) -> String {
        "Square".to_string()
    }

    fn signals(&self) -> Vec<SignalDecl> {
        vec![SignalDecl::input("in", &[]), SignalDecl::output("out", &[])]
    }
}

struct SumOfSquares(usize);

impl Template<M31> for SumOfSquares {
    fn run(&self, ctx: &mut Context<'_, M31>, id: usize) -> Result<(), Error> {
        ctx.create_all_subcomponents(id)?;
        let mut acc = ctx.constant(id, 0)?;
        for i in 0..self.0 {
            let x = ctx.get(id, 1 + i)?;
            ctx.feed_with(id, i, 1, x, &Square)?;
            acc += ctx.get_sub(id, i, 0)?;
        }
        ctx.set(id, 0, acc)
    }
}

impl TemplateDef<M31> for SumOfSquares {
    fn name(&self) -> String {
        "SumOfSquares".to_string()
    }

    fn instance_key(&self) -> String {
        format!("SumOfSquares({})", self.0)
    }

    fn signals(&self) -> Vec<SignalDecl> {
        vec![SignalDecl::output("out", &[]), SignalDecl::input("in", &[self.0])]
    }

    fn subcomponents(&self) -> Vec<SubcomponentDecl<M31>> {
        vec![SubcomponentDecl::array("sq", &[self.0], Square)]
    }

    fn constants(&self) -> Vec<M31> {
        vec![M31::from(100u32), M31::from(100u32), M31::from(7u32)]
    }
}

#[test]
fn test_layout_offsets() {
    let (layout, registry) = build_circuit(SumOfSquares(3)).unwrap();
    assert_eq!(layout.templates.len(), 2);
    assert_eq!(registry.len(), 2);
    let square = &layout.templates[0];
    // outputs are laid out before inputs
    assert_eq!(square.io[0].name, "out");
    assert_eq!(square.io[1].offset, 1);
    assert_eq!(square.num_inputs, 1);

    let main = layout.main_template().unwrap();
    assert_eq!(main.own_signals, 4);
    assert_eq!(main.num_signals, 10);
    assert_eq!(main.num_components, 4);
    let g = &main.subcomponents[0];
    assert_eq!((g.slot, g.count, g.signal_offset, g.signal_stride), (0, 3, 4, 2));
    assert_eq!((g.component_offset, g.component_stride), (1, 1));
    assert_eq!(main.constants, vec![0, 0, 1]);
    assert_eq!(layout.constants, vec![M31::from(100u32), M31::from(7u32)]);

    assert_eq!(layout.num_signals, 11);
    assert_eq!(layout.main.inputs[0].offset, 2);
    assert_eq!(layout.main.inputs[0].size, 3);
    assert_eq!(layout.main_signal("out"), Some((1, 1)));
}

#[test]
fn test_build_and_run() {
    let (layout, registry) = build_circuit(SumOfSquares(3)).unwrap();
    let calc = WitnessCalculator::new(layout, registry).unwrap();
    let inputs = InputSignals::new().with(
        "in",
        vec![M31::from(1u32), M31::from(2u32), M31::from(3u32)],
    );
    let eval = calc.evaluate(&inputs).unwrap();
    assert_eq!(
        calc.main_signal(&eval.signals, "out").unwrap(),
        vec![M31::from(114u32)]
    );
    assert_eq!(eval.signals.get(0).unwrap(), M31::one());
    assert_eq!(eval.stats.evaluated, 4);
    assert_eq!(eval.stats.released, 4);
}

#[test]
fn test_layout_json() {
    let (layout, _) = build_circuit(SumOfSquares(2)).unwrap();
    let json = layout.to_json().unwrap();
    let back = CircuitLayout::<M31>::from_json(&json).unwrap();
    assert_eq!(back, layout);
    assert_eq!(back.prime, U256::new(2147483647).to_string());
}

#[test]
fn test_direct_dispatch_checks_template() {
    let (layout, registry) = build_circuit(SumOfSquares(1)).unwrap();
    let mut ctx = Context::new(&layout, &registry);
    ctx.allocate(layout.main.template_id, 0, 1, None, "main".to_string())
        .unwrap();
    ctx.create_all_subcomponents(0).unwrap();
    let child = ctx.subcomponent(0, 0).unwrap();

    let err = ctx
        .feed_with(0, 0, 1, M31::from(3u32), &SumOfSquares(1))
        .err()
        .unwrap();
    assert!(err.is_internal());
    assert_ne!(ctx.state(child), Some(ComponentState::Evaluated));
    assert_eq!(ctx.get_sub(0, 0, 0).unwrap(), M31::zero());

    let err = ctx.evaluate_with(child, &SumOfSquares(1)).err().unwrap();
    assert!(err.is_internal());
    ctx.evaluate_with(child, &Square).unwrap();
    assert_eq!(ctx.get_sub(0, 0, 0).unwrap(), M31::from(9u32));
}
