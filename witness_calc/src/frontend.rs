pub use crate::builder::{
    build_circuit, LayoutBuilder, SignalDecl, SignalKind, SubcomponentDecl, TemplateDef,
};
pub use crate::calcwit::{
    CalcOptions, ComponentId, ComponentState, Context, EvalStats, Evaluation, Template,
    SignalStore, TemplateRegistry, WitnessCalculator,
};
pub use crate::circuit::{input::InputSignals, layout::CircuitLayout, witness::Witness};
pub use crate::field::{ops, parse_field, Field, BN254, M31, U256};
pub use crate::utils::error::Error;
