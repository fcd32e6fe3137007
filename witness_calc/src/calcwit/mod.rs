pub mod component;
pub mod constraint;
pub mod context;
pub mod driver;
pub mod registry;
pub mod signals;

pub use component::{ComponentId, ComponentState};
pub use context::{Context, EvalStats};
pub use driver::{CalcOptions, Evaluation, WitnessCalculator};
pub use registry::{Template, TemplateRegistry};
pub use signals::SignalStore;
