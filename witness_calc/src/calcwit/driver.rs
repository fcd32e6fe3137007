use std::collections::HashMap;

use crate::{
    circuit::{
        input::{fnv1a, InputSignals},
        layout::{CircuitLayout, InputSignal},
        witness::Witness,
    },
    field::Field,
    utils::error::Error,
};

use super::{
    component::{ComponentId, ComponentState},
    context::{Context, EvalStats},
    registry::TemplateRegistry,
    signals::SignalStore,
};

pub const MAIN_COMPONENT: ComponentId = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalcOptions {
    /// Free each component's subcomponent bookkeeping once it is evaluated.
    pub release_subcomponents: bool,
}

impl Default for CalcOptions {
    fn default() -> Self {
        CalcOptions {
            release_subcomponents: true,
        }
    }
}

/// Result of one run: the full signal array and the run counters.
#[derive(Debug, Clone)]
pub struct Evaluation<F> {
    pub signals: SignalStore<F>,
    pub stats: EvalStats,
}

/// Computes witnesses for one circuit layout.
pub struct WitnessCalculator<F: Field> {
    layout: CircuitLayout<F>,
    registry: TemplateRegistry<F>,
    input_index: HashMap<u64, usize>,
    options: CalcOptions,
}

impl<F: Field> WitnessCalculator<F> {
    pub fn new(layout: CircuitLayout<F>, registry: TemplateRegistry<F>) -> Result<Self, Error> {
        layout.validate()?;
        for (i, info) in layout.templates.iter().enumerate() {
            if !registry.contains(i) {
                return Err(Error::InternalError(format!(
                    "template {} ({}) has no registered behavior",
                    i, info.name
                )));
            }
        }
        let input_index = layout
            .main
            .inputs
            .iter()
            .enumerate()
            .map(|(i, input)| (fnv1a(&input.name), i))
            .collect();
        Ok(WitnessCalculator {
            layout,
            registry,
            input_index,
            options: CalcOptions::default(),
        })
    }

    pub fn with_options(mut self, options: CalcOptions) -> Self {
        self.options = options;
        self
    }

    pub fn layout(&self) -> &CircuitLayout<F> {
        &self.layout
    }

    pub fn registry(&self) -> &TemplateRegistry<F> {
        &self.registry
    }

    fn lookup_input(&self, name: &str) -> Result<&InputSignal, Error> {
        self.input_index
            .get(&fnv1a(name))
            .map(|&i| &self.layout.main.inputs[i])
            .filter(|input| input.name == name)
            .ok_or_else(|| Error::UserError(format!("unknown input signal {}", name)))
    }

    /// Runs the whole circuit on `inputs`.
    pub fn evaluate(&self, inputs: &InputSignals<F>) -> Result<Evaluation<F>, Error> {
        self.run(inputs).inspect_err(|e| log::error!("witness calculation failed: {}", e))
    }

    fn run(&self, inputs: &InputSignals<F>) -> Result<Evaluation<F>, Error> {
        let main = &self.layout.main;
        let main_info = self.layout.main_template()?;
        let mut ctx = Context::new(&self.layout, &self.registry);
        ctx.set_release_subcomponents(self.options.release_subcomponents);
        ctx.signals_mut().set(0, F::one())?;
        ctx.allocate(
            main.template_id,
            MAIN_COMPONENT,
            main.signal_start,
            None,
            "main".to_string(),
        )?;
        if main_info.num_inputs == 0 {
            ctx.evaluate(MAIN_COMPONENT)?;
        }
        for (name, values) in inputs.iter() {
            let input = self.lookup_input(name)?;
            if values.len() != input.size {
                return Err(Error::UserError(format!(
                    "input signal {} expects {} values, got {}",
                    name,
                    input.size,
                    values.len()
                )));
            }
            log::debug!("feeding input {} ({} values)", name, values.len());
            let base = input.offset - main.signal_start;
            for (i, v) in values.iter().enumerate() {
                ctx.feed_input(MAIN_COMPONENT, base + i, *v)?;
            }
        }
        if ctx.state(MAIN_COMPONENT) != Some(ComponentState::Evaluated) {
            let missing = ctx.component(MAIN_COMPONENT)?.input_counter;
            return Err(Error::UserError(format!(
                "not all inputs have been set: {} of {} missing",
                missing, main_info.num_inputs
            )));
        }
        ctx.release(MAIN_COMPONENT);
        let stats = ctx.stats().clone();
        log::info!(
            "witness computed: {} signals, {} components evaluated",
            self.layout.num_signals,
            stats.evaluated
        );
        Ok(Evaluation {
            signals: ctx.into_signals(),
            stats,
        })
    }

    pub fn calculate(&self, inputs: &InputSignals<F>) -> Result<SignalStore<F>, Error> {
        Ok(self.evaluate(inputs)?.signals)
    }

    pub fn calculate_witness(&self, inputs: &InputSignals<F>) -> Result<Witness<F>, Error> {
        let signals = self.calculate(inputs)?;
        Witness::from_signals(&self.layout, &signals)
    }

    /// Values of an input or output of `main` in a finished signal array.
    pub fn main_signal(&self, signals: &SignalStore<F>, name: &str) -> Result<Vec<F>, Error> {
        let (start, len) = self
            .layout
            .main_signal(name)
            .ok_or_else(|| Error::UserError(format!("main has no signal {}", name)))?;
        (start..start + len).map(|i| signals.get(i)).collect()
    }
}
