use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{
    field::Field,
    utils::{error::Error, misc::topo_order_and_is_dag},
};

use super::input::fnv1a;

pub type TemplateId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IoKind {
    Output,
    Input,
}

/// An input or output signal (or signal array) of a template, addressed
/// relative to the component's signal start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoDef {
    pub name: String,
    pub kind: IoKind,
    pub offset: usize,
    #[serde(default)]
    pub lengths: Vec<usize>,
}

impl IoDef {
    pub fn size(&self) -> usize {
        self.lengths.iter().product()
    }
}

/// A block of `count` identical subcomponents declared by a template.
///
/// Element `i` occupies slot `slot + i`, starts at signal
/// `parent_start + signal_offset + i * signal_stride` and gets the component
/// id `parent_id + component_offset + i * component_stride`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcomponentGroup {
    pub name: String,
    #[serde(default)]
    pub dims: Vec<usize>,
    /// Position of the first element inside the declared array; groups of a
    /// heterogeneous array share a name and continue each other's positions.
    #[serde(default)]
    pub first_position: usize,
    pub slot: usize,
    pub count: usize,
    pub template_id: TemplateId,
    pub signal_offset: usize,
    pub signal_stride: usize,
    pub component_offset: usize,
    pub component_stride: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateInfo {
    pub name: String,
    /// Number of mandatory input signals.
    pub num_inputs: usize,
    /// Signals owned by the component itself.
    pub own_signals: usize,
    /// Signals of the whole subtree, own signals first.
    pub num_signals: usize,
    /// Components of the whole subtree, the component itself included.
    pub num_components: usize,
    pub num_subcomponents: usize,
    #[serde(default)]
    pub io: Vec<IoDef>,
    #[serde(default)]
    pub subcomponents: Vec<SubcomponentGroup>,
    /// Local constant index to constant pool index.
    #[serde(default)]
    pub constants: Vec<usize>,
}

impl TemplateInfo {
    pub fn io_index(&self, name: &str) -> Option<usize> {
        self.io.iter().position(|io| io.name == name)
    }

    pub fn group_for_slot(&self, slot: usize) -> Option<&SubcomponentGroup> {
        self.subcomponents
            .iter()
            .find(|g| slot >= g.slot && slot < g.slot + g.count)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSignal {
    pub name: String,
    /// Absolute index of the first signal.
    pub offset: usize,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainComponent {
    pub template_id: TemplateId,
    pub signal_start: usize,
    pub inputs: Vec<InputSignal>,
}

/// Everything the engine needs to know about a compiled circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitLayout<F> {
    /// Field modulus in decimal.
    pub prime: String,
    pub num_signals: usize,
    pub num_components: usize,
    pub constants: Vec<F>,
    pub main: MainComponent,
    /// Signals exported to the witness, in order; empty exports every signal.
    #[serde(default)]
    pub witness_to_signal: Vec<usize>,
    pub templates: Vec<TemplateInfo>,
}

impl<F: Field> CircuitLayout<F> {
    pub fn from_json(s: &str) -> Result<Self, Error> {
        let layout: Self = serde_json::from_str(s)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn template(&self, id: TemplateId) -> Result<&TemplateInfo, Error> {
        self.templates
            .get(id)
            .ok_or_else(|| Error::InternalError(format!("template {} not found", id)))
    }

    pub fn main_template(&self) -> Result<&TemplateInfo, Error> {
        self.template(self.main.template_id)
    }

    /// Absolute range `(start, len)` of an input or output of `main`.
    pub fn main_signal(&self, name: &str) -> Option<(usize, usize)> {
        let info = self.templates.get(self.main.template_id)?;
        let io = &info.io[info.io_index(name)?];
        Some((self.main.signal_start + io.offset, io.size()))
    }

    pub fn witness_len(&self) -> usize {
        if self.witness_to_signal.is_empty() {
            self.num_signals
        } else {
            self.witness_to_signal.len()
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.prime != F::MODULUS.to_string() {
            return Err(Error::InternalError(format!(
                "layout prime {} does not match field modulus {}",
                self.prime,
                F::MODULUS
            )));
        }
        let main = self.main_template()?;
        if self.main.signal_start == 0 {
            return Err(Error::InternalError(
                "signal 0 is reserved for the constant one".to_string(),
            ));
        }
        if self.main.signal_start + main.num_signals > self.num_signals {
            return Err(Error::InternalError(format!(
                "main needs {} signals from {}, but the circuit has {}",
                main.num_signals, self.main.signal_start, self.num_signals
            )));
        }
        if main.num_components > self.num_components {
            return Err(Error::InternalError(format!(
                "main needs {} components, but the circuit has {}",
                main.num_components, self.num_components
            )));
        }
        for (i, info) in self.templates.iter().enumerate() {
            self.validate_template(info)
                .map_err(|e| e.prepend(&format!("template {} ({})", i, info.name)))?;
        }
        self.validate_dag()?;
        self.validate_inputs(main)?;
        for &s in self.witness_to_signal.iter() {
            if s >= self.num_signals {
                return Err(Error::InternalError(format!(
                    "witness signal {} out of range",
                    s
                )));
            }
        }
        Ok(())
    }

    fn validate_template(&self, info: &TemplateInfo) -> Result<(), Error> {
        if info.own_signals > info.num_signals || info.num_components == 0 {
            return Err(Error::InternalError("inconsistent sizes".to_string()));
        }
        let mut num_inputs = 0;
        for io in info.io.iter() {
            if io.offset + io.size() > info.own_signals {
                return Err(Error::InternalError(format!(
                    "signal {} out of the component range",
                    io.name
                )));
            }
            if io.kind == IoKind::Input {
                num_inputs += io.size();
            }
        }
        if !info.io.is_empty() && num_inputs != info.num_inputs {
            return Err(Error::InternalError(format!(
                "declares {} input signals but counts {}",
                num_inputs, info.num_inputs
            )));
        }
        for &c in info.constants.iter() {
            if c >= self.constants.len() {
                return Err(Error::InternalError(format!("constant {} not found", c)));
            }
        }
        let mut slots = Vec::new();
        let mut signals = Vec::new();
        let mut components = Vec::new();
        for g in info.subcomponents.iter() {
            let child = self.template(g.template_id)?;
            if g.count == 0 {
                continue;
            }
            if g.signal_stride < child.num_signals || g.component_stride < child.num_components {
                return Err(Error::InternalError(format!(
                    "group {} has strides smaller than its template",
                    g.name
                )));
            }
            if g.signal_offset < info.own_signals || g.component_offset == 0 {
                return Err(Error::InternalError(format!(
                    "group {} overlaps the parent's own range",
                    g.name
                )));
            }
            slots.push((g.slot, g.slot + g.count));
            signals.push((g.signal_offset, g.signal_offset + g.count * g.signal_stride));
            components.push((
                g.component_offset,
                g.component_offset + g.count * g.component_stride,
            ));
        }
        check_ranges(&mut slots, info.num_subcomponents, "slots")?;
        check_ranges(&mut signals, info.num_signals, "signals")?;
        check_ranges(&mut components, info.num_components, "components")?;
        Ok(())
    }

    fn validate_dag(&self) -> Result<(), Error> {
        let vertices: HashSet<usize> = (0..self.templates.len()).collect();
        let mut edges: HashMap<usize, HashSet<usize>> = HashMap::new();
        for (i, info) in self.templates.iter().enumerate() {
            for g in info.subcomponents.iter() {
                edges.entry(i).or_default().insert(g.template_id);
            }
        }
        let (_, is_dag) = topo_order_and_is_dag(&vertices, &edges);
        if !is_dag {
            return Err(Error::InternalError(
                "template graph is not a DAG".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_inputs(&self, main: &TemplateInfo) -> Result<(), Error> {
        let start = self.main.signal_start;
        let mut seen = HashMap::new();
        let mut total = 0;
        for input in self.main.inputs.iter() {
            if input.offset < start || input.offset + input.size > start + main.own_signals {
                return Err(Error::InternalError(format!(
                    "main input {} out of range",
                    input.name
                )));
            }
            if let Some(other) = seen.insert(fnv1a(&input.name), &input.name) {
                return Err(Error::InternalError(format!(
                    "main inputs {} and {} share a hash",
                    other, input.name
                )));
            }
            total += input.size;
        }
        if total != main.num_inputs {
            return Err(Error::InternalError(format!(
                "main has {} inputs but the input table lists {}",
                main.num_inputs, total
            )));
        }
        Ok(())
    }
}

fn check_ranges(ranges: &mut [(usize, usize)], limit: usize, what: &str) -> Result<(), Error> {
    ranges.sort_unstable();
    let mut end = 0;
    for &(s, e) in ranges.iter() {
        if s < end || e > limit {
            return Err(Error::InternalError(format!(
                "subcomponent {} overlap or exceed the template",
                what
            )));
        }
        end = e;
    }
    Ok(())
}
