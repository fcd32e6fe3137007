//! Lays out hand-written templates the way a circuit compiler would, and
//! registers their behaviors.

use std::{collections::HashMap, rc::Rc};

use crate::{
    calcwit::registry::{Template, TemplateRegistry},
    circuit::layout::{
        CircuitLayout, InputSignal, IoDef, IoKind, MainComponent, SubcomponentGroup, TemplateId,
        TemplateInfo,
    },
    field::Field,
    utils::error::Error,
};

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SignalKind {
    Output,
    Input,
    Intermediate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalDecl {
    pub name: String,
    pub kind: SignalKind,
    pub dims: Vec<usize>,
}

impl SignalDecl {
    pub fn new(name: &str, kind: SignalKind, dims: &[usize]) -> Self {
        SignalDecl {
            name: name.to_string(),
            kind,
            dims: dims.to_vec(),
        }
    }

    pub fn output(name: &str, dims: &[usize]) -> Self {
        Self::new(name, SignalKind::Output, dims)
    }

    pub fn input(name: &str, dims: &[usize]) -> Self {
        Self::new(name, SignalKind::Input, dims)
    }

    pub fn intermediate(name: &str, dims: &[usize]) -> Self {
        Self::new(name, SignalKind::Intermediate, dims)
    }

    pub fn size(&self) -> usize {
        self.dims.iter().product()
    }
}

/// A block of subcomponents of one template. Arrays whose elements use
/// different template instances are declared as several parts with the same
/// name and consecutive positions.
pub struct SubcomponentDecl<F: Field> {
    pub name: String,
    pub dims: Vec<usize>,
    pub first_position: usize,
    pub count: usize,
    pub template: Rc<dyn TemplateDef<F>>,
}

impl<F: Field> SubcomponentDecl<F> {
    pub fn single<T: TemplateDef<F> + 'static>(name: &str, template: T) -> Self {
        Self::part(name, &[], 0, 1, template)
    }

    pub fn array<T: TemplateDef<F> + 'static>(name: &str, dims: &[usize], template: T) -> Self {
        Self::part(name, dims, 0, dims.iter().product(), template)
    }

    pub fn part<T: TemplateDef<F> + 'static>(
        name: &str,
        dims: &[usize],
        first_position: usize,
        count: usize,
        template: T,
    ) -> Self {
        SubcomponentDecl {
            name: name.to_string(),
            dims: dims.to_vec(),
            first_position,
            count,
            template: Rc::new(template),
        }
    }
}

/// Shape of a template: its signals, subcomponents and constants.
///
/// Own signals are laid out outputs first, then inputs, then intermediates,
/// each kind in declaration order. Subcomponents follow in declaration order
/// and take consecutive slots.
pub trait TemplateDef<F: Field>: Template<F> {
    fn name(&self) -> String;

    /// Distinguishes instances of a parametric template.
    fn instance_key(&self) -> String {
        self.name()
    }

    fn signals(&self) -> Vec<SignalDecl>;

    fn subcomponents(&self) -> Vec<SubcomponentDecl<F>> {
        Vec::new()
    }

    /// Constants read through `Context::constant`, by local index.
    fn constants(&self) -> Vec<F> {
        Vec::new()
    }
}

#[derive(Default)]
pub struct LayoutBuilder<F: Field> {
    templates: Vec<TemplateInfo>,
    defs: Vec<Rc<dyn TemplateDef<F>>>,
    keys: HashMap<String, TemplateId>,
    constants: Vec<F>,
    constant_ids: HashMap<F, usize>,
}

impl<F: Field> LayoutBuilder<F> {
    pub fn new() -> Self {
        LayoutBuilder {
            templates: Vec::new(),
            defs: Vec::new(),
            keys: HashMap::new(),
            constants: Vec::new(),
            constant_ids: HashMap::new(),
        }
    }

    fn intern_constant(&mut self, c: F) -> usize {
        if let Some(&id) = self.constant_ids.get(&c) {
            return id;
        }
        let id = self.constants.len();
        self.constants.push(c);
        self.constant_ids.insert(c, id);
        id
    }

    /// Adds a template instance and, first, everything it instantiates.
    pub fn add_template(&mut self, def: Rc<dyn TemplateDef<F>>) -> Result<TemplateId, Error> {
        let key = def.instance_key();
        if let Some(&id) = self.keys.get(&key) {
            return Ok(id);
        }
        let mut decls = def.signals();
        decls.sort_by_key(|d| d.kind);
        let mut io = Vec::new();
        let mut own_signals = 0;
        let mut num_inputs = 0;
        for d in decls.iter() {
            match d.kind {
                SignalKind::Output | SignalKind::Input => io.push(IoDef {
                    name: d.name.clone(),
                    kind: if d.kind == SignalKind::Input {
                        IoKind::Input
                    } else {
                        IoKind::Output
                    },
                    offset: own_signals,
                    lengths: d.dims.clone(),
                }),
                SignalKind::Intermediate => {}
            }
            if d.kind == SignalKind::Input {
                num_inputs += d.size();
            }
            own_signals += d.size();
        }

        let mut groups = Vec::new();
        let mut num_signals = own_signals;
        let mut num_components = 1;
        let mut slot = 0;
        for sub in def.subcomponents() {
            let child_id = self.add_template(sub.template.clone())?;
            let child = &self.templates[child_id];
            groups.push(SubcomponentGroup {
                name: sub.name,
                dims: sub.dims,
                first_position: sub.first_position,
                slot,
                count: sub.count,
                template_id: child_id,
                signal_offset: num_signals,
                signal_stride: child.num_signals,
                component_offset: num_components,
                component_stride: child.num_components,
            });
            num_signals += sub.count * child.num_signals;
            num_components += sub.count * child.num_components;
            slot += sub.count;
        }
        let constants = def
            .constants()
            .into_iter()
            .map(|c| self.intern_constant(c))
            .collect();

        let id = self.templates.len();
        log::debug!(
            "template {} = {}: {} own signals, {} signals, {} components",
            id,
            key,
            own_signals,
            num_signals,
            num_components
        );
        self.templates.push(TemplateInfo {
            name: def.name(),
            num_inputs,
            own_signals,
            num_signals,
            num_components,
            num_subcomponents: slot,
            io,
            subcomponents: groups,
            constants,
        });
        self.defs.push(def);
        self.keys.insert(key, id);
        Ok(id)
    }

    /// Lays out the circuit rooted at `root` and registers every template
    /// behavior under its id.
    pub fn build(
        mut self,
        root: Rc<dyn TemplateDef<F>>,
    ) -> Result<(CircuitLayout<F>, TemplateRegistry<F>), Error> {
        let main_id = self.add_template(root)?;
        let info = &self.templates[main_id];
        let signal_start = 1;
        let num_signals = signal_start + info.num_signals;
        let num_components = info.num_components;
        let inputs = info
            .io
            .iter()
            .filter(|io| io.kind == IoKind::Input)
            .map(|io| InputSignal {
                name: io.name.clone(),
                offset: signal_start + io.offset,
                size: io.size(),
            })
            .collect();
        let layout = CircuitLayout {
            prime: F::MODULUS.to_string(),
            num_signals,
            num_components,
            constants: self.constants,
            main: MainComponent {
                template_id: main_id,
                signal_start,
                inputs,
            },
            witness_to_signal: Vec::new(),
            templates: self.templates,
        };
        layout.validate()?;

        let mut registry = TemplateRegistry::new();
        for (id, def) in self.defs.into_iter().enumerate() {
            let name = def.name();
            registry.register(id, &name, move |ctx, cid| def.run(ctx, cid))?;
        }
        Ok((layout, registry))
    }
}

/// Builds the layout and the behaviors of the circuit rooted at `root`.
pub fn build_circuit<F: Field, T: TemplateDef<F> + 'static>(
    root: T,
) -> Result<(CircuitLayout<F>, TemplateRegistry<F>), Error> {
    LayoutBuilder::new().build(Rc::new(root))
}
