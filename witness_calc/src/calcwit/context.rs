use std::ops::Range;

use crate::{
    builder::TemplateDef,
    circuit::layout::{CircuitLayout, TemplateId, TemplateInfo},
    field::Field,
    utils::{error::Error, misc::position_suffix},
};

use super::{
    component::{Component, ComponentId, ComponentState, ComponentTable},
    registry::{Template, TemplateRegistry},
    signals::SignalStore,
};

/// Counters of one evaluation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvalStats {
    pub allocated: usize,
    pub evaluated: usize,
    pub released: usize,
    /// Released while still waiting for inputs.
    pub released_unevaluated: usize,
}

/// State of one witness computation: the signal array, the component arena,
/// and the layout and behaviors they are driven by.
pub struct Context<'a, F: Field> {
    pub(crate) layout: &'a CircuitLayout<F>,
    pub(crate) registry: &'a TemplateRegistry<F>,
    pub(crate) signals: SignalStore<F>,
    pub(crate) components: ComponentTable,
    release_subcomponents: bool,
    stats: EvalStats,
}

impl<'a, F: Field> Context<'a, F> {
    pub fn new(layout: &'a CircuitLayout<F>, registry: &'a TemplateRegistry<F>) -> Self {
        Context {
            layout,
            registry,
            signals: SignalStore::new(layout.num_signals),
            components: ComponentTable::new(layout.num_components),
            release_subcomponents: true,
            stats: EvalStats::default(),
        }
    }

    pub fn set_release_subcomponents(&mut self, release: bool) {
        self.release_subcomponents = release;
    }

    pub fn layout(&self) -> &'a CircuitLayout<F> {
        self.layout
    }

    pub fn signals(&self) -> &SignalStore<F> {
        &self.signals
    }

    pub fn signals_mut(&mut self) -> &mut SignalStore<F> {
        &mut self.signals
    }

    pub fn into_signals(self) -> SignalStore<F> {
        self.signals
    }

    pub fn stats(&self) -> &EvalStats {
        &self.stats
    }

    pub fn component(&self, id: ComponentId) -> Result<&Component, Error> {
        self.components.get(id)
    }

    pub fn state(&self, id: ComponentId) -> Option<ComponentState> {
        self.components.state(id)
    }

    pub fn template_info(&self, id: ComponentId) -> Result<&'a TemplateInfo, Error> {
        let layout = self.layout;
        layout.template(self.components.get(id)?.template_id)
    }

    // ====================================
    // lifecycle
    // ====================================

    /// Registers a component; it is evaluated once its inputs are fed.
    pub fn allocate(
        &mut self,
        template_id: TemplateId,
        id: ComponentId,
        signal_start: usize,
        parent: Option<ComponentId>,
        name: String,
    ) -> Result<(), Error> {
        let info = self.layout.template(template_id)?;
        if signal_start + info.num_signals > self.signals.len() {
            return Err(Error::InternalError(format!(
                "component {} ({}) needs signals {}..{}, but there are {}",
                id,
                name,
                signal_start,
                signal_start + info.num_signals,
                self.signals.len()
            )));
        }
        if id + info.num_components > self.components.capacity() {
            return Err(Error::InternalError(format!(
                "component {} ({}) exceeds the component bound {}",
                id,
                name,
                self.components.capacity()
            )));
        }
        log::trace!(
            "allocate component {} ({}) of template {} at signal {}",
            id,
            name,
            info.name,
            signal_start
        );
        self.components.insert(
            id,
            Component {
                template_id,
                signal_start,
                input_counter: info.num_inputs,
                subcomponents: vec![None; info.num_subcomponents],
                parent,
                name,
                state: ComponentState::Allocated,
            },
        )?;
        self.stats.allocated += 1;
        Ok(())
    }

    /// Writes one input signal; evaluates the component when it was the
    /// last mandatory one.
    pub fn feed_input(&mut self, id: ComponentId, offset: usize, value: F) -> Result<(), Error> {
        if self.write_input(id, offset, value)? {
            self.evaluate(id)?;
        }
        Ok(())
    }

    /// Like [`Context::feed_input`], with the behavior known at the call site.
    pub fn feed_input_with<T: TemplateDef<F> + ?Sized>(
        &mut self,
        id: ComponentId,
        offset: usize,
        value: F,
        template: &T,
    ) -> Result<(), Error> {
        if self.write_input(id, offset, value)? {
            self.evaluate_with(id, template)?;
        }
        Ok(())
    }

    fn write_input(&mut self, id: ComponentId, offset: usize, value: F) -> Result<bool, Error> {
        let index = self.own_index(id, offset)?;
        self.signals.set(index, value)?;
        self.components.consume_input(id)
    }

    /// Runs the component through the behavior registered for its template.
    pub fn evaluate(&mut self, id: ComponentId) -> Result<(), Error> {
        let registry = self.registry;
        let template_id = self.begin_evaluation(id)?;
        let run = registry.get(template_id)?;
        run(self, id)?;
        self.finish_evaluation(id)
    }

    /// Runs the component through `template`, which must be an instance of
    /// the template the component was created with.
    pub fn evaluate_with<T: TemplateDef<F> + ?Sized>(
        &mut self,
        id: ComponentId,
        template: &T,
    ) -> Result<(), Error> {
        let expected = &self.template_info(id)?.name;
        let name = template.name();
        if name != *expected {
            return Err(Error::InternalError(format!(
                "component {} ({}) is a {}, not a {}",
                id,
                self.components.get(id)?.name,
                expected,
                name
            )));
        }
        self.begin_evaluation(id)?;
        template.run(self, id)?;
        self.finish_evaluation(id)
    }

    fn begin_evaluation(&mut self, id: ComponentId) -> Result<TemplateId, Error> {
        let c = self.components.get_mut(id)?;
        match c.state {
            ComponentState::Allocated if c.input_counter == 0 => {}
            ComponentState::Allocated => {
                return Err(Error::InternalError(format!(
                    "component {} ({}) evaluated with {} inputs missing",
                    id, c.name, c.input_counter
                )))
            }
            _ => {
                return Err(Error::InternalError(format!(
                    "component {} ({}) evaluated twice",
                    id, c.name
                )))
            }
        }
        c.state = ComponentState::Evaluating;
        log::trace!("evaluate component {} ({})", id, c.name);
        Ok(c.template_id)
    }

    fn finish_evaluation(&mut self, id: ComponentId) -> Result<(), Error> {
        let c = self.components.get_mut(id)?;
        c.state = ComponentState::Evaluated;
        self.stats.evaluated += 1;
        if !self.release_subcomponents {
            return Ok(());
        }
        let children = c.subcomponents.clone();
        for child in children.into_iter().flatten() {
            self.release(child);
        }
        Ok(())
    }

    /// Frees the subcomponent bookkeeping of a component. Does nothing for
    /// unallocated or already released ids.
    pub fn release(&mut self, id: ComponentId) {
        match self.components.release(id) {
            Some(ComponentState::Allocated) => {
                if let Ok(c) = self.components.get(id) {
                    log::warn!(
                        "component {} ({}) released with {} inputs never set",
                        id,
                        c.name,
                        c.input_counter
                    );
                }
                self.stats.released += 1;
                self.stats.released_unevaluated += 1;
            }
            Some(_) => self.stats.released += 1,
            None => {}
        }
    }

    // ====================================
    // subcomponents
    // ====================================

    /// Instantiates the subcomponents in the given slots. Subcomponents
    /// without inputs are evaluated right away.
    pub fn create_subcomponents(
        &mut self,
        id: ComponentId,
        slots: Range<usize>,
    ) -> Result<(), Error> {
        let (template_id, signal_start, state) = {
            let c = self.components.get(id)?;
            (c.template_id, c.signal_start, c.state)
        };
        if state != ComponentState::Evaluating {
            return Err(Error::InternalError(format!(
                "component {} creates subcomponents outside its evaluation",
                id
            )));
        }
        let layout = self.layout;
        let info = layout.template(template_id)?;
        for slot in slots {
            let g = info.group_for_slot(slot).ok_or_else(|| {
                Error::InternalError(format!(
                    "template {} has no subcomponent slot {}",
                    info.name, slot
                ))
            })?;
            let i = slot - g.slot;
            let child = id + g.component_offset + i * g.component_stride;
            let start = signal_start + g.signal_offset + i * g.signal_stride;
            let name = format!("{}{}", g.name, position_suffix(&g.dims, g.first_position + i));
            {
                let c = self.components.get_mut(id)?;
                match c.subcomponents.get_mut(slot) {
                    Some(entry) if entry.is_none() => *entry = Some(child),
                    _ => {
                        return Err(Error::InternalError(format!(
                            "subcomponent slot {} of component {} ({}) created twice",
                            slot, id, c.name
                        )))
                    }
                }
            }
            self.allocate(g.template_id, child, start, Some(id), name)?;
            if layout.template(g.template_id)?.num_inputs == 0 {
                self.evaluate(child)?;
            }
        }
        Ok(())
    }

    pub fn create_all_subcomponents(&mut self, id: ComponentId) -> Result<(), Error> {
        let n = self.template_info(id)?.num_subcomponents;
        self.create_subcomponents(id, 0..n)
    }

    pub fn subcomponent(&self, id: ComponentId, slot: usize) -> Result<ComponentId, Error> {
        let c = self.components.get(id)?;
        match c.subcomponents.get(slot) {
            Some(Some(child)) => Ok(*child),
            _ => Err(Error::InternalError(format!(
                "subcomponent slot {} of component {} ({}) used before creation",
                slot, id, c.name
            ))),
        }
    }

    // ====================================
    // signal access
    // ====================================

    fn own_index(&self, id: ComponentId, offset: usize) -> Result<usize, Error> {
        let c = self.components.get(id)?;
        let own = self.layout.template(c.template_id)?.own_signals;
        if offset >= own {
            return Err(Error::InternalError(format!(
                "component {} ({}) has no signal {}",
                id, c.name, offset
            )));
        }
        Ok(c.signal_start + offset)
    }

    /// Reads a signal of the component itself.
    #[inline]
    pub fn get(&self, id: ComponentId, offset: usize) -> Result<F, Error> {
        self.signals.get(self.own_index(id, offset)?)
    }

    #[inline]
    pub fn set(&mut self, id: ComponentId, offset: usize, value: F) -> Result<(), Error> {
        let index = self.own_index(id, offset)?;
        self.signals.set(index, value)
    }

    /// Reads a signal of the subcomponent in `slot`.
    pub fn get_sub(&self, id: ComponentId, slot: usize, offset: usize) -> Result<F, Error> {
        self.get(self.subcomponent(id, slot)?, offset)
    }

    /// Feeds an input of the subcomponent in `slot`, dispatching through the
    /// template id it was created with.
    pub fn feed(
        &mut self,
        id: ComponentId,
        slot: usize,
        offset: usize,
        value: F,
    ) -> Result<(), Error> {
        let child = self.subcomponent(id, slot)?;
        self.feed_input(child, offset, value)
    }

    pub fn feed_with<T: TemplateDef<F> + ?Sized>(
        &mut self,
        id: ComponentId,
        slot: usize,
        offset: usize,
        value: F,
        template: &T,
    ) -> Result<(), Error> {
        let child = self.subcomponent(id, slot)?;
        self.feed_input_with(child, offset, value, template)
    }

    /// Local offset of element `index` of the `io`-th input/output of a
    /// component, looked up in its template's signal table.
    pub fn io_offset(&self, id: ComponentId, io: usize, index: usize) -> Result<usize, Error> {
        let info = self.template_info(id)?;
        match info.io.get(io) {
            Some(def) if index < def.size() => Ok(def.offset + index),
            _ => Err(Error::InternalError(format!(
                "template {} has no signal {}[{}]",
                info.name, io, index
            ))),
        }
    }

    pub fn get_sub_io(
        &self,
        id: ComponentId,
        slot: usize,
        io: usize,
        index: usize,
    ) -> Result<F, Error> {
        let child = self.subcomponent(id, slot)?;
        self.get(child, self.io_offset(child, io, index)?)
    }

    pub fn feed_io(
        &mut self,
        id: ComponentId,
        slot: usize,
        io: usize,
        index: usize,
        value: F,
    ) -> Result<(), Error> {
        let child = self.subcomponent(id, slot)?;
        let offset = self.io_offset(child, io, index)?;
        self.feed_input(child, offset, value)
    }

    /// The `k`-th constant used by the component's template.
    pub fn constant(&self, id: ComponentId, k: usize) -> Result<F, Error> {
        let info = self.template_info(id)?;
        info.constants
            .get(k)
            .and_then(|&c| self.layout.constants.get(c))
            .copied()
            .ok_or_else(|| {
                Error::InternalError(format!("template {} has no constant {}", info.name, k))
            })
    }
}
