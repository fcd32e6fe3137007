use crate::{circuit::layout::TemplateId, utils::error::Error};

pub type ComponentId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentState {
    /// Created, waiting for inputs.
    Allocated,
    /// Template body running.
    Evaluating,
    /// Template body finished; subcomponent bookkeeping still present.
    Evaluated,
    /// Bookkeeping freed; signals stay valid.
    Released,
}

#[derive(Debug, Clone)]
pub struct Component {
    pub template_id: TemplateId,
    pub signal_start: usize,
    /// Mandatory inputs not yet written.
    pub input_counter: usize,
    pub subcomponents: Vec<Option<ComponentId>>,
    pub parent: Option<ComponentId>,
    pub name: String,
    pub state: ComponentState,
}

/// Arena of component records addressed by dense id.
#[derive(Debug)]
pub struct ComponentTable {
    components: Vec<Option<Component>>,
}

impl ComponentTable {
    pub fn new(num_components: usize) -> Self {
        ComponentTable {
            components: vec![None; num_components],
        }
    }

    pub fn capacity(&self) -> usize {
        self.components.len()
    }

    pub fn get(&self, id: ComponentId) -> Result<&Component, Error> {
        self.components
            .get(id)
            .and_then(|c| c.as_ref())
            .ok_or_else(|| Error::InternalError(format!("component {} is not allocated", id)))
    }

    pub fn get_mut(&mut self, id: ComponentId) -> Result<&mut Component, Error> {
        self.components
            .get_mut(id)
            .and_then(|c| c.as_mut())
            .ok_or_else(|| Error::InternalError(format!("component {} is not allocated", id)))
    }

    pub fn is_allocated(&self, id: ComponentId) -> bool {
        matches!(self.components.get(id), Some(Some(_)))
    }

    pub fn state(&self, id: ComponentId) -> Option<ComponentState> {
        self.components.get(id)?.as_ref().map(|c| c.state)
    }

    pub fn insert(&mut self, id: ComponentId, component: Component) -> Result<(), Error> {
        let capacity = self.components.len();
        match self.components.get_mut(id) {
            None => Err(Error::InternalError(format!(
                "component id {} exceeds the component bound {}",
                id, capacity
            ))),
            Some(Some(_)) => Err(Error::InternalError(format!(
                "component {} allocated twice",
                id
            ))),
            Some(slot) => {
                *slot = Some(component);
                Ok(())
            }
        }
    }

    /// Records one written input; returns true when it was the last one.
    pub fn consume_input(&mut self, id: ComponentId) -> Result<bool, Error> {
        let c = self.get_mut(id)?;
        if c.state != ComponentState::Allocated || c.input_counter == 0 {
            return Err(Error::InternalError(format!(
                "component {} ({}) fed after all its inputs were set",
                id, c.name
            )));
        }
        c.input_counter -= 1;
        Ok(c.input_counter == 0)
    }

    /// Frees the subcomponent bookkeeping. Returns the previous state, or
    /// `None` when there was nothing to release.
    pub fn release(&mut self, id: ComponentId) -> Option<ComponentState> {
        let c = self.components.get_mut(id)?.as_mut()?;
        let prev = c.state;
        if prev == ComponentState::Released {
            return None;
        }
        c.subcomponents = Vec::new();
        c.state = ComponentState::Released;
        Some(prev)
    }
}
