//! Template dispatch: maps a template id to the behavior that evaluates it.

use crate::{circuit::layout::TemplateId, field::Field, utils::error::Error};

use super::{component::ComponentId, context::Context};

pub type TemplateFn<F> = dyn Fn(&mut Context<'_, F>, ComponentId) -> Result<(), Error>;

/// The body of a template: computes the component's outputs and
/// intermediates from its inputs, feeding and reading its subcomponents.
pub trait Template<F: Field> {
    fn run(&self, ctx: &mut Context<'_, F>, id: ComponentId) -> Result<(), Error>;
}

struct Entry<F: Field> {
    name: String,
    run: Box<TemplateFn<F>>,
}

#[derive(Default)]
pub struct TemplateRegistry<F: Field> {
    templates: Vec<Option<Entry<F>>>,
}

impl<F: Field> TemplateRegistry<F> {
    pub fn new() -> Self {
        TemplateRegistry {
            templates: Vec::new(),
        }
    }

    pub fn register<T>(&mut self, id: TemplateId, name: &str, run: T) -> Result<(), Error>
    where
        T: Fn(&mut Context<'_, F>, ComponentId) -> Result<(), Error> + 'static,
    {
        if self.templates.len() <= id {
            self.templates.resize_with(id + 1, || None);
        }
        if self.templates[id].is_some() {
            return Err(Error::InternalError(format!(
                "template {} registered twice",
                id
            )));
        }
        self.templates[id] = Some(Entry {
            name: name.to_string(),
            run: Box::new(run),
        });
        Ok(())
    }

    pub fn get(&self, id: TemplateId) -> Result<&TemplateFn<F>, Error> {
        match self.templates.get(id) {
            Some(Some(entry)) => Ok(entry.run.as_ref()),
            _ => Err(Error::InternalError(format!(
                "template with id {} not found",
                id
            ))),
        }
    }

    pub fn name(&self, id: TemplateId) -> Option<&str> {
        self.templates.get(id)?.as_ref().map(|e| e.name.as_str())
    }

    pub fn contains(&self, id: TemplateId) -> bool {
        matches!(self.templates.get(id), Some(Some(_)))
    }

    pub fn len(&self) -> usize {
        self.templates.iter().filter(|e| e.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::M31;

    #[test]
    fn test_register_twice() {
        let mut r = TemplateRegistry::<M31>::new();
        r.register(2, "Noop", |_, _| Ok(())).unwrap();
        assert!(r.contains(2));
        assert!(!r.contains(0));
        assert_eq!(r.len(), 1);
        assert_eq!(r.name(2), Some("Noop"));
        assert!(r.register(2, "Noop", |_, _| Ok(())).is_err());
        assert!(r.get(0).is_err());
        assert!(r.get(5).is_err());
    }
}
