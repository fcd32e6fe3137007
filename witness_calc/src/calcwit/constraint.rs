//! Checks embedded in template bodies and the diagnostics they produce.

use std::fmt;

use crate::{
    field::{ops, Field},
    utils::error::Error,
};

use super::{component::ComponentId, context::Context};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    pub component: ComponentId,
    pub name: String,
}

/// Where a check failed: the template, the component instance, the check
/// itself, and the chain of components from `main` down to the failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub template: String,
    pub component: ComponentId,
    pub site: String,
    pub trace: Vec<TraceEntry>,
}

impl Diagnostic {
    /// Dotted component path, e.g. `main.segments[1].bits[3]`.
    pub fn path(&self) -> String {
        self.trace
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "in template {} at {}. Followed trace of components: {}",
            self.template,
            self.site,
            self.path()
        )
    }
}

impl<F: Field> Context<'_, F> {
    /// Component chain from the root to `id`.
    pub fn trace(&self, id: ComponentId) -> Vec<TraceEntry> {
        let mut res = Vec::new();
        let mut cur = Some(id);
        while let Some(c) = cur {
            match self.components.get(c) {
                Ok(component) => {
                    res.push(TraceEntry {
                        component: c,
                        name: component.name.clone(),
                    });
                    cur = component.parent;
                }
                Err(_) => break,
            }
        }
        res.reverse();
        res
    }

    pub fn diagnostic(&self, id: ComponentId, site: &str) -> Diagnostic {
        let template = match self.template_info(id) {
            Ok(info) => info.name.clone(),
            Err(_) => "?".to_string(),
        };
        Diagnostic {
            template,
            component: id,
            site: site.to_string(),
            trace: self.trace(id),
        }
    }

    pub fn assert(&self, id: ComponentId, holds: bool, site: &str) -> Result<(), Error> {
        if holds {
            Ok(())
        } else {
            Err(Error::ConstraintViolation(Box::new(
                self.diagnostic(id, site),
            )))
        }
    }

    /// `lhs === rhs`
    pub fn assert_eq(&self, id: ComponentId, lhs: F, rhs: F, site: &str) -> Result<(), Error> {
        self.assert(id, lhs == rhs, site)
    }

    fn arithmetic_error(&self, id: ComponentId, site: &str) -> Error {
        Error::ArithmeticError(Box::new(self.diagnostic(id, site)))
    }

    pub fn div(&self, id: ComponentId, a: F, b: F, site: &str) -> Result<F, Error> {
        ops::div(&a, &b).ok_or_else(|| self.arithmetic_error(id, site))
    }

    pub fn inv(&self, id: ComponentId, a: F, site: &str) -> Result<F, Error> {
        a.inv().ok_or_else(|| self.arithmetic_error(id, site))
    }

    /// Field value used as an array index or loop bound.
    pub fn to_index(&self, id: ComponentId, v: F, site: &str) -> Result<usize, Error> {
        ops::to_usize(&v).ok_or_else(|| self.arithmetic_error(id, site))
    }
}
