use std::fmt;

use crate::calcwit::constraint::Diagnostic;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    UserError(String),
    InternalError(String),
    /// An embedded equality or assertion did not hold.
    ConstraintViolation(Box<Diagnostic>),
    /// An operation left its domain, e.g. inverting zero.
    ArithmeticError(Box<Diagnostic>),
}

impl Error {
    /// Errors caused by the inputs rather than by the circuit or the engine.
    pub fn is_user(&self) -> bool {
        !self.is_internal()
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, Error::InternalError(_))
    }

    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Error::ConstraintViolation(d) | Error::ArithmeticError(d) => Some(d),
            _ => None,
        }
    }

    pub fn prepend(&self, prefix: &str) -> Error {
        match self {
            Error::UserError(s) => Error::UserError(format!("{}: {}", prefix, s)),
            Error::InternalError(s) => Error::InternalError(format!("{}: {}", prefix, s)),
            _ => self.clone(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UserError(s) => write!(f, "{}", s),
            Error::InternalError(s) => write!(f, "internal error: {}", s),
            Error::ConstraintViolation(d) => write!(f, "Failed assert {}", d),
            Error::ArithmeticError(d) => write!(f, "Arithmetic error {}", d),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::UserError(format!("io error: {}", e))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::UserError(format!("invalid json: {}", e))
    }
}
