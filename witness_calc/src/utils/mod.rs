//! Utilities shared by the engine and the layout tooling.

pub mod error;
pub mod misc;
