//! Witness calculator for hierarchical arithmetic circuits: evaluates every
//! component of a compiled circom-style circuit over a prime field.

pub mod builder;
pub mod calcwit;
pub mod circuit;
pub mod field;
pub mod frontend;
pub mod utils;
