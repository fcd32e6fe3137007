// allow range loop for better readability
#![allow(clippy::needless_range_loop)]

pub mod traits;
pub use traits::StdTemplate;

pub mod babyjub;
pub mod bitify;
pub mod catalog;
pub mod comparators;
pub mod elgamal;
pub mod escalarmulany;
pub mod escalarmulfix;
pub mod montgomery;
pub mod mux;
pub mod permutation;
pub mod shuffle;
