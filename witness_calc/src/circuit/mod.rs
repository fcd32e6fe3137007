pub mod input;
pub mod layout;
pub mod witness;
