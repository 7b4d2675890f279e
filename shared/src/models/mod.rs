//! Domain models for chilly lot tracking and billing

mod billing;
mod lot;

pub use billing::*;
pub use lot::*;
