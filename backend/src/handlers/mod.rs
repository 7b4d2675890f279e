//! HTTP handlers for the chilly billing server

pub mod billing;
pub mod health;

pub use billing::*;
pub use health::*;
