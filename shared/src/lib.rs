//! Shared types and billing logic for the BMW Chilly Management tools
//!
//! This crate contains the lot record model, the quality-based billing
//! calculator and the record store seam shared between the backend server
//! and the browser (via WASM).

pub mod billing;
pub mod models;
pub mod store;
pub mod types;
pub mod validation;

pub use billing::*;
pub use models::*;
pub use store::*;
pub use types::*;
pub use validation::*;
