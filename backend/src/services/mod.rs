//! Business logic services for the chilly billing server

pub mod billing;
pub mod statement;

pub use billing::BillingService;
