//! Infrastructure layer: store boundary, store adapters, the recalculation
//! pass and process configuration.

pub mod config;
pub mod recalc;
pub mod store;
