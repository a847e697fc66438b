//! Admin HTTP surface for the recalculation pass.

pub mod app;
