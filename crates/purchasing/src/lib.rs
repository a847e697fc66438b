//! Purchasing module: purchase headers and purchase line items as stored rows.

pub mod purchase;

pub use purchase::{Purchase, PurchaseItem};
