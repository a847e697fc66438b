//! Parties module (customers and suppliers).
//!
//! Both carry a running `balance` that is never edited directly; it is
//! rebuilt from sales/purchases and vouchers by the recalculation pass.

pub mod party;

pub use party::{Customer, CustomerId, PartyRole, Supplier, SupplierId};
