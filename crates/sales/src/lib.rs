//! Sales module: sale headers and sale line items as stored rows.
//!
//! A sale feeds two replays: its total feeds the customer balance when the
//! payment is deferred, and its items draw down battery stock.

pub mod sale;

pub use sale::{Sale, SaleItem};
