//! Inventory domain module (battery types and on-hand stock).
//!
//! Pure domain logic: stock is derived by replaying purchase and sale item
//! rows, never stored as an independent fact.

pub mod battery;
pub mod stock;

pub use battery::{BatteryType, BatteryTypeId};
pub use stock::{Quantity, StockMovement, replay_on_hand};
