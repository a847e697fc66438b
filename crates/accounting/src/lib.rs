//! Accounting module: payment methods, vouchers and party balance replay.
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.

pub mod balance;
pub mod payment;
pub mod voucher;

pub use balance::{Settlement, replay_balance};
pub use payment::{DeferralPolicy, PaymentMethod};
pub use voucher::{Voucher, VoucherType};
