//! On-hand stock derivation.

use serde::{Deserialize, Serialize};

use battstock_core::{DomainError, DomainResult, Signed, ValueObject, accumulate};

use crate::battery::BatteryTypeId;

/// Non-negative stock count.
///
/// Negative stock is not representable: replays that would go below zero are
/// floored at zero instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Quantity(u64);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    /// Strict constructor: rejects negative counts.
    pub fn try_new(value: i64) -> DomainResult<Self> {
        u64::try_from(value)
            .map(Self)
            .map_err(|_| DomainError::invariant(format!("quantity cannot be negative (got {value})")))
    }

    /// Floors negative counts at zero.
    pub fn clamped(value: i64) -> Self {
        Self(value.max(0) as u64)
    }
}

impl ValueObject for Quantity {}

impl TryFrom<i64> for Quantity {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Quantity> for i64 {
    fn from(value: Quantity) -> Self {
        i64::try_from(value.0).unwrap_or(i64::MAX)
    }
}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A row that moves stock of one battery type in or out.
pub trait StockMovement {
    fn battery_type_id(&self) -> BatteryTypeId;

    /// Units moved; positive for stock in, negative for stock out.
    fn stock_effect(&self) -> Signed<i64>;
}

/// Replay every movement of `battery` into its on-hand quantity.
///
/// `received` and `issued` are usually purchase and sale items; each row
/// carries its own sign. Rows for other battery types are ignored. The sum is
/// taken over the full history and floored at zero once at the end, so an
/// oversold period followed by a restock still nets out.
///
/// The sum is kept in `i128`, so only a final on-hand count that does not fit
/// a stored `i64` is an error.
pub fn replay_on_hand<'a, R, S, I, J>(battery: BatteryTypeId, received: I, issued: J) -> DomainResult<Quantity>
where
    R: StockMovement + 'a,
    S: StockMovement + 'a,
    I: IntoIterator<Item = &'a R>,
    J: IntoIterator<Item = &'a S>,
{
    let inbound = received
        .into_iter()
        .filter(|m| m.battery_type_id() == battery)
        .map(StockMovement::stock_effect);
    let outbound = issued
        .into_iter()
        .filter(|m| m.battery_type_id() == battery)
        .map(StockMovement::stock_effect);

    let net: i128 = accumulate(inbound.chain(outbound).map(|s| s.map(i128::from)))?;
    if net <= 0 {
        return Ok(Quantity::ZERO);
    }
    i64::try_from(net)
        .map(Quantity::clamped)
        .map_err(|_| DomainError::Overflow)
}
