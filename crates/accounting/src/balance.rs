//! Party balance replay.

use rust_decimal::Decimal;

use battstock_core::{DomainResult, RecordId, Signed, accumulate};
use battstock_parties::PartyRole;

use crate::payment::{DeferralPolicy, PaymentMethod};
use crate::voucher::Voucher;

/// A sale or purchase as seen by the balance replay.
pub trait Settlement {
    /// Customer (for sales) or supplier (for purchases) the row belongs to.
    fn counterparty(&self) -> RecordId;

    fn total(&self) -> Decimal;

    fn payment_method(&self) -> Option<&PaymentMethod>;
}

/// Rebuild the balance of `party`, acting in `role`, from its full history.
///
/// Deferred settlements add their total; vouchers move the balance according
/// to `VoucherType::direction_for`. Settlements of other parties and vouchers
/// recorded against another party or role are ignored. A running total
/// outside the `Decimal` range is `DomainError::Overflow`.
pub fn replay_balance<'a, S, I, V>(
    role: PartyRole,
    party: RecordId,
    policy: &DeferralPolicy,
    settlements: I,
    vouchers: V,
) -> DomainResult<Decimal>
where
    S: Settlement + 'a,
    I: IntoIterator<Item = &'a S>,
    V: IntoIterator<Item = &'a Voucher>,
{
    let deferred = settlements
        .into_iter()
        .filter(|s| s.counterparty() == party)
        .filter(|s| policy.is_deferred(role, s.payment_method()))
        .map(|s| Signed::increase(s.total()));

    let manual = vouchers
        .into_iter()
        .filter(|v| v.entity_type == role && v.entity_id == party)
        .map(|v| v.effect_for(role));

    accumulate(deferred.chain(manual))
}
