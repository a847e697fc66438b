use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use battstock_core::{Direction, RecordId, Signed};
use battstock_parties::PartyRole;

/// Direction of a manual money movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoucherType {
    /// Money received by the business.
    Receipt,
    /// Money paid out by the business.
    Payment,
}

impl VoucherType {
    /// Effect of this voucher on the balance of a party in `role`.
    ///
    /// Customer: receipt decreases, payment increases.
    /// Supplier: payment decreases, receipt increases.
    pub fn direction_for(&self, role: PartyRole) -> Direction {
        match (role, self) {
            (PartyRole::Customer, Self::Receipt) => Direction::Decrease,
            (PartyRole::Customer, Self::Payment) => Direction::Increase,
            (PartyRole::Supplier, Self::Payment) => Direction::Decrease,
            (PartyRole::Supplier, Self::Receipt) => Direction::Increase,
        }
    }
}

/// Voucher row: a receipt or payment against one customer or supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voucher {
    pub entity_type: PartyRole,
    pub entity_id: RecordId,
    pub amount: Decimal,
    #[serde(rename = "voucher_type", alias = "type")]
    pub voucher_type: VoucherType,
}

impl Voucher {
    pub fn effect_for(&self, role: PartyRole) -> Signed<Decimal> {
        Signed {
            direction: self.voucher_type.direction_for(role),
            magnitude: self.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_store_row_with_legacy_type_column() {
        let id = RecordId::new();
        let v: Voucher = serde_json::from_value(json!({
            "id": RecordId::new(),
            "entity_type": "supplier",
            "entity_id": id,
            "amount": "250.75",
            "type": "payment",
            "notes": "دفعة"
        }))
        .unwrap();

        assert_eq!(v.entity_type, PartyRole::Supplier);
        assert_eq!(v.entity_id, id);
        assert_eq!(v.amount, Decimal::new(25075, 2));
        assert_eq!(v.voucher_type, VoucherType::Payment);
    }

    #[test]
    fn rejects_unknown_voucher_type() {
        let res = serde_json::from_value::<Voucher>(json!({
            "entity_type": "customer",
            "entity_id": RecordId::new(),
            "amount": 10,
            "voucher_type": "refund"
        }));
        assert!(res.is_err());
    }
}
