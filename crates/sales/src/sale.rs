use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use battstock_accounting::{PaymentMethod, Settlement};
use battstock_core::{RecordId, Signed};
use battstock_inventory::{BatteryTypeId, StockMovement};
use battstock_parties::CustomerId;

/// Sale header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub customer_id: CustomerId,
    pub total: Decimal,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
}

impl Settlement for Sale {
    fn counterparty(&self) -> RecordId {
        self.customer_id.record_id()
    }

    fn total(&self) -> Decimal {
        self.total
    }

    fn payment_method(&self) -> Option<&PaymentMethod> {
        self.payment_method.as_ref()
    }
}

/// Sale line item: units of one battery type leaving stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleItem {
    pub battery_type_id: BatteryTypeId,
    pub quantity: i64,
}

impl StockMovement for SaleItem {
    fn battery_type_id(&self) -> BatteryTypeId {
        self.battery_type_id
    }

    fn stock_effect(&self) -> Signed<i64> {
        Signed::decrease(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_sale_row_with_numeric_total() {
        let customer = RecordId::new();
        let sale: Sale = serde_json::from_value(json!({
            "id": RecordId::new(),
            "customer_id": customer,
            "total": 1250.5,
            "payment_method": "check",
            "invoice_number": "S-0042"
        }))
        .unwrap();

        assert_eq!(sale.counterparty(), customer);
        assert_eq!(sale.total(), Decimal::new(12505, 1));
        assert_eq!(sale.payment_method(), Some(&PaymentMethod::Check));
    }

    #[test]
    fn wide_numeric_total_keeps_every_digit() {
        let text = format!(
            r#"{{"customer_id": "{}", "total": 1234567890123456789.123456789, "payment_method": "check"}}"#,
            RecordId::new()
        );
        let sale: Sale = serde_json::from_str(&text).unwrap();
        assert_eq!(sale.total, "1234567890123456789.123456789".parse::<Decimal>().unwrap());

        let row: serde_json::Value = serde_json::from_str(&text).unwrap();
        let sale: Sale = serde_json::from_value(row).unwrap();
        assert_eq!(sale.total.to_string(), "1234567890123456789.123456789");
    }

    #[test]
    fn missing_payment_method_decodes_as_none() {
        let sale: Sale = serde_json::from_value(json!({
            "customer_id": RecordId::new(),
            "total": "99"
        }))
        .unwrap();
        assert_eq!(sale.payment_method, None);
    }

    #[test]
    fn sale_item_draws_stock_down() {
        let item = SaleItem {
            battery_type_id: BatteryTypeId(RecordId::new()),
            quantity: 4,
        };
        assert_eq!(item.stock_effect(), Signed::decrease(4));
    }
}
