use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use battstock_accounting::{PaymentMethod, Settlement};
use battstock_core::{RecordId, Signed};
use battstock_inventory::{BatteryTypeId, StockMovement};
use battstock_parties::SupplierId;

/// Purchase header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub supplier_id: SupplierId,
    pub total: Decimal,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
}

impl Settlement for Purchase {
    fn counterparty(&self) -> RecordId {
        self.supplier_id.record_id()
    }

    fn total(&self) -> Decimal {
        self.total
    }

    fn payment_method(&self) -> Option<&PaymentMethod> {
        self.payment_method.as_ref()
    }
}

/// Purchase line item: units of one battery type entering stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseItem {
    pub battery_type_id: BatteryTypeId,
    pub quantity: i64,
}

impl StockMovement for PurchaseItem {
    fn battery_type_id(&self) -> BatteryTypeId {
        self.battery_type_id
    }

    fn stock_effect(&self) -> Signed<i64> {
        Signed::increase(self.quantity)
    }
}
