use serde::{Deserialize, Serialize};

use battstock_core::{Entity, EntityKind, record_newtype};

use crate::stock::Quantity;

record_newtype!(
    /// Battery type identifier (a sellable product line, e.g. "70Ah 12V").
    BatteryTypeId
);

/// A battery type and its on-hand quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatteryType {
    pub id: BatteryTypeId,
    #[serde(default)]
    pub current_quantity: Quantity,
}

impl BatteryType {
    pub fn with_quantity(id: BatteryTypeId, current_quantity: Quantity) -> Self {
        Self { id, current_quantity }
    }
}

impl Entity for BatteryType {
    type Id = BatteryTypeId;
    const KIND: EntityKind = EntityKind::BatteryType;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
