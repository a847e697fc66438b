use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use battstock_core::{Entity, EntityKind, record_newtype};

record_newtype!(
    /// Customer identifier.
    CustomerId
);

record_newtype!(
    /// Supplier identifier.
    SupplierId
);

/// Which side of a trade a party is on.
///
/// Serialized the way vouchers store it in `entity_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyRole {
    Customer,
    Supplier,
}

impl PartyRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Supplier => "supplier",
        }
    }
}

impl core::fmt::Display for PartyRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A customer and the amount it currently owes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    #[serde(default)]
    pub balance: Decimal,
}

impl Customer {
    pub fn with_balance(id: CustomerId, balance: Decimal) -> Self {
        Self { id, balance }
    }
}

impl Entity for Customer {
    type Id = CustomerId;
    const KIND: EntityKind = EntityKind::Customer;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A supplier and the amount currently owed to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    #[serde(default)]
    pub balance: Decimal,
}

impl Supplier {
    pub fn with_balance(id: SupplierId, balance: Decimal) -> Self {
        Self { id, balance }
    }
}

impl Entity for Supplier {
    type Id = SupplierId;
    const KIND: EntityKind = EntityKind::Supplier;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
