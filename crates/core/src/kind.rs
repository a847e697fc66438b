//! The entity collections that carry a derived aggregate field.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Entity collection with a derived aggregate.
///
/// The declaration order is the order a full recalculation pass runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Customer,
    Supplier,
    BatteryType,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [Self::Customer, Self::Supplier, Self::BatteryType];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Supplier => "supplier",
            Self::BatteryType => "battery_type",
        }
    }

    /// Column holding the derived aggregate.
    pub fn aggregate_field(&self) -> &'static str {
        match self {
            Self::Customer | Self::Supplier => "balance",
            Self::BatteryType => "current_quantity",
        }
    }
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "customer" | "customers" => Ok(Self::Customer),
            "supplier" | "suppliers" => Ok(Self::Supplier),
            "battery_type" | "battery_types" => Ok(Self::BatteryType),
            other => Err(DomainError::UnknownKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_runs_customers_first() {
        let mut sorted = EntityKind::ALL;
        sorted.sort();
        assert_eq!(sorted, EntityKind::ALL);
        assert_eq!(EntityKind::ALL[0], EntityKind::Customer);
    }

    #[test]
    fn parses_singular_and_table_names() {
        assert_eq!("suppliers".parse::<EntityKind>().unwrap(), EntityKind::Supplier);
        assert_eq!("Battery_Type".parse::<EntityKind>().unwrap(), EntityKind::BatteryType);
        assert!(matches!(
            "notes".parse::<EntityKind>(),
            Err(DomainError::UnknownKind(_))
        ));
    }

    #[test]
    fn aggregate_field_names() {
        assert_eq!(EntityKind::Customer.aggregate_field(), "balance");
        assert_eq!(EntityKind::BatteryType.aggregate_field(), "current_quantity");
    }
}
