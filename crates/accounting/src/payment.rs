use serde::{Deserialize, Serialize};

use battstock_core::ValueObject;
use battstock_parties::PartyRole;

/// How a sale or purchase was settled.
///
/// Unknown method names are kept verbatim rather than rejected; they never
/// count as deferred.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentMethod {
    Cash,
    Check,
    BankTransfer,
    Credit,
    Other(String),
}

impl PaymentMethod {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Cash => "cash",
            Self::Check => "check",
            Self::BankTransfer => "bank_transfer",
            Self::Credit => "credit",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for PaymentMethod {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "cash" => Self::Cash,
            "check" | "cheque" => Self::Check,
            "bank_transfer" => Self::BankTransfer,
            "credit" => Self::Credit,
            _ => Self::Other(value.to_string()),
        }
    }
}

impl From<String> for PaymentMethod {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<PaymentMethod> for String {
    fn from(value: PaymentMethod) -> Self {
        match value {
            PaymentMethod::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl core::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ValueObject for PaymentMethod {}

/// Which payment methods leave an amount outstanding on a party's balance.
///
/// Customer and supplier sides are kept separate so either can be changed
/// without touching the other. Cash and credit are not deferred by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeferralPolicy {
    pub customer_methods: Vec<PaymentMethod>,
    pub supplier_methods: Vec<PaymentMethod>,
}

impl DeferralPolicy {
    pub fn new(customer_methods: Vec<PaymentMethod>, supplier_methods: Vec<PaymentMethod>) -> Self {
        Self {
            customer_methods,
            supplier_methods,
        }
    }

    /// Parse a comma-separated method list (e.g. `"check,bank_transfer"`).
    pub fn parse_methods(list: &str) -> Vec<PaymentMethod> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PaymentMethod::from)
            .collect()
    }

    pub fn methods_for(&self, role: PartyRole) -> &[PaymentMethod] {
        match role {
            PartyRole::Customer => &self.customer_methods,
            PartyRole::Supplier => &self.supplier_methods,
        }
    }

    pub fn is_deferred(&self, role: PartyRole, method: Option<&PaymentMethod>) -> bool {
        method.is_some_and(|m| self.methods_for(role).contains(m))
    }
}

impl Default for DeferralPolicy {
    fn default() -> Self {
        let deferred = vec![PaymentMethod::Check, PaymentMethod::BankTransfer];
        Self::new(deferred.clone(), deferred)
    }
}
