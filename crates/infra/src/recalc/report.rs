//! Outcome of a recalculation pass.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use battstock_core::{EntityKind, RecordId};
use battstock_inventory::Quantity;

use crate::store::FieldValue;

/// Freshly computed aggregate for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateValue {
    Balance(Decimal),
    Quantity(Quantity),
}

impl AggregateValue {
    pub fn as_field_value(&self) -> FieldValue {
        match self {
            Self::Balance(d) => FieldValue::Decimal(*d),
            Self::Quantity(q) => FieldValue::Integer(i64::from(*q)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityOutcome {
    pub entity_id: RecordId,
    pub value: AggregateValue,
}

/// One entity that was skipped; its stored aggregate was left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityFailure {
    pub kind: EntityKind,
    pub entity_id: RecordId,
    pub table: String,
    pub reason: String,
}

/// Results for one entity collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindReport {
    pub kind: EntityKind,
    pub outcomes: Vec<EntityOutcome>,
    pub failures: Vec<EntityFailure>,
    /// Set when the collection's ids could not be listed; nothing was
    /// processed for this kind.
    pub listing_error: Option<String>,
}

impl KindReport {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            outcomes: Vec::new(),
            failures: Vec::new(),
            listing_error: None,
        }
    }

    pub fn value_of(&self, entity_id: RecordId) -> Option<AggregateValue> {
        self.outcomes
            .iter()
            .find(|o| o.entity_id == entity_id)
            .map(|o| o.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecalculationReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub dry_run: bool,
    pub kinds: Vec<KindReport>,
}

impl RecalculationReport {
    pub fn kind(&self, kind: EntityKind) -> Option<&KindReport> {
        self.kinds.iter().find(|k| k.kind == kind)
    }

    pub fn failure_count(&self) -> usize {
        self.kinds.iter().map(|k| k.failures.len()).sum()
    }

    /// Entities whose aggregate was written (zero on a dry run).
    pub fn written_count(&self) -> usize {
        if self.dry_run {
            return 0;
        }
        self.kinds.iter().map(|k| k.outcomes.len()).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.kinds
            .iter()
            .all(|k| k.failures.is_empty() && k.listing_error.is_none())
    }
}
