//! Record store boundary.
//!
//! The hosted backend is reached only through three operations: list the ids
//! of an entity collection, fetch rows by a foreign key, and overwrite one
//! field of one row. Rows travel as JSON objects keyed by column name.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryRecordStore;
pub use postgres::PostgresRecordStore;

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use battstock_core::{EntityKind, RecordId};

/// Tables the recalculation pass reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Customers,
    Suppliers,
    BatteryTypes,
    Sales,
    Purchases,
    Vouchers,
    SaleItems,
    PurchaseItems,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Customers => "customers",
            Self::Suppliers => "suppliers",
            Self::BatteryTypes => "battery_types",
            Self::Sales => "sales",
            Self::Purchases => "purchases",
            Self::Vouchers => "vouchers",
            Self::SaleItems => "sale_items",
            Self::PurchaseItems => "purchase_items",
        }
    }

    /// Table holding the entities of `kind`.
    pub fn for_kind(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Customer => Self::Customers,
            EntityKind::Supplier => Self::Suppliers,
            EntityKind::BatteryType => Self::BatteryTypes,
        }
    }
}

impl core::fmt::Display for Table {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Foreign-key columns used to reach an entity's history.
pub mod columns {
    pub const ID: &str = "id";
    pub const CUSTOMER_ID: &str = "customer_id";
    pub const SUPPLIER_ID: &str = "supplier_id";
    pub const ENTITY_ID: &str = "entity_id";
    pub const BATTERY_TYPE_ID: &str = "battery_type_id";
}

/// Value written into an aggregate field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue {
    Decimal(Decimal),
    Integer(i64),
}

impl FieldValue {
    /// JSON form used by document-style stores.
    ///
    /// Decimals are written as numeric text so no precision is lost.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Decimal(d) => JsonValue::String(d.normalize().to_string()),
            Self::Integer(i) => JsonValue::from(*i),
        }
    }
}

/// Store operation error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached at all.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("query on {table} failed: {message}")]
    Query { table: &'static str, message: String },

    #[error("write to {table} rejected: {message}")]
    Write { table: &'static str, message: String },

    #[error("no row {id} in {table}")]
    NotFound { table: &'static str, id: RecordId },
}

/// Generic row access to the hosted backend.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Ids of every entity in the collection for `kind`.
    async fn list_ids(&self, kind: EntityKind) -> Result<Vec<RecordId>, StoreError>;

    /// Every row of `table` whose `column` equals `id`.
    async fn query_by_foreign_key(
        &self,
        table: Table,
        column: &'static str,
        id: RecordId,
    ) -> Result<Vec<JsonValue>, StoreError>;

    /// Overwrite a single field of the row identified by `id`.
    async fn update_field(
        &self,
        table: Table,
        id: RecordId,
        field: &'static str,
        value: FieldValue,
    ) -> Result<(), StoreError>;
}

#[async_trait::async_trait]
impl<S> RecordStore for Arc<S>
where
    S: RecordStore + ?Sized,
{
    async fn list_ids(&self, kind: EntityKind) -> Result<Vec<RecordId>, StoreError> {
        (**self).list_ids(kind).await
    }

    async fn query_by_foreign_key(
        &self,
        table: Table,
        column: &'static str,
        id: RecordId,
    ) -> Result<Vec<JsonValue>, StoreError> {
        (**self).query_by_foreign_key(table, column, id).await
    }

    async fn update_field(
        &self,
        table: Table,
        id: RecordId,
        field: &'static str,
        value: FieldValue,
    ) -> Result<(), StoreError> {
        (**self).update_field(table, id, field, value).await
    }
}
