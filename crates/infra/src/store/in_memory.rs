use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value as JsonValue;

use battstock_core::{EntityKind, RecordId};

use super::{FieldValue, RecordStore, StoreError, Table, columns};

/// In-memory record store.
///
/// Intended for tests/dev. Rows keep insertion order, which is also the
/// order `list_ids` returns. A panic while the lock is held cannot leave a
/// row half-written, so a poisoned lock is recovered rather than reported.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    tables: RwLock<HashMap<Table, Vec<JsonValue>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Table, Vec<JsonValue>>> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Table, Vec<JsonValue>>> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a raw row to `table`.
    pub fn insert(&self, table: Table, row: JsonValue) {
        self.write().entry(table).or_default().push(row);
    }

    /// Current value of one field, if the row and field exist.
    pub fn field(&self, table: Table, id: RecordId, field: &str) -> Option<JsonValue> {
        self.read()
            .get(&table)?
            .iter()
            .find(|row| matches_id(row, columns::ID, id))
            .and_then(|row| row.get(field).cloned())
    }

    pub fn len(&self, table: Table) -> usize {
        self.read().get(&table).map_or(0, Vec::len)
    }
}

fn matches_id(row: &JsonValue, column: &str, id: RecordId) -> bool {
    row.get(column)
        .and_then(JsonValue::as_str)
        .is_some_and(|s| s.eq_ignore_ascii_case(&id.to_string()))
}

#[async_trait::async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn list_ids(&self, kind: EntityKind) -> Result<Vec<RecordId>, StoreError> {
        let table = Table::for_kind(kind);
        let tables = self.read();

        let mut ids = Vec::new();
        for row in tables.get(&table).into_iter().flatten() {
            match row.get(columns::ID).and_then(JsonValue::as_str).map(str::parse::<RecordId>) {
                Some(Ok(id)) => ids.push(id),
                _ => {
                    return Err(StoreError::Query {
                        table: table.name(),
                        message: format!("row without a valid id: {row}"),
                    });
                }
            }
        }
        Ok(ids)
    }

    async fn query_by_foreign_key(
        &self,
        table: Table,
        column: &'static str,
        id: RecordId,
    ) -> Result<Vec<JsonValue>, StoreError> {
        let tables = self.read();

        Ok(tables
            .get(&table)
            .into_iter()
            .flatten()
            .filter(|row| matches_id(row, column, id))
            .cloned()
            .collect())
    }

    async fn update_field(
        &self,
        table: Table,
        id: RecordId,
        field: &'static str,
        value: FieldValue,
    ) -> Result<(), StoreError> {
        let mut tables = self.write();

        let row = tables
            .get_mut(&table)
            .and_then(|rows| rows.iter_mut().find(|row| matches_id(row, columns::ID, id)))
            .ok_or(StoreError::NotFound {
                table: table.name(),
                id,
            })?;

        match row.as_object_mut() {
            Some(obj) => {
                obj.insert(field.to_string(), value.to_json());
                Ok(())
            }
            None => Err(StoreError::Write {
                table: table.name(),
                message: format!("row {id} is not an object"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn lists_ids_in_insertion_order() {
        let store = InMemoryRecordStore::new();
        let a = RecordId::new();
        let b = RecordId::new();
        store.insert(Table::Suppliers, json!({ "id": b }));
        store.insert(Table::Suppliers, json!({ "id": a }));

        let ids = store.list_ids(EntityKind::Supplier).await.unwrap();
        assert_eq!(ids, vec![b, a]);
        assert!(store.list_ids(EntityKind::Customer).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn queries_by_foreign_key() {
        let store = InMemoryRecordStore::new();
        let c1 = RecordId::new();
        let c2 = RecordId::new();
        store.insert(Table::Sales, json!({ "customer_id": c1, "total": 10 }));
        store.insert(Table::Sales, json!({ "customer_id": c2, "total": 20 }));
        store.insert(Table::Sales, json!({ "customer_id": c1, "total": 30 }));

        let rows = store
            .query_by_foreign_key(Table::Sales, columns::CUSTOMER_ID, c1)
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(store.len(Table::Sales), 3);
    }

    #[tokio::test]
    async fn update_overwrites_single_field() {
        let store = InMemoryRecordStore::new();
        let id = RecordId::new();
        store.insert(Table::BatteryTypes, json!({ "id": id, "name": "N70", "current_quantity": 9 }));

        store
            .update_field(Table::BatteryTypes, id, "current_quantity", FieldValue::Integer(3))
            .await
            .unwrap();

        assert_eq!(store.field(Table::BatteryTypes, id, "current_quantity"), Some(json!(3)));
        assert_eq!(store.field(Table::BatteryTypes, id, "name"), Some(json!("N70")));
    }

    #[tokio::test]
    async fn update_of_missing_row_is_not_found() {
        let store = InMemoryRecordStore::new();
        let err = store
            .update_field(Table::Customers, RecordId::new(), "balance", FieldValue::Integer(0))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { table: "customers", .. }));
    }

    #[tokio::test]
    async fn poisoned_lock_keeps_rows() {
        let store = std::sync::Arc::new(InMemoryRecordStore::new());
        let id = RecordId::new();
        store.insert(Table::Customers, json!({ "id": id, "balance": 1 }));

        let holder = store.clone();
        let poisoned = std::thread::spawn::<_, ()>(move || {
            let _guard = holder.tables.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();
        assert!(poisoned.is_err());
        assert!(store.tables.is_poisoned());

        store.insert(Table::Customers, json!({ "id": RecordId::new(), "balance": 2 }));
        assert_eq!(store.len(Table::Customers), 2);
        assert_eq!(store.list_ids(EntityKind::Customer).await.unwrap().len(), 2);
        store
            .update_field(Table::Customers, id, "balance", FieldValue::Integer(7))
            .await
            .unwrap();
        assert_eq!(store.field(Table::Customers, id, "balance"), Some(json!(7)));
    }

    #[tokio::test]
    async fn rejects_rows_without_id() {
        let store = InMemoryRecordStore::new();
        store.insert(Table::Customers, json!({ "name": "بدون رقم" }));
        assert!(matches!(
            store.list_ids(EntityKind::Customer).await,
            Err(StoreError::Query { .. })
        ));
    }
}
