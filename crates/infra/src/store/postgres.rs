//! Postgres-backed record store.
//!
//! Talks to the same schema the hosted backend exposes. Table and column
//! names always come from `Table` and `columns` constants, never from input,
//! so they are interpolated into SQL directly; ids and values are bound.
//!
//! Rows come back as `to_jsonb(t)`. `NUMERIC` money columns keep every digit
//! because `serde_json` is built with `arbitrary_precision` and `Decimal`
//! decodes those numbers without a detour through `f64`.

use std::sync::Arc;

use serde_json::Value as JsonValue;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use battstock_core::{EntityKind, RecordId};

use super::{FieldValue, RecordStore, StoreError, Table};

/// Postgres record store.
///
/// Uses a SQLx connection pool, which is safe to share across tasks.
#[derive(Debug, Clone)]
pub struct PostgresRecordStore {
    pool: Arc<PgPool>,
}

impl PostgresRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(Self::new(pool))
    }
}

/// Connection-level failures mean the backend is unreachable; anything else
/// is a failure of the individual statement.
fn classify(table: Table, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => StoreError::Unavailable(err.to_string()),
        other => StoreError::Query {
            table: table.name(),
            message: other.to_string(),
        },
    }
}

#[async_trait::async_trait]
impl RecordStore for PostgresRecordStore {
    async fn list_ids(&self, kind: EntityKind) -> Result<Vec<RecordId>, StoreError> {
        let table = Table::for_kind(kind);
        let sql = format!("SELECT id FROM {} ORDER BY id", table.name());

        let rows = sqlx::query(&sql)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| classify(table, e))?;

        rows.into_iter()
            .map(|r| {
                r.try_get::<Uuid, _>("id")
                    .map(RecordId::from_uuid)
                    .map_err(|e| classify(table, e))
            })
            .collect()
    }

    async fn query_by_foreign_key(
        &self,
        table: Table,
        column: &'static str,
        id: RecordId,
    ) -> Result<Vec<JsonValue>, StoreError> {
        let sql = format!(
            "SELECT to_jsonb(t) AS row FROM {} t WHERE t.{} = $1",
            table.name(),
            column
        );

        let rows = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| classify(table, e))?;

        rows.into_iter()
            .map(|r| r.try_get::<JsonValue, _>("row").map_err(|e| classify(table, e)))
            .collect()
    }

    async fn update_field(
        &self,
        table: Table,
        id: RecordId,
        field: &'static str,
        value: FieldValue,
    ) -> Result<(), StoreError> {
        let sql = format!("UPDATE {} SET {} = $1 WHERE id = $2", table.name(), field);

        let query = match value {
            FieldValue::Decimal(d) => sqlx::query(&sql).bind(d),
            FieldValue::Integer(i) => sqlx::query(&sql).bind(i),
        };

        let result = query
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| match classify(table, e) {
                StoreError::Query { table, message } => StoreError::Write { table, message },
                other => other,
            })?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                table: table.name(),
                id,
            });
        }

        Ok(())
    }
}
