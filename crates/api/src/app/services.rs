use std::sync::Arc;

use battstock_infra::config::AppConfig;
use battstock_infra::recalc::BalanceRecalculator;
use battstock_infra::store::{InMemoryRecordStore, PostgresRecordStore, RecordStore, StoreError};

pub type SharedStore = Arc<dyn RecordStore>;

/// Process-wide services shared by every handler.
pub struct AppServices {
    pub recalculator: BalanceRecalculator<SharedStore>,
}

impl AppServices {
    pub fn new(store: SharedStore, config: &AppConfig) -> Self {
        Self {
            recalculator: BalanceRecalculator::new(store).with_policy(config.deferral_policy.clone()),
        }
    }
}

/// Choose the store from config: Postgres when a database URL is set,
/// otherwise an empty in-memory store.
pub async fn build_services(config: &AppConfig) -> Result<AppServices, StoreError> {
    let store: SharedStore = match &config.database_url {
        Some(url) => {
            let store = PostgresRecordStore::connect(url, config.db_max_connections).await?;
            tracing::info!(max_connections = config.db_max_connections, "connected to postgres");
            Arc::new(store)
        }
        None => Arc::new(InMemoryRecordStore::new()),
    };

    Ok(AppServices::new(store, config))
}
