use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{Value as JsonValue, json};

use battstock_api::app::services::{AppServices, SharedStore};
use battstock_core::{EntityKind, RecordId};
use battstock_infra::config::AppConfig;
use battstock_infra::store::{FieldValue, InMemoryRecordStore, RecordStore, StoreError, Table};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(store: SharedStore) -> Self {
        // Same router as prod, bound to an ephemeral port.
        let services = Arc::new(AppServices::new(store, &AppConfig::default()));
        let app = battstock_api::app::build_app(services);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Backend that refuses every call.
struct UnreachableStore;

#[async_trait::async_trait]
impl RecordStore for UnreachableStore {
    async fn list_ids(&self, _kind: EntityKind) -> Result<Vec<RecordId>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn query_by_foreign_key(
        &self,
        _table: Table,
        _column: &'static str,
        _id: RecordId,
    ) -> Result<Vec<JsonValue>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn update_field(
        &self,
        _table: Table,
        _id: RecordId,
        _field: &'static str,
        _value: FieldValue,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

fn seeded_store() -> (Arc<InMemoryRecordStore>, RecordId, RecordId) {
    let store = Arc::new(InMemoryRecordStore::new());
    let customer = RecordId::new();
    let battery = RecordId::new();

    store.insert(Table::Customers, json!({ "id": customer, "balance": 0 }));
    store.insert(
        Table::Sales,
        json!({ "id": RecordId::new(), "customer_id": customer, "total": 100, "payment_method": "check" }),
    );
    store.insert(
        Table::Sales,
        json!({ "id": RecordId::new(), "customer_id": customer, "total": 200, "payment_method": "check" }),
    );
    store.insert(
        Table::Vouchers,
        json!({
            "id": RecordId::new(),
            "entity_type": "customer",
            "entity_id": customer,
            "amount": 150,
            "voucher_type": "receipt"
        }),
    );

    store.insert(Table::BatteryTypes, json!({ "id": battery, "current_quantity": 99 }));
    store.insert(
        Table::PurchaseItems,
        json!({ "id": RecordId::new(), "battery_type_id": battery, "quantity": 15 }),
    );
    store.insert(
        Table::SaleItems,
        json!({ "id": RecordId::new(), "battery_type_id": battery, "quantity": 12 }),
    );

    (store, customer, battery)
}

fn balance_string(store: &InMemoryRecordStore, id: RecordId) -> String {
    match store.field(Table::Customers, id, "balance") {
        Some(JsonValue::String(s)) => s,
        Some(other) => other.to_string(),
        None => panic!("customer row missing"),
    }
}

#[tokio::test]
async fn health_is_ok() {
    let server = TestServer::spawn(Arc::new(InMemoryRecordStore::new())).await;

    let res = reqwest::get(format!("{}/health", server.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn recalculate_writes_aggregates_and_returns_report() {
    let (store, customer, battery) = seeded_store();
    let server = TestServer::spawn(store.clone()).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/admin/recalculate", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let report: JsonValue = res.json().await.unwrap();
    assert_eq!(report["dry_run"], json!(false));
    assert_eq!(report["kinds"].as_array().unwrap().len(), 3);

    assert_eq!(balance_string(&store, customer), "150");
    assert_eq!(
        store.field(Table::BatteryTypes, battery, "current_quantity"),
        Some(json!(3))
    );
}

#[tokio::test]
async fn dry_run_leaves_rows_untouched() {
    let (store, customer, battery) = seeded_store();
    let server = TestServer::spawn(store.clone()).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/admin/recalculate", server.base_url))
        .json(&json!({ "kinds": ["battery_types"], "dry_run": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let report: JsonValue = res.json().await.unwrap();
    assert_eq!(report["dry_run"], json!(true));
    let kinds = report["kinds"].as_array().unwrap();
    assert_eq!(kinds.len(), 1);
    assert_eq!(kinds[0]["kind"], json!("battery_type"));

    assert_eq!(balance_string(&store, customer), "0");
    assert_eq!(
        store.field(Table::BatteryTypes, battery, "current_quantity"),
        Some(json!(99))
    );
}

#[tokio::test]
async fn unreachable_store_is_503() {
    let server = TestServer::spawn(Arc::new(UnreachableStore)).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/admin/recalculate", server.base_url))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: JsonValue = res.json().await.unwrap();
    assert_eq!(body["error"], json!("store_unavailable"));
}

#[tokio::test]
async fn malformed_body_is_400() {
    let server = TestServer::spawn(Arc::new(InMemoryRecordStore::new())).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/admin/recalculate", server.base_url))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(format!("{}/admin/recalculate", server.base_url))
        .json(&json!({ "kinds": ["warehouses"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
