//! Mirror behavior against an in-process stub of the remote API.

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::DateTime;
use rust_decimal_macros::dec;
use serde_json::json;

use api_types::{
    service::{ServiceType, ServiceTypeNew, ServiceTypeUpdate},
    transaction::{Transaction, TransactionKind, TransactionNew, TransactionUpdate},
};
use store::{ApiClient, ApiError, ServiceStore, TransactionStore};

#[derive(Clone, Default)]
struct Stub {
    transactions: Arc<Mutex<Vec<Transaction>>>,
    services: Arc<Mutex<Vec<ServiceType>>>,
    next_id: Arc<Mutex<u32>>,
    failing: Arc<Mutex<bool>>,
}

impl Stub {
    fn fail_requests(&self) {
        *self.failing.lock().unwrap() = true;
    }

    fn is_failing(&self) -> bool {
        *self.failing.lock().unwrap()
    }

    fn assign_id(&self, prefix: &str) -> String {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        format!("{prefix}{next}")
    }

    fn seed_transaction(&self, tx: Transaction) {
        self.transactions.lock().unwrap().push(tx);
    }

    fn seed_service(&self, service: ServiceType) {
        self.services.lock().unwrap().push(service);
    }
}

fn offline() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "stub offline"})),
    )
        .into_response()
}

fn not_found(what: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": format!("{what} not found")})),
    )
        .into_response()
}

async fn list_transactions(State(stub): State<Stub>) -> Response {
    if stub.is_failing() {
        return offline();
    }
    let items = stub.transactions.lock().unwrap().clone();
    Json(items).into_response()
}

async fn create_transaction(
    State(stub): State<Stub>,
    Json(new): Json<TransactionNew>,
) -> Response {
    if stub.is_failing() {
        return offline();
    }
    // The canonical record differs from the request: server-assigned id,
    // normalized description.
    let tx = Transaction {
        id: stub.assign_id("t"),
        date: new.date,
        kind: new.kind,
        amount: new.amount,
        description: new.description.trim().to_string(),
        service_id: new.service_id,
    };
    stub.transactions.lock().unwrap().insert(0, tx.clone());
    Json(tx).into_response()
}

async fn update_transaction(
    State(stub): State<Stub>,
    Path(id): Path<String>,
    Json(patch): Json<TransactionUpdate>,
) -> Response {
    if stub.is_failing() {
        return offline();
    }
    let mut items = stub.transactions.lock().unwrap();
    let Some(tx) = items.iter_mut().find(|tx| tx.id == id) else {
        return not_found("transaction");
    };
    if let Some(date) = patch.date {
        tx.date = date;
    }
    if let Some(kind) = patch.kind {
        tx.kind = kind;
    }
    if let Some(amount) = patch.amount {
        tx.amount = amount;
    }
    if let Some(description) = patch.description {
        tx.description = description.trim().to_string();
    }
    if let Some(service_id) = patch.service_id {
        tx.service_id = Some(service_id);
    }
    Json(tx.clone()).into_response()
}

async fn delete_transaction(State(stub): State<Stub>, Path(id): Path<String>) -> Response {
    if stub.is_failing() {
        return offline();
    }
    let mut items = stub.transactions.lock().unwrap();
    let before = items.len();
    items.retain(|tx| tx.id != id);
    if items.len() == before {
        return not_found("transaction");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn list_services(State(stub): State<Stub>) -> Response {
    if stub.is_failing() {
        return offline();
    }
    let items = stub.services.lock().unwrap().clone();
    Json(items).into_response()
}

async fn create_service(State(stub): State<Stub>, Json(new): Json<ServiceTypeNew>) -> Response {
    if stub.is_failing() {
        return offline();
    }
    let service = ServiceType {
        id: stub.assign_id("s"),
        name: new.name.trim().to_string(),
        default_price: new.default_price,
    };
    stub.services.lock().unwrap().push(service.clone());
    Json(service).into_response()
}

async fn update_service(
    State(stub): State<Stub>,
    Path(id): Path<String>,
    Json(patch): Json<ServiceTypeUpdate>,
) -> Response {
    if stub.is_failing() {
        return offline();
    }
    let mut items = stub.services.lock().unwrap();
    let Some(service) = items.iter_mut().find(|service| service.id == id) else {
        return not_found("service");
    };
    if let Some(name) = patch.name {
        service.name = name.trim().to_string();
    }
    if let Some(default_price) = patch.default_price {
        service.default_price = default_price;
    }
    Json(service.clone()).into_response()
}

async fn delete_service(State(stub): State<Stub>, Path(id): Path<String>) -> Response {
    if stub.is_failing() {
        return offline();
    }
    let mut items = stub.services.lock().unwrap();
    let before = items.len();
    items.retain(|service| service.id != id);
    if items.len() == before {
        return not_found("service");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn spawn_stub() -> (String, Stub) {
    let stub = Stub::default();
    let app = Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route(
            "/transactions/{id}",
            axum::routing::put(update_transaction).delete(delete_transaction),
        )
        .route("/services", get(list_services).post(create_service))
        .route(
            "/services/{id}",
            axum::routing::put(update_service).delete(delete_service),
        )
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (base_url, stub)
}

fn seeded_tx(id: &str, amount: rust_decimal::Decimal) -> Transaction {
    Transaction {
        id: id.to_string(),
        date: DateTime::parse_from_rfc3339("2026-03-14T09:00:00+01:00").unwrap(),
        kind: TransactionKind::Income,
        amount,
        description: format!("seeded {id}"),
        service_id: None,
    }
}

fn new_tx(description: &str, amount: rust_decimal::Decimal) -> TransactionNew {
    TransactionNew {
        date: DateTime::parse_from_rfc3339("2026-03-14T10:00:00+01:00").unwrap(),
        kind: TransactionKind::Income,
        amount,
        description: description.to_string(),
        service_id: None,
    }
}

#[tokio::test]
async fn fetch_all_replaces_local_with_server_sequence() {
    let (base_url, stub) = spawn_stub().await;
    stub.seed_transaction(seeded_tx("a", dec!(10)));
    stub.seed_transaction(seeded_tx("b", dec!(20)));

    let mut store = TransactionStore::new(ApiClient::new(&base_url).unwrap());
    store.fetch_all().await.unwrap();

    let ids: Vec<_> = store.items().iter().map(|tx| tx.id.as_str()).collect();
    assert_eq!(ids, ["a", "b"]);
}

#[tokio::test]
async fn fetch_all_failure_keeps_previous_sequence() {
    let (base_url, stub) = spawn_stub().await;
    stub.seed_transaction(seeded_tx("a", dec!(10)));

    let mut store = TransactionStore::new(ApiClient::new(&base_url).unwrap());
    store.fetch_all().await.unwrap();
    let snapshot = store.items().to_vec();

    stub.fail_requests();
    let err = store.fetch_all().await.unwrap_err();
    assert!(matches!(err, ApiError::Server { .. }));
    assert_eq!(store.items(), snapshot.as_slice());
}

#[tokio::test]
async fn add_transaction_inserts_canonical_record_at_head() {
    let (base_url, _stub) = spawn_stub().await;
    let mut store = TransactionStore::new(ApiClient::new(&base_url).unwrap());

    store.add(&new_tx("  Lavaggio completo  ", dec!(25))).await.unwrap();
    assert_eq!(store.len(), 1);

    store.add(&new_tx("Cambio olio", dec!(40))).await.unwrap();
    assert_eq!(store.len(), 2);

    // Newest first, server-assigned ids, server-normalized description.
    assert_eq!(store.items()[0].id, "t2");
    assert_eq!(store.items()[0].description, "Cambio olio");
    assert_eq!(store.items()[1].id, "t1");
    assert_eq!(store.items()[1].description, "Lavaggio completo");
}

#[tokio::test]
async fn add_service_appends_at_tail() {
    let (base_url, _stub) = spawn_stub().await;
    let mut store = ServiceStore::new(ApiClient::new(&base_url).unwrap());

    store
        .add(&ServiceTypeNew {
            name: "Lavaggio".to_string(),
            default_price: dec!(15),
        })
        .await
        .unwrap();
    store
        .add(&ServiceTypeNew {
            name: "Tagliando".to_string(),
            default_price: dec!(120),
        })
        .await
        .unwrap();

    let names: Vec<_> = store.items().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Lavaggio", "Tagliando"]);
}

#[tokio::test]
async fn failed_add_propagates_and_leaves_sequence_unchanged() {
    let (base_url, stub) = spawn_stub().await;
    stub.seed_transaction(seeded_tx("a", dec!(10)));

    let mut store = TransactionStore::new(ApiClient::new(&base_url).unwrap());
    store.fetch_all().await.unwrap();
    let snapshot = store.items().to_vec();

    stub.fail_requests();
    let err = store.add(&new_tx("Nuova", dec!(5))).await.unwrap_err();
    match err {
        ApiError::Server { status, .. } => assert_eq!(status.as_u16(), 500),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store.items(), snapshot.as_slice());
}

#[tokio::test]
async fn update_replaces_matching_local_record() {
    let (base_url, stub) = spawn_stub().await;
    stub.seed_transaction(seeded_tx("a", dec!(10)));

    let mut store = TransactionStore::new(ApiClient::new(&base_url).unwrap());
    store.fetch_all().await.unwrap();

    let patch = TransactionUpdate {
        amount: Some(dec!(99)),
        ..TransactionUpdate::default()
    };
    store.update("a", &patch).await.unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(store.items()[0].amount, dec!(99));
    // Untouched fields come back from the server unchanged.
    assert_eq!(store.items()[0].description, "seeded a");
}

#[tokio::test]
async fn update_without_local_match_drops_the_response() {
    let (base_url, stub) = spawn_stub().await;
    stub.seed_transaction(seeded_tx("a", dec!(10)));

    // Local mirror never fetched: the record exists remotely only.
    let mut store = TransactionStore::new(ApiClient::new(&base_url).unwrap());

    let patch = TransactionUpdate {
        amount: Some(dec!(99)),
        ..TransactionUpdate::default()
    };
    store.update("a", &patch).await.unwrap();

    assert!(store.is_empty());
}

#[tokio::test]
async fn failed_update_propagates_and_leaves_sequence_unchanged() {
    let (base_url, stub) = spawn_stub().await;
    stub.seed_service(ServiceType {
        id: "s1".to_string(),
        name: "Lavaggio".to_string(),
        default_price: dec!(15),
    });

    let mut store = ServiceStore::new(ApiClient::new(&base_url).unwrap());
    store.fetch_all().await.unwrap();
    let snapshot = store.items().to_vec();

    stub.fail_requests();
    let patch = ServiceTypeUpdate {
        default_price: Some(dec!(18)),
        ..ServiceTypeUpdate::default()
    };
    store.update("s1", &patch).await.unwrap_err();
    assert_eq!(store.items(), snapshot.as_slice());
}

#[tokio::test]
async fn delete_removes_the_matching_record() {
    let (base_url, stub) = spawn_stub().await;
    stub.seed_transaction(seeded_tx("a", dec!(10)));
    stub.seed_transaction(seeded_tx("b", dec!(20)));

    let mut store = TransactionStore::new(ApiClient::new(&base_url).unwrap());
    store.fetch_all().await.unwrap();

    store.delete("a").await.unwrap();

    let ids: Vec<_> = store.items().iter().map(|tx| tx.id.as_str()).collect();
    assert_eq!(ids, ["b"]);
}

#[tokio::test]
async fn transaction_delete_failure_is_absorbed() {
    let (base_url, stub) = spawn_stub().await;
    stub.seed_transaction(seeded_tx("a", dec!(10)));

    let mut store = TransactionStore::new(ApiClient::new(&base_url).unwrap());
    store.fetch_all().await.unwrap();

    stub.fail_requests();
    // The caller sees success; the row stays until the next fetch.
    store.delete("a").await.unwrap();
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn service_delete_failure_propagates() {
    let (base_url, stub) = spawn_stub().await;
    stub.seed_service(ServiceType {
        id: "s1".to_string(),
        name: "Lavaggio".to_string(),
        default_price: dec!(15),
    });

    let mut store = ServiceStore::new(ApiClient::new(&base_url).unwrap());
    store.fetch_all().await.unwrap();

    stub.fail_requests();
    store.delete("s1").await.unwrap_err();
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn deleting_unknown_transaction_id_stays_silent() {
    let (base_url, stub) = spawn_stub().await;
    stub.seed_transaction(seeded_tx("a", dec!(10)));

    let mut store = TransactionStore::new(ApiClient::new(&base_url).unwrap());
    store.fetch_all().await.unwrap();
    let snapshot = store.items().to_vec();

    // Server answers 404; the transaction policy swallows it.
    store.delete("nope").await.unwrap();
    assert_eq!(store.items(), snapshot.as_slice());
}

#[tokio::test]
async fn deleting_unknown_service_id_surfaces_not_found() {
    let (base_url, _stub) = spawn_stub().await;
    let mut store = ServiceStore::new(ApiClient::new(&base_url).unwrap());

    let err = store.delete("nope").await.unwrap_err();
    match err {
        ApiError::Server { status, message } => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(message, "service not found");
        }
        other => panic!("unexpected error: {other}"),
    }
}
