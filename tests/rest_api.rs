//! REST API integration tests. Spawn the server and call endpoints with reqwest.

use cattle_match::{api, Collection, Config, InMemoryStore, RecordStore};
use std::net::SocketAddr;
use std::sync::Arc;

async fn spawn_app_with(config: Config) -> (SocketAddr, tokio::task::JoinHandle<()>) {
    spawn_router(api::create_router(&config).unwrap()).await
}

async fn spawn_router(app: axum::Router) -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app.into_make_service()).await.unwrap();
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    (addr, handle)
}

async fn spawn_app() -> (SocketAddr, tokio::task::JoinHandle<()>) {
    spawn_app_with(Config::default()).await
}

fn farmer(owner: Option<&str>) -> serde_json::Value {
    let mut body = serde_json::json!({
        "race": "Nelore",
        "age": 24,
        "sex": "Male",
        "quantity": 10,
        "location": { "state": "SP", "city": "Campinas" },
        "contact": "farmer@example.com"
    });
    if let Some(o) = owner {
        body["owner_id"] = serde_json::json!(o);
    }
    body
}

fn buyer(city: &str, owner: Option<&str>) -> serde_json::Value {
    let mut body = serde_json::json!({
        "targets": [{ "state": "SP", "city": city }],
        "race": "Any",
        "ageMin": 12,
        "ageMax": 36,
        "sex": "Any",
        "quantity": 5,
        "contact": "buyer@example.com"
    });
    if let Some(o) = owner {
        body["owner_id"] = serde_json::json!(o);
    }
    body
}

#[tokio::test]
async fn health_returns_ok() {
    let (addr, _handle) = spawn_app().await;
    let url = format!("http://{}/health", addr);
    let client = reqwest::Client::new();
    let response = client.get(&url).send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn root_reports_status() {
    let (addr, _handle) = spawn_app().await;
    let client = reqwest::Client::new();
    let json: serde_json::Value = client
        .get(format!("http://{}/", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(json["status"], "System Operational");
}

#[tokio::test]
async fn buyer_then_farmer_finds_match_and_notifies_both() {
    let (addr, _handle) = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{}/api/buyer", addr))
        .json(&buyer("ANY", Some("U2")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let json: serde_json::Value = response.json().await.unwrap();
    assert_eq!(json["matches_found"], 0);
    assert_eq!(json["msg"], "Demand request registered");

    let response = client
        .post(format!("http://{}/api/farmer", addr))
        .json(&farmer(Some("U1")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let json: serde_json::Value = response.json().await.unwrap();
    assert_eq!(json["matches_found"], 1);
    assert!(json["id"].as_str().map(|s| !s.is_empty()).unwrap_or(false));

    let u1: serde_json::Value = client
        .get(format!("http://{}/api/notifications/U1", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let u1 = u1.as_array().unwrap();
    assert_eq!(u1.len(), 1);
    assert_eq!(u1[0]["details"]["contact"], "buyer@example.com");
    assert_eq!(u1[0]["read"], false);

    let u2: serde_json::Value = client
        .get(format!("http://{}/api/notifications/U2", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let u2 = u2.as_array().unwrap();
    assert_eq!(u2.len(), 1);
    assert_eq!(u2[0]["details"]["contact"], "farmer@example.com");
}

#[tokio::test]
async fn city_mismatch_returns_zero_matches() {
    let (addr, _handle) = spawn_app().await;
    let client = reqwest::Client::new();
    client
        .post(format!("http://{}/api/buyer", addr))
        .json(&buyer("Santos", Some("U2")))
        .send()
        .await
        .unwrap();
    let json: serde_json::Value = client
        .post(format!("http://{}/api/farmer", addr))
        .json(&farmer(Some("U1")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(json["matches_found"], 0);
}

#[tokio::test]
async fn inverted_age_range_returns_400() {
    let (addr, _handle) = spawn_app().await;
    let mut body = buyer("ANY", None);
    body["ageMin"] = serde_json::json!(40);
    body["ageMax"] = serde_json::json!(10);
    let response = reqwest::Client::new()
        .post(format!("http://{}/api/buyer", addr))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let json: serde_json::Value = response.json().await.unwrap();
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn inverted_age_range_accepted_when_validation_off() {
    let (addr, _handle) = spawn_app_with(Config {
        strict_validation: false,
        ..Config::default()
    })
    .await;
    let mut body = buyer("ANY", None);
    body["ageMin"] = serde_json::json!(40);
    body["ageMax"] = serde_json::json!(10);
    let response = reqwest::Client::new()
        .post(format!("http://{}/api/buyer", addr))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn negative_quantity_is_rejected_by_decoding() {
    let (addr, _handle) = spawn_app().await;
    let mut body = farmer(None);
    body["quantity"] = serde_json::json!(-3);
    let response = reqwest::Client::new()
        .post(format!("http://{}/api/farmer", addr))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn debug_lists_and_reset() {
    let (addr, _handle) = spawn_app().await;
    let client = reqwest::Client::new();
    client
        .post(format!("http://{}/api/farmer", addr))
        .json(&farmer(None))
        .send()
        .await
        .unwrap();
    let farmers: serde_json::Value = client
        .get(format!("http://{}/api/debug/farmers", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(farmers.as_array().unwrap().len(), 1);
    assert!(farmers[0].get("owner_id").is_none());

    let reset: serde_json::Value = client
        .get(format!("http://{}/api/debug/reset", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reset["msg"], "Database reset successful");

    let buyers: serde_json::Value = client
        .get(format!("http://{}/api/debug/buyers", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(buyers.as_array().unwrap().is_empty());
    let farmers: serde_json::Value = client
        .get(format!("http://{}/api/debug/farmers", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(farmers.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn file_store_persists_listings() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        data_dir: Some(dir.path().to_path_buf()),
        ..Config::default()
    };
    let (addr, _handle) = spawn_app_with(config).await;
    let response = reqwest::Client::new()
        .post(format!("http://{}/api/farmer", addr))
        .json(&farmer(Some("U1")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let raw = std::fs::read_to_string(dir.path().join("farmers.json")).unwrap();
    let records: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(records.as_array().unwrap().len(), 1);
    assert_eq!(records[0]["owner_id"], "U1");
}

#[tokio::test]
async fn legacy_records_do_not_break_reads() {
    let store = InMemoryStore::new();
    store
        .append(Collection::Supply, serde_json::json!({ "race": "Nelore", "location": "SP" }))
        .unwrap();
    store
        .append(
            Collection::Notification,
            serde_json::json!({ "user_id": "U1", "message": "legacy", "read": false, "timestamp": 1.0 }),
        )
        .unwrap();
    let (addr, _handle) = spawn_router(api::router_with_store(Arc::new(store), &Config::default())).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{}/api/buyer", addr))
        .json(&buyer("ANY", Some("U2")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client
        .get(format!("http://{}/api/debug/farmers", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let farmers: Vec<serde_json::Value> = response.json().await.unwrap();
    assert_eq!(farmers.len(), 1);
    assert_eq!(farmers[0]["location"], "SP");

    let response = client
        .get(format!("http://{}/api/notifications/U1", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let notifications: Vec<serde_json::Value> = response.json().await.unwrap();
    assert!(notifications.is_empty());
}
