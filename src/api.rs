//! REST API router for the matchmaking service.
//!
//! Used by the binary and by integration tests. Create with [`create_router`] or
//! [`router_with_store`]. Uses Extension for state so the router is `Router<()>`
//! and works with `into_make_service()`.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::error;
use std::sync::{Arc, Mutex};

use crate::config::Config;
use crate::error::{ScanError, StoreError};
use crate::persistence::JsonFileStore;
use crate::store::{InMemoryStore, RecordStore};
use crate::types::{NewDemand, NewSupply, OwnerId};
use crate::Matchmaker;

type SharedStore = Arc<dyn RecordStore>;

/// Shared app state: one matchmaker per process. The mutex serializes append+scan.
#[derive(Clone)]
pub struct AppState {
    pub(crate) matchmaker: Arc<Mutex<Matchmaker<SharedStore>>>,
    pub(crate) strict_validation: bool,
}

/// Builds the router with the store selected by `config` (file store when `data_dir` is set).
pub fn create_router(config: &Config) -> Result<Router<()>, StoreError> {
    let store: SharedStore = match &config.data_dir {
        Some(dir) => Arc::new(JsonFileStore::open(dir)?),
        None => Arc::new(InMemoryStore::new()),
    };
    Ok(router_with_store(store, config))
}

/// Builds the router over an existing store.
pub fn router_with_store(store: SharedStore, config: &Config) -> Router<()> {
    let state = AppState {
        matchmaker: Arc::new(Mutex::new(Matchmaker::new(store, config.rules))),
        strict_validation: config.strict_validation,
    };
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/farmer", post(create_farmer))
        .route("/api/buyer", post(create_buyer))
        .route("/api/notifications/:owner_id", get(list_notifications))
        .route("/api/debug/farmers", get(debug_farmers))
        .route("/api/debug/buyers", get(debug_buyers))
        .route("/api/debug/reset", get(debug_reset))
        .layer(Extension(state))
}

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "System Operational", "mode": "JSON-DB" }))
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

fn error_response(status: StatusCode, message: impl ToString) -> Response {
    (status, Json(serde_json::json!({ "error": message.to_string() }))).into_response()
}

fn store_fault(e: impl std::fmt::Display) -> Response {
    error!("store fault: {}", e);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, e)
}

fn scan_fault(e: ScanError) -> Response {
    match e {
        ScanError::Store(e) => store_fault(e),
        other => {
            error!("scan rejected: {}", other);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, other)
        }
    }
}

fn lock_poisoned() -> Response {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "matchmaker lock poisoned")
}

#[derive(serde::Deserialize)]
struct FarmerRequest {
    #[serde(flatten)]
    listing: NewSupply,
    #[serde(default)]
    owner_id: Option<OwnerId>,
}

#[derive(serde::Deserialize)]
struct BuyerRequest {
    #[serde(flatten)]
    listing: NewDemand,
    #[serde(default)]
    owner_id: Option<OwnerId>,
}

#[derive(serde::Serialize)]
struct CreatedOut {
    msg: &'static str,
    id: crate::ListingId,
    matches_found: usize,
}

async fn create_farmer(Extension(state): Extension<AppState>, Json(body): Json<FarmerRequest>) -> Response {
    if state.strict_validation {
        if let Err(e) = body.listing.validate() {
            return error_response(StatusCode::BAD_REQUEST, e);
        }
    }
    let Ok(mut guard) = state.matchmaker.lock() else {
        return lock_poisoned();
    };
    match guard.create_supply(body.listing, body.owner_id) {
        Ok(sub) => Json(CreatedOut {
            msg: "Supply registered successfully",
            id: sub.id,
            matches_found: sub.matches_found,
        })
        .into_response(),
        Err(e) => scan_fault(e),
    }
}

async fn create_buyer(Extension(state): Extension<AppState>, Json(body): Json<BuyerRequest>) -> Response {
    if state.strict_validation {
        if let Err(e) = body.listing.validate() {
            return error_response(StatusCode::BAD_REQUEST, e);
        }
    }
    let Ok(mut guard) = state.matchmaker.lock() else {
        return lock_poisoned();
    };
    match guard.create_demand(body.listing, body.owner_id) {
        Ok(sub) => Json(CreatedOut {
            msg: "Demand request registered",
            id: sub.id,
            matches_found: sub.matches_found,
        })
        .into_response(),
        Err(e) => scan_fault(e),
    }
}

async fn list_notifications(Extension(state): Extension<AppState>, Path(owner_id): Path<String>) -> Response {
    let Ok(guard) = state.matchmaker.lock() else {
        return lock_poisoned();
    };
    match guard.notifications_for(&OwnerId(owner_id)) {
        Ok(list) => Json(list).into_response(),
        Err(e) => store_fault(e),
    }
}

async fn debug_farmers(Extension(state): Extension<AppState>) -> Response {
    let Ok(guard) = state.matchmaker.lock() else {
        return lock_poisoned();
    };
    match guard.supply_listings() {
        Ok(list) => Json(list).into_response(),
        Err(e) => store_fault(e),
    }
}

async fn debug_buyers(Extension(state): Extension<AppState>) -> Response {
    let Ok(guard) = state.matchmaker.lock() else {
        return lock_poisoned();
    };
    match guard.demand_listings() {
        Ok(list) => Json(list).into_response(),
        Err(e) => store_fault(e),
    }
}

async fn debug_reset(Extension(state): Extension<AppState>) -> Response {
    let Ok(mut guard) = state.matchmaker.lock() else {
        return lock_poisoned();
    };
    match guard.reset_listings() {
        Ok(()) => Json(serde_json::json!({ "msg": "Database reset successful" })).into_response(),
        Err(e) => (StatusCode::OK, Json(serde_json::json!({ "msg": e.to_string() }))).into_response(),
    }
}
