//! Web server for the pantry UI
//!
//! Serves a single embedded page plus a small JSON API for listing items,
//! recording new observations, and consuming units.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use crate::database::SqliteStore;
use crate::error::PantryError;
use crate::pantry::Pantry;
use crate::reconcile::{InventoryRecord, RecordId};

/// Shared application state. The mutex serializes operations, so at most one
/// add/consume is in flight at a time within this process.
#[derive(Clone)]
struct AppState {
    pantry: Arc<Mutex<Pantry<SqliteStore>>>,
}

/// API response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn ok_empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }
}

/// Body for POST /api/items
#[derive(Deserialize)]
struct AddRequest {
    name: String,
    #[serde(default = "default_quantity")]
    quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

fn error_status(err: &PantryError) -> StatusCode {
    match err {
        PantryError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        PantryError::NotFound(_) | PantryError::UnknownItem(_) => StatusCode::NOT_FOUND,
        PantryError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// GET / - Serve the web UI (single HTML page)
async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

/// GET /api/items - all current records, name-sorted
async fn list_handler(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<InventoryRecord>>> {
    let pantry = state.pantry.lock().unwrap();
    let mut records: Vec<InventoryRecord> = pantry.view().records().cloned().collect();
    records.sort_by(|a, b| a.name.cmp(&b.name));
    Json(ApiResponse::ok(records))
}

/// POST /api/items - record an observation (create or merge)
async fn add_handler(
    State(state): State<AppState>,
    Json(req): Json<AddRequest>,
) -> Result<Json<ApiResponse<InventoryRecord>>, StatusCode> {
    let mut pantry = state.pantry.lock().unwrap();
    match pantry.add(&req.name, req.quantity) {
        Ok(id) => {
            let record = pantry.view().get(id).cloned();
            Ok(Json(match record {
                Some(r) => ApiResponse::ok(r),
                None => ApiResponse::ok_empty(),
            }))
        }
        Err(e) => {
            log::warn!("Add failed for {:?}: {}", req.name, e);
            Err(error_status(&e))
        }
    }
}

/// POST /api/items/{id}/consume - decrement one unit or delete the record
async fn consume_handler(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<Json<ApiResponse<InventoryRecord>>, StatusCode> {
    let mut pantry = state.pantry.lock().unwrap();
    match pantry.consume(id) {
        Ok(id) => {
            // data absent when the last unit was consumed and the record deleted
            let record = pantry.view().get(id).cloned();
            Ok(Json(match record {
                Some(r) => ApiResponse::ok(r),
                None => ApiResponse::ok_empty(),
            }))
        }
        Err(e) => {
            log::warn!("Consume failed for record {}: {}", id, e);
            Err(error_status(&e))
        }
    }
}

/// Build the web server router
pub fn create_router(pantry: Arc<Mutex<Pantry<SqliteStore>>>) -> Router {
    let state = AppState { pantry };

    Router::new()
        .route("/", get(index_handler))
        .route("/api/items", get(list_handler).post(add_handler))
        .route("/api/items/{id}/consume", post(consume_handler))
        .with_state(state)
}

/// Start the web server (async)
///
/// Binds to 0.0.0.0 (all interfaces) to work with Docker port mapping.
pub async fn serve(
    pantry: Arc<Mutex<Pantry<SqliteStore>>>,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(pantry);
    let addr = format!("0.0.0.0:{}", port);

    log::info!("Pantry UI listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
