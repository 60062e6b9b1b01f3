//! HTTP routes for loading and saving drawings.

use crate::store::StoreHandle;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use brainsketch_core::api::{ApiResponse, CANVAS_PATH, DEFAULT_USER_ID, LoadQuery, SaveRequest};
use brainsketch_core::storage::{CanvasRecord, StorageError};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<StoreHandle>,
}

impl AppState {
    pub fn new(store: StoreHandle) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Storage(#[from] StorageError),
    #[error("invalid request body: {0}")]
    BadRequest(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()>::failure(self.to_string());
        (self.status(), Json(body)).into_response()
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route(CANVAS_PATH, get(get_canvas).post(save_canvas))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index() -> &'static str {
    "BrainSketch persistence server - GET/POST /canvas"
}

/// `GET /health`: liveness plus whether the store is open.
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let store = if state.store.is_connected().await {
        "connected"
    } else {
        "idle"
    };
    Json(json!({ "status": "ok", "store": store }))
}

/// `GET /canvas?userId=..`: the user's drawing, created empty on first access.
pub async fn get_canvas(State(state): State<AppState>, Query(query): Query<LoadQuery>) -> Response {
    let user_id = query.user_id();
    match load_or_create(&state.store, user_id).await {
        Ok(record) => Json(ApiResponse::ok(record)).into_response(),
        Err(e) => {
            error!(user_id, error = %e, "failed to load canvas");
            let fallback = json!({ "userId": DEFAULT_USER_ID, "lines": [] });
            let body = ApiResponse::failure_with(e.to_string(), fallback);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

/// `POST /canvas`: replace the user's lines.
pub async fn save_canvas(
    State(state): State<AppState>,
    body: Result<Json<SaveRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<CanvasRecord>>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let user_id = request.user_id().to_string();

    let store = state.store.get().await.map_err(|e| log_failure(&user_id, e))?;
    let record = state
        .store
        .query(store.save(&user_id, request.lines))
        .await
        .map_err(|e| log_failure(&user_id, e))?;

    info!(user_id, "canvas saved");
    Ok(Json(ApiResponse::ok(record)))
}

fn log_failure(user_id: &str, e: StorageError) -> ApiError {
    error!(user_id, error = %e, "failed to save canvas");
    ApiError::Storage(e)
}

async fn load_or_create(store: &StoreHandle, user_id: &str) -> Result<CanvasRecord, StorageError> {
    let storage = store.get().await?;
    match store.query(storage.load(user_id)).await {
        Err(StorageError::NotFound(_)) => {
            info!(user_id, "creating empty canvas");
            store.query(storage.save(user_id, json!([]))).await
        }
        other => other,
    }
}
