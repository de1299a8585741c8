use axum::http::Uri;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::server::error::ApiError;
use crate::server::server::AppState;
use crate::utils::constants::SERVICE_NAME;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
}

async fn index() -> Json<Value> {
    Json(json!({
        "name": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("The requested resource {} was not found", uri.path()))
}
