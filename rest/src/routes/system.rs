//! Liveness endpoints

use axum::{Json, Router, http::StatusCode, routing::get};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

#[derive(Serialize)]
struct HealthResponse {
    okay: bool,
    version: &'static str,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}

/// GET / - 204, confirms the router is mounted
async fn root() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        okay: true,
        version: env!("CARGO_PKG_VERSION"),
    })
}
