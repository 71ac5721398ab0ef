use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use std::sync::Arc;
use std::time::Instant;

lazy_static::lazy_static! {
    static ref START_TIME: Instant = Instant::now();
}

/// What a service reports about itself on `/health`
#[derive(Debug, Clone)]
pub struct HealthInfo {
    pub service: &'static str,
    pub instance_id: String,
}

pub fn router(info: HealthInfo) -> Router {
    lazy_static::initialize(&START_TIME);

    Router::new()
        .route("/health", get(health))
        .with_state(Arc::new(info))
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = serde_json::Value)
    )
)]
pub async fn health(State(info): State<Arc<HealthInfo>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": info.service,
        "instance_id": info.instance_id,
        "version": env!("CARGO_PKG_VERSION"),
        "build": {
            "profile": if cfg!(debug_assertions) { "debug" } else { "release" },
        },
        "uptime_seconds": START_TIME.elapsed().as_secs(),
    }))
}
