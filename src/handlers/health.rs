// src/handlers/health.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::config::AppState;

#[utoipa::path(get, path = "/healthz", tag = "Health", responses((status = 200)))]
pub async fn healthz() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

#[utoipa::path(get, path = "/livez", tag = "Health", responses((status = 200)))]
pub async fn livez() -> impl IntoResponse {
    Json(json!({ "status": "alive" }))
}

// Pronto = banco respondendo
#[utoipa::path(
    get,
    path = "/readyz",
    tag = "Health",
    responses((status = 200), (status = 503, description = "Banco indisponível"))
)]
pub async fn readyz(State(app_state): State<AppState>) -> impl IntoResponse {
    match app_state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ready", "checks": { "database": "ok" } })),
        ),
        Err(e) => {
            tracing::error!("🔥 Readiness: banco indisponível: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "not_ready", "checks": { "database": "error" } })),
            )
        }
    }
}
