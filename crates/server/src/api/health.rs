//! Server readiness and processing status endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;
use crate::vector_store;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Server is up", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct StatusResponse {
    pub storage_configured: bool,
    pub embedding_configured: bool,
    pub llm_configured: bool,
    pub document_count: i64,
    pub chat_turns: usize,
    #[schema(value_type = Object)]
    pub config: serde_json::Value,
}

/// Processing status and redacted configuration
#[utoipa::path(
    get,
    path = "/status",
    tag = "Health",
    responses((status = 200, description = "Backend availability and counters", body = StatusResponse))
)]
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let document_count = match state.pg_pool.as_ref() {
        Some(pool) => vector_store::count_documents(pool).await.unwrap_or(0),
        None => 0,
    };
    let chat_turns = state.chat_history.lock().await.len();

    Json(StatusResponse {
        storage_configured: state.pg_pool.is_some(),
        embedding_configured: state.embedder.is_some(),
        llm_configured: state.answerer.is_some(),
        document_count,
        chat_turns,
        config: state.config.redacted_summary(),
    })
}
