use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use tender_llm::RetrievedContext;

use crate::api::documents::check_embedding_deps;
use crate::state::AppState;
use crate::vector_store;

// ── Request/Response types ────────────────────────

#[derive(Deserialize, utoipa::ToSchema)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    10
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SearchResponse {
    #[schema(value_type = Vec<Object>)]
    pub results: Vec<vector_store::SearchResult>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct AskRequest {
    pub question: String,
    #[serde(default)]
    pub top_k: Option<usize>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ContextResponse {
    pub text: String,
    pub chunk_index: i32,
    pub page_number: i32,
    pub section: String,
    pub score: f64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AskTrace {
    pub response_time_ms: u64,
    pub contexts_found: usize,
    pub query_length: usize,
    pub response_length: usize,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AskResponse {
    pub question: String,
    pub answer: String,
    pub contexts: Vec<ContextResponse>,
    pub trace: AskTrace,
}

// ── POST /search ──────────────────────────────────

/// Semantic search over stored chunks
#[utoipa::path(
    post,
    path = "/search",
    tag = "Query",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Nearest chunks by cosine similarity", body = SearchResponse),
        (status = 503, description = "Storage or embedding backend unavailable", body = String)
    )
)]
pub async fn search(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let (pool, embedder) = check_embedding_deps(&state)?;

    let query_embedding = embed_query(embedder.as_ref(), &request.query).await?;
    let results = vector_store::search(pool, query_embedding, request.limit)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("Database error: {e}")))?;

    info!(query = %request.query, results = results.len(), "search complete");
    Ok(Json(SearchResponse { results }))
}

// ── POST /ask ─────────────────────────────────────

/// Ask a question over the stored documents
///
/// Embeds the question, retrieves the most similar chunks, and prompts the
/// LLM to answer from them with `[Chunk X, Page Y]` citations. Conversation
/// history is kept server-side and folded into follow-up questions.
#[utoipa::path(
    post,
    path = "/ask",
    tag = "Query",
    request_body = AskRequest,
    responses(
        (status = 200, description = "Answer with citations and trace info", body = AskResponse),
        (status = 503, description = "A required backend is unavailable", body = String)
    )
)]
pub async fn ask(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, (StatusCode, String)> {
    let (pool, embedder) = check_embedding_deps(&state)?;
    let answerer = state
        .answerer
        .as_ref()
        .ok_or((StatusCode::SERVICE_UNAVAILABLE, "LLM provider not configured".to_string()))?;

    let started = Instant::now();
    let question = request.question.trim().to_string();
    if question.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Question must not be empty".to_string()));
    }

    let top_k = request.top_k.unwrap_or(state.config.chunking.top_k).max(1);

    let query_embedding = embed_query(embedder.as_ref(), &question).await?;
    let results = vector_store::search(pool, query_embedding, top_k as i64)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("Database error: {e}")))?;

    let contexts: Vec<RetrievedContext> = results
        .iter()
        .map(|r| RetrievedContext {
            text: r.content.clone(),
            chunk_index: Some(r.chunk_index as usize),
            page_number: Some(r.page_number as usize),
            score: Some(r.similarity),
        })
        .collect();

    let history: Vec<(String, String)> = {
        let guard = state.chat_history.lock().await;
        guard.iter().cloned().collect()
    };

    let answer = answerer
        .answer(&question, &contexts, &history)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("LLM error: {e}")))?;

    state.remember_turn(question.clone(), answer.clone()).await;

    let trace = AskTrace {
        response_time_ms: started.elapsed().as_millis() as u64,
        contexts_found: results.len(),
        query_length: question.len(),
        response_length: answer.len(),
    };
    info!(
        contexts = trace.contexts_found,
        response_time_ms = trace.response_time_ms,
        "question answered"
    );

    let contexts = results
        .into_iter()
        .map(|r| ContextResponse {
            text: r.content,
            chunk_index: r.chunk_index,
            page_number: r.page_number,
            section: r.section,
            score: r.similarity,
        })
        .collect();

    Ok(Json(AskResponse {
        question,
        answer,
        contexts,
        trace,
    }))
}

async fn embed_query(
    embedder: &dyn tender_ingest::embedding::Embedder,
    query: &str,
) -> Result<Vec<f32>, (StatusCode, String)> {
    let mut vectors = embedder
        .embed_batch(&[query])
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("Embedding failed: {e}")))?;
    if vectors.is_empty() {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Embedding backend returned no vector".to_string(),
        ));
    }
    Ok(vectors.swap_remove(0))
}
