use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use tender_ingest::chunker::{chunk_document, ChunkConfig, DocumentMeta};
use tender_ingest::embedding::Embedder;
use tender_ingest::index::extract_index_sections;

use crate::state::AppState;
use crate::vector_store::{self, ChunkInsert};

// ── Request/Response types ────────────────────────

#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadResponse {
    #[schema(value_type = String)]
    pub document_id: Uuid,
    pub filename: String,
    pub title: String,
    pub page_count: usize,
    pub index_sections: usize,
    pub chunk_count: usize,
    pub file_size: i64,
    pub processing_ms: u64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DocumentListResponse {
    #[schema(value_type = Vec<Object>)]
    pub documents: Vec<vector_store::DocumentRecord>,
}

// ── Helper: check pool + embedder ─────────────────

pub(crate) fn check_embedding_deps(
    state: &AppState,
) -> Result<(&sqlx::PgPool, &Arc<dyn Embedder>), (StatusCode, String)> {
    let pool = state
        .pg_pool
        .as_ref()
        .ok_or((StatusCode::SERVICE_UNAVAILABLE, "PostgreSQL not configured".to_string()))?;
    let embedder = state
        .embedder
        .as_ref()
        .ok_or((StatusCode::SERVICE_UNAVAILABLE, "Embedding provider not configured".to_string()))?;
    Ok((pool, embedder))
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ── POST /documents ───────────────────────────────

/// Upload a tender document
///
/// Accepts multipart/form-data with a file field. The document is parsed
/// into pages, its table of contents is extracted, the text is chunked
/// with page/section attribution, embedded, and stored for semantic search.
#[utoipa::path(
    post,
    path = "/documents",
    tag = "Documents",
    request_body(content_type = "multipart/form-data", description = "File upload"),
    responses(
        (status = 200, description = "Document processed and stored", body = UploadResponse),
        (status = 400, description = "Upload or processing error", body = String),
        (status = 503, description = "Storage or embedding backend unavailable", body = String)
    )
)]
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, (StatusCode, String)> {
    let (pool, embedder) = check_embedding_deps(&state)?;
    let started = Instant::now();

    // Extract file from multipart
    let field = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Multipart error: {e}")))?
        .ok_or((StatusCode::BAD_REQUEST, "No file provided".to_string()))?;

    let filename = field.file_name().unwrap_or("unnamed").to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Failed to read file: {e}")))?;

    let file_size = bytes.len() as i64;

    // Extract text
    let doc = tender_ingest::document::extract_text(&bytes, &filename)
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Text extraction failed: {e}")))?;

    info!(
        "Extracted '{}' (type={}): {} pages, {} chars",
        filename,
        doc.file_type,
        doc.pages.len(),
        doc.total_chars()
    );

    // Extract table-of-contents sections (empty result is fine).
    let sections = extract_index_sections(&doc.pages);

    let stem = filename
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(&filename);
    let meta = DocumentMeta {
        source_name: stem.to_string(),
        doc_date: chrono::Utc::now().format("%B %Y").to_string(),
        fallback_title: title_case(&stem.replace('_', " ")),
    };
    let chunk_config = ChunkConfig {
        chunk_size: state.config.chunking.chunk_size,
        chunk_overlap: state.config.chunking.chunk_overlap,
    };

    let chunks = chunk_document(&doc.pages, &meta, &sections, &chunk_config)
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Chunking failed: {e}")))?;

    if chunks.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Document produced no chunks".to_string()));
    }

    let title = chunks[0].metadata.title.clone();

    // Embed chunk texts in batches.
    let batch_size = state.config.embedding.batch_size.max(1);
    let mut embeddings: Vec<Vec<f32>> = Vec::with_capacity(chunks.len());
    for batch in chunks.chunks(batch_size) {
        let texts: Vec<&str> = batch.iter().map(|c| c.text.as_str()).collect();
        let batch_embeddings = embedder.embed_batch(&texts).await.map_err(|e| {
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Embedding failed: {e}"))
        })?;
        embeddings.extend(batch_embeddings);
    }

    // Store document + chunks.
    let document_id = vector_store::insert_document(
        pool,
        &filename,
        &title,
        &meta.doc_date,
        &meta.source_name,
        file_size,
    )
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("Database error: {e}")))?;

    let inserts: Vec<ChunkInsert> = chunks
        .iter()
        .zip(embeddings)
        .map(|(chunk, embedding)| ChunkInsert {
            chunk_index: chunk.metadata.chunk_index,
            content: chunk.text.clone(),
            page_number: chunk.metadata.page_number,
            section: chunk.metadata.description.clone(),
            char_start: chunk.metadata.char_start,
            char_end: chunk.metadata.char_end,
            embedding,
        })
        .collect();

    let chunk_count = inserts.len();
    vector_store::insert_chunks(pool, document_id, inserts)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("Database error: {e}")))?;

    let processing_ms = started.elapsed().as_millis() as u64;
    info!(
        %document_id,
        chunk_count,
        processing_ms,
        "document processed"
    );

    Ok(Json(UploadResponse {
        document_id,
        filename,
        title,
        page_count: doc.pages.len(),
        index_sections: sections.len(),
        chunk_count,
        file_size,
        processing_ms,
    }))
}

// ── GET /documents ────────────────────────────────

/// List stored documents
#[utoipa::path(
    get,
    path = "/documents",
    tag = "Documents",
    responses(
        (status = 200, description = "Stored documents with chunk counts", body = DocumentListResponse),
        (status = 503, description = "Storage unavailable", body = String)
    )
)]
pub async fn list_documents(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DocumentListResponse>, (StatusCode, String)> {
    let pool = state
        .pg_pool
        .as_ref()
        .ok_or((StatusCode::SERVICE_UNAVAILABLE, "PostgreSQL not configured".to_string()))?;

    let documents = vector_store::list_documents(pool)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("Database error: {e}")))?;

    Ok(Json(DocumentListResponse { documents }))
}

// ── DELETE /documents/{id} ────────────────────────

/// Delete a document and its chunks
#[utoipa::path(
    delete,
    path = "/documents/{id}",
    tag = "Documents",
    params(("id" = String, Path, description = "Document id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Unknown document id", body = String),
        (status = 503, description = "Storage unavailable", body = String)
    )
)]
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let pool = state
        .pg_pool
        .as_ref()
        .ok_or((StatusCode::SERVICE_UNAVAILABLE, "PostgreSQL not configured".to_string()))?;

    let deleted = vector_store::delete_document(pool, id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("Database error: {e}")))?;

    if deleted {
        info!(document_id = %id, "document deleted");
        Ok(StatusCode::OK)
    } else {
        warn!(document_id = %id, "delete requested for unknown document");
        Err((StatusCode::NOT_FOUND, "Unknown document id".to_string()))
    }
}
