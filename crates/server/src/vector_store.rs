//! pgvector-backed chunk storage and similarity search.

use chrono::{DateTime, Utc};
use pgvector::Vector;
use serde::Serialize;
use sqlx::{PgPool, Row};
use uuid::Uuid;

// ── Types ──────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DocumentRecord {
    pub id: Uuid,
    pub filename: String,
    pub title: String,
    pub doc_date: String,
    pub file_size: i64,
    pub uploaded_at: DateTime<Utc>,
    pub chunk_count: i64,
}

#[derive(Debug, Serialize)]
pub struct SearchResult {
    pub chunk_id: Uuid,
    pub document_id: Uuid,
    pub filename: String,
    pub content: String,
    pub chunk_index: i32,
    pub page_number: i32,
    pub section: String,
    pub similarity: f64,
}

pub struct ChunkInsert {
    pub chunk_index: usize,
    pub content: String,
    pub page_number: usize,
    pub section: String,
    pub char_start: usize,
    pub char_end: usize,
    pub embedding: Vec<f32>,
}

// ── Operations ─────────────────────────────────────

/// Insert a new document record.
pub async fn insert_document(
    pool: &PgPool,
    filename: &str,
    title: &str,
    doc_date: &str,
    source_name: &str,
    file_size: i64,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO documents (id, filename, title, doc_date, source_name, file_size) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(id)
    .bind(filename)
    .bind(title)
    .bind(doc_date)
    .bind(source_name)
    .bind(file_size)
    .execute(pool)
    .await?;
    Ok(id)
}

/// Insert chunks with embeddings for a document.
pub async fn insert_chunks(
    pool: &PgPool,
    document_id: Uuid,
    chunks: Vec<ChunkInsert>,
) -> Result<Vec<Uuid>, sqlx::Error> {
    let mut ids = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        let id = Uuid::new_v4();
        let embedding = Vector::from(chunk.embedding);
        sqlx::query(
            "INSERT INTO chunks (id, document_id, chunk_index, content, page_number, section, \
             char_start, char_end, embedding) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(id)
        .bind(document_id)
        .bind(chunk.chunk_index as i32)
        .bind(&chunk.content)
        .bind(chunk.page_number as i32)
        .bind(&chunk.section)
        .bind(chunk.char_start as i64)
        .bind(chunk.char_end as i64)
        .bind(&embedding)
        .execute(pool)
        .await?;
        ids.push(id);
    }
    Ok(ids)
}

/// Search chunks by cosine similarity.
pub async fn search(
    pool: &PgPool,
    query_embedding: Vec<f32>,
    limit: i64,
) -> Result<Vec<SearchResult>, sqlx::Error> {
    let embedding = Vector::from(query_embedding);
    let rows = sqlx::query(
        "SELECT c.id, c.document_id, d.filename, c.content, c.chunk_index, \
         c.page_number, c.section, \
         1.0 - (c.embedding <=> $1::vector) as similarity \
         FROM chunks c \
         JOIN documents d ON d.id = c.document_id \
         ORDER BY c.embedding <=> $1::vector \
         LIMIT $2",
    )
    .bind(&embedding)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    let results = rows
        .iter()
        .map(|row| SearchResult {
            chunk_id: row.get("id"),
            document_id: row.get("document_id"),
            filename: row.get("filename"),
            content: row.get("content"),
            chunk_index: row.get("chunk_index"),
            page_number: row.get("page_number"),
            section: row.get("section"),
            similarity: row.get("similarity"),
        })
        .collect();
    Ok(results)
}

/// List all documents with chunk counts.
pub async fn list_documents(pool: &PgPool) -> Result<Vec<DocumentRecord>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT d.id, d.filename, d.title, d.doc_date, d.file_size, d.uploaded_at, \
         COUNT(c.id) as chunk_count \
         FROM documents d \
         LEFT JOIN chunks c ON c.document_id = d.id \
         GROUP BY d.id \
         ORDER BY d.uploaded_at DESC",
    )
    .fetch_all(pool)
    .await?;

    let docs = rows
        .iter()
        .map(|row| DocumentRecord {
            id: row.get("id"),
            filename: row.get("filename"),
            title: row.get("title"),
            doc_date: row.get("doc_date"),
            file_size: row.get("file_size"),
            uploaded_at: row.get("uploaded_at"),
            chunk_count: row.get("chunk_count"),
        })
        .collect();
    Ok(docs)
}

/// Count stored documents.
pub async fn count_documents(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) as n FROM documents")
        .fetch_one(pool)
        .await?;
    Ok(row.get("n"))
}

/// Delete a document and all its chunks (CASCADE).
pub async fn delete_document(pool: &PgPool, document_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM documents WHERE id = $1")
        .bind(document_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
