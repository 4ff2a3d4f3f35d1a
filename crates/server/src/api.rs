//! OpenAPI documentation aggregator.
//!
//! Collects all `#[utoipa::path]`-annotated handlers and `ToSchema`-derived
//! types into a single OpenAPI spec, served via Scalar UI at `/docs`.

pub mod documents;
pub mod health;
pub mod query;

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "tender-rag API",
        version = "0.1.0",
        description = "Tender document ingestion, semantic search, and retrieval-augmented question answering.",
    ),
    tags(
        (name = "Health", description = "Server readiness and processing status"),
        (name = "Documents", description = "PDF upload, chunking, embedding, and document CRUD"),
        (name = "Query", description = "Semantic search and RAG question answering"),
    ),
    paths(
        health::health,
        health::status,
        documents::upload,
        documents::list_documents,
        documents::delete_document,
        query::search,
        query::ask,
    ),
    components(schemas(
        health::HealthResponse,
        health::StatusResponse,
        documents::UploadResponse,
        documents::DocumentListResponse,
        query::SearchRequest,
        query::SearchResponse,
        query::AskRequest,
        query::AskResponse,
        query::ContextResponse,
        query::AskTrace,
    )),
)]
pub struct ApiDoc;
