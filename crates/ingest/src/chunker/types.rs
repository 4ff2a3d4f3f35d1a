//! Chunk configuration and output types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Configuration ───────────────────────────────────────────────────────────

/// Configuration for the chunking pipeline.
#[derive(Debug, Clone)]
pub struct ChunkConfig {
    /// Target chunk size in characters (default: 2500).
    pub chunk_size: usize,
    /// Characters of overlap carried between adjacent chunks (default: 400).
    /// Must be strictly smaller than `chunk_size`.
    pub chunk_overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 2500,
            chunk_overlap: 400,
        }
    }
}

/// Document-level fields stamped onto every chunk.
#[derive(Debug, Clone)]
pub struct DocumentMeta {
    pub source_name: String,
    pub doc_date: String,
    /// Used when no title can be detected on the first page.
    pub fallback_title: String,
}

impl Default for DocumentMeta {
    fn default() -> Self {
        Self {
            source_name: "Unknown".to_string(),
            doc_date: "Unknown".to_string(),
            fallback_title: "Untitled".to_string(),
        }
    }
}

// ── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("no pages provided")]
    EmptyDocument,
    #[error("chunk_overlap ({chunk_overlap}) must be smaller than chunk_size ({chunk_size})")]
    InvalidConfig {
        chunk_size: usize,
        chunk_overlap: usize,
    },
}

// ── Chunk output ────────────────────────────────────────────────────────────

/// Attribution metadata for a chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub source: String,
    pub doc_date: String,
    /// Document-level title, identical across all chunks.
    pub title: String,
    /// 0-based position in the output sequence.
    pub chunk_index: usize,
    /// 1-based best-effort page attribution.
    pub page_number: usize,
    /// Offset of the chunk within the concatenated document buffer.
    pub char_start: usize,
    /// `char_start + text.len()`.
    pub char_end: usize,
    /// Best-effort section description, empty if none found.
    pub description: String,
}

/// A chunk of document text with attribution metadata, ready for embedding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Stable per-position identifier, `chunk_<index>`.
    pub id: String,
    /// The chunk text, verbatim from the splitter.
    pub text: String,
    pub metadata: ChunkMetadata,
}
