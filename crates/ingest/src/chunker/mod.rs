//! Chunking pipeline.
//!
//! Turns an ordered sequence of page texts (plus an optional coarse
//! table-of-contents) into overlapping, embedding-ready chunks, each
//! annotated with its best-estimate originating page and section:
//!
//! pages -> buffer + page offsets -> chunk texts -> buffer spans
//!       -> page numbers -> section descriptions -> annotated chunks
//!
//! The whole pipeline is a pure function over in-memory data; callers
//! inject extraction and persistence around it.

mod attribute;
mod layout;
mod splitter;
mod title;
mod types;


pub use types::{Chunk, ChunkConfig, ChunkError, ChunkMetadata, DocumentMeta};

use crate::document::PageContent;
use crate::index::IndexSection;

use layout::PageLayout;

/// Chunk a document's pages into annotated, embedding-ready records.
///
/// `index_sections` may be empty (every chunk then gets an empty section
/// description) and need not be sorted. Fails only on an empty page list
/// or an invalid size/overlap configuration; every other irregularity is
/// absorbed with a deterministic fallback.
pub fn chunk_document(
    pages: &[PageContent],
    meta: &DocumentMeta,
    index_sections: &[IndexSection],
    config: &ChunkConfig,
) -> Result<Vec<Chunk>, ChunkError> {
    if config.chunk_overlap >= config.chunk_size {
        return Err(ChunkError::InvalidConfig {
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
        });
    }
    if pages.is_empty() {
        return Err(ChunkError::EmptyDocument);
    }

    let title = title::detect_title(&pages[0].text, &meta.fallback_title);

    let layout = PageLayout::assemble(pages);
    let chunk_texts = splitter::split_text(&layout.buffer, config);

    let mut sections = index_sections.to_vec();
    sections.sort_by_key(|s| s.start);
    if !sections.is_empty() {
        tracing::info!(sections = sections.len(), "using index sections for mapping");
    }

    let mut chunks = Vec::with_capacity(chunk_texts.len());
    let mut cursor = 0usize;
    let mut reconciliation_misses = 0usize;

    for (i, text) in chunk_texts.into_iter().enumerate() {
        let (char_start, found) = attribute::locate_chunk(&layout.buffer, &text, cursor);
        if !found {
            reconciliation_misses += 1;
            tracing::debug!(chunk_index = i, cursor, "chunk text not found in buffer, using cursor position");
        }
        cursor = char_start + text.len();
        let char_end = char_start + text.len();

        let page_number = attribute::page_for_span(&layout, char_start, char_end);
        let description = attribute::section_for_page(&sections, page_number);

        if i == 0 {
            tracing::info!(
                page = page_number,
                char_start,
                char_end,
                section = %description,
                "first chunk mapped"
            );
        }

        chunks.push(Chunk {
            id: format!("chunk_{i}"),
            text,
            metadata: ChunkMetadata {
                source: meta.source_name.clone(),
                doc_date: meta.doc_date.clone(),
                title: title.clone(),
                chunk_index: i,
                page_number,
                char_start,
                char_end,
                description,
            },
        });
    }

    if reconciliation_misses > 0 {
        tracing::warn!(
            misses = reconciliation_misses,
            total = chunks.len(),
            "some chunk offsets were approximated by cursor position"
        );
    }
    tracing::info!(chunks = chunks.len(), "chunking complete");

    Ok(chunks)
}
