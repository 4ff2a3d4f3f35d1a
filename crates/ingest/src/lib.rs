pub mod chunker;
pub mod document;
pub mod embedding;
pub mod index;

pub use chunker::{chunk_document, Chunk, ChunkConfig, ChunkError, ChunkMetadata, DocumentMeta};
pub use document::{extract_text, ExtractedDocument, ExtractionError, PageContent};
pub use embedding::{Embedder, EmbeddingBatcher, EmbeddingError, OllamaEmbedder, OpenAiEmbedder};
pub use index::{extract_index_sections, IndexSection};
