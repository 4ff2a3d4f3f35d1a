pub mod batcher;
pub mod ollama;
pub mod openai;
pub mod traits;

pub use batcher::EmbeddingBatcher;
pub use ollama::OllamaEmbedder;
pub use openai::OpenAiEmbedder;
pub use traits::{Embedder, EmbeddingError};
