use std::collections::VecDeque;
use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::Mutex;
use tracing::warn;

use tender_core::Config;
use tender_ingest::embedding::{Embedder, OllamaEmbedder, OpenAiEmbedder};
use tender_llm::AnswerGenerator;

/// Oldest conversation turns are dropped past this bound.
pub const MAX_CHAT_TURNS: usize = 20;

pub struct AppState {
    pub config: Config,
    /// None when Postgres is not configured; embedding endpoints then
    /// report 503 instead of failing at startup.
    pub pg_pool: Option<PgPool>,
    pub embedder: Option<Arc<dyn Embedder>>,
    pub answerer: Option<AnswerGenerator>,
    /// Server-side conversation memory for /ask, most recent turns only.
    pub chat_history: Mutex<VecDeque<(String, String)>>,
}

impl AppState {
    pub fn new(config: Config, pg_pool: Option<PgPool>) -> Self {
        let embedder = build_embedder(&config);
        let answerer = match AnswerGenerator::from_config(
            &config.llm,
            &config.ollama,
            config.chunking.max_context_words,
        ) {
            Ok(generator) => Some(generator),
            Err(e) => {
                warn!("LLM provider unavailable: {e} — /ask disabled");
                None
            }
        };

        Self {
            config,
            pg_pool,
            embedder,
            answerer,
            chat_history: Mutex::new(VecDeque::with_capacity(MAX_CHAT_TURNS)),
        }
    }

    /// Record a completed turn, dropping the oldest past the bound.
    pub async fn remember_turn(&self, question: String, answer: String) {
        let mut history = self.chat_history.lock().await;
        if history.len() >= MAX_CHAT_TURNS {
            history.pop_front();
        }
        history.push_back((question, answer));
    }
}

fn build_embedder(config: &Config) -> Option<Arc<dyn Embedder>> {
    match config.embedding.provider.as_str() {
        "ollama" => {
            let url = config
                .embedding
                .base_url
                .clone()
                .unwrap_or_else(|| config.ollama.url.clone());
            Some(Arc::new(OllamaEmbedder::new(
                url,
                config.embedding.model.clone(),
                config.embedding.dimensions,
            )))
        }
        "openai" => match config.embedding.api_key.clone() {
            Some(api_key) => Some(Arc::new(OpenAiEmbedder::new(
                api_key,
                config.embedding.model.clone(),
                config.embedding.base_url.clone(),
                config.embedding.dimensions,
            ))),
            None => {
                warn!("EMBEDDING_API_KEY not set — embedding endpoints disabled");
                None
            }
        },
        other => {
            warn!("unknown embedding provider '{other}' — embedding endpoints disabled");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        tender_core::config::load_dotenv();
        AppState::new(Config::from_env(), None)
    }

    #[tokio::test]
    async fn chat_history_is_bounded() {
        let state = state();
        for i in 0..(MAX_CHAT_TURNS + 5) {
            state
                .remember_turn(format!("q{i}"), format!("a{i}"))
                .await;
        }
        let history = state.chat_history.lock().await;
        assert_eq!(history.len(), MAX_CHAT_TURNS);
        // Oldest turns dropped first.
        assert_eq!(history.front().map(|(q, _)| q.as_str()), Some("q5"));
    }
}
