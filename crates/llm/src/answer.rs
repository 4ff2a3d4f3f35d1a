//! RAG answer generation over retrieved contexts.

use tender_core::config::{LlmConfig, OllamaConfig};
use tracing::{debug, info};

use crate::prompt::{build_prompt, RetrievedContext};
use crate::provider::{LlmError, LlmProvider, Message, Role};

/// Fixed reply when retrieval returned nothing; the provider is not called.
pub const NO_CONTEXT_REPLY: &str = "No relevant information found in the document.";

/// Chat-level system role accompanying the prompt.
const SYSTEM_ROLE: &str =
    "You are a helpful assistant that summarizes and answers based only on the provided context.";

/// Turns a question plus retrieved chunks (and prior conversation turns)
/// into an answer via the configured LLM provider.
pub struct AnswerGenerator {
    provider: Box<dyn LlmProvider>,
    temperature: f32,
    max_tokens: u32,
    max_context_words: usize,
}

impl AnswerGenerator {
    pub fn new(
        provider: Box<dyn LlmProvider>,
        temperature: f32,
        max_tokens: u32,
        max_context_words: usize,
    ) -> Self {
        Self {
            provider,
            temperature,
            max_tokens,
            max_context_words,
        }
    }

    /// Build from config, creating the appropriate provider.
    pub fn from_config(
        llm_config: &LlmConfig,
        ollama_config: &OllamaConfig,
        max_context_words: usize,
    ) -> Result<Self, LlmError> {
        let provider = crate::providers::create_provider(llm_config, ollama_config)?;
        Ok(Self::new(
            provider,
            llm_config.temperature,
            llm_config.max_tokens,
            max_context_words,
        ))
    }

    /// Answer `question` from `contexts`, weaving prior `(question, answer)`
    /// turns into the prompt so follow-up questions resolve naturally.
    pub async fn answer(
        &self,
        question: &str,
        contexts: &[RetrievedContext],
        history: &[(String, String)],
    ) -> Result<String, LlmError> {
        if contexts.is_empty() {
            info!("no contexts retrieved, returning fixed reply");
            return Ok(NO_CONTEXT_REPLY.to_string());
        }

        let question_block = fold_history(question, history);
        let prompt = build_prompt(&question_block, contexts, None, self.max_context_words);
        debug!(prompt_len = prompt.len(), contexts = contexts.len(), "built RAG prompt");

        let messages = vec![
            Message {
                role: Role::System,
                content: SYSTEM_ROLE.to_string(),
            },
            Message {
                role: Role::User,
                content: prompt,
            },
        ];

        self.provider
            .complete(messages, self.temperature, self.max_tokens)
            .await
    }
}

/// Prepend prior turns as a transcript so the model sees the conversation.
fn fold_history(question: &str, history: &[(String, String)]) -> String {
    if history.is_empty() {
        return question.to_string();
    }
    let mut block = String::new();
    for (q, a) in history {
        block.push_str(&format!("User: {q}\nAssistant: {a}\n"));
    }
    block.push_str(&format!("User: {question}\nAssistant:"));
    block
}
