//! RAG prompt construction.
//!
//! Builds the question prompt from retrieved chunks, labelling each excerpt
//! with its chunk index and page number so the model can cite sources as
//! `[Chunk X, Page Y]`.

/// A retrieved chunk handed to the prompt builder.
#[derive(Debug, Clone)]
pub struct RetrievedContext {
    pub text: String,
    pub chunk_index: Option<usize>,
    pub page_number: Option<usize>,
    pub score: Option<f64>,
}

/// Default instructions embedded at the top of the prompt.
pub const DEFAULT_SYSTEM_MESSAGE: &str = "You are a highly knowledgeable assistant. \
Use only the provided context to answer the user's question. \
When referencing information, always cite it using the chunk metadata, e.g., [Chunk X, Page Y]. \
If the answer cannot be found in the context, reply with: 'I don't know based on the provided information.' \
Provide detailed and enriched paragraph-style answers.";

/// Build the full prompt: instructions, labelled context block under a word
/// budget, answer guidelines, and the question.
pub fn build_prompt(
    question: &str,
    contexts: &[RetrievedContext],
    system_message: Option<&str>,
    max_words: usize,
) -> String {
    let mut context_texts: Vec<String> = Vec::with_capacity(contexts.len());
    let mut total_words = 0usize;

    for (idx, ctx) in contexts.iter().enumerate() {
        let words = ctx.text.split_whitespace().count();
        if total_words + words > max_words {
            break;
        }

        let chunk_label = ctx
            .chunk_index
            .map(|i| i.to_string())
            .unwrap_or_else(|| idx.to_string());
        let page_label = ctx
            .page_number
            .map(|p| p.to_string())
            .unwrap_or_else(|| "N/A".to_string());

        context_texts.push(format!(
            "[Chunk {chunk_label}, Page {page_label}]\n{}",
            ctx.text.trim()
        ));
        total_words += words;
    }

    let context_block = context_texts.join("\n\n");
    let system_message = system_message.unwrap_or(DEFAULT_SYSTEM_MESSAGE);

    format!(
        r#"
{system_message}

-------------------- CONTEXT START --------------------
Below are excerpts from the document for reference.

{context_block}
--------------------- CONTEXT END ---------------------

Instructions:
- Read the context above thoroughly.
- Answer the question in a detailed paragraph format.
- Cite chunks explicitly using the [Chunk X, Page Y] labels provided in the context.
- Use only the information from the context.
- If the answer is not present, say: "I don't know based on the provided information."
- At the end of your response, if applicable, include a relevance or confidence score.

Question:
{question}

Answer:
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(text: &str, chunk_index: usize, page_number: usize) -> RetrievedContext {
        RetrievedContext {
            text: text.to_string(),
            chunk_index: Some(chunk_index),
            page_number: Some(page_number),
            score: Some(0.9),
        }
    }

    #[test]
    fn labels_contexts_with_chunk_and_page() {
        let prompt = build_prompt(
            "What is the scope?",
            &[ctx("The scope covers roads.", 3, 7)],
            None,
            4000,
        );
        assert!(prompt.contains("[Chunk 3, Page 7]\nThe scope covers roads."));
        assert!(prompt.contains("Question:\nWhat is the scope?"));
        assert!(prompt.contains("I don't know based on the provided information."));
    }

    #[test]
    fn respects_word_budget() {
        let big = "word ".repeat(30).trim_end().to_string();
        let contexts = vec![ctx(&big, 0, 1), ctx(&big, 1, 2), ctx("tail", 2, 3)];
        // Budget admits only the first context (30 words); the second would
        // push the total to 60.
        let prompt = build_prompt("q", &contexts, None, 40);
        assert!(prompt.contains("[Chunk 0, Page 1]"));
        assert!(!prompt.contains("[Chunk 1, Page 2]"));
        assert!(!prompt.contains("[Chunk 2, Page 3]"));
    }

    #[test]
    fn missing_metadata_falls_back_to_position_and_na() {
        let contexts = vec![RetrievedContext {
            text: "anonymous excerpt".to_string(),
            chunk_index: None,
            page_number: None,
            score: None,
        }];
        let prompt = build_prompt("q", &contexts, None, 4000);
        assert!(prompt.contains("[Chunk 0, Page N/A]"));
    }

    #[test]
    fn custom_system_message_replaces_default() {
        let prompt = build_prompt("q", &[], Some("Answer tersely."), 4000);
        assert!(prompt.contains("Answer tersely."));
        assert!(!prompt.contains("highly knowledgeable assistant"));
    }
}
