//! One-shot document summaries

use std::sync::Arc;

use crate::error::Result;
use crate::providers::LlmProvider;

use super::prompt::PromptBuilder;

/// Summarizes the opening of a document with the LLM
pub struct Summarizer {
    llm: Arc<dyn LlmProvider>,
    max_chars: usize,
}

impl Summarizer {
    pub fn new(llm: Arc<dyn LlmProvider>, max_chars: usize) -> Self {
        Self { llm, max_chars }
    }

    /// Summarize the first `max_chars` characters of `text`
    pub async fn summarize(&self, text: &str) -> Result<String> {
        let excerpt = leading_chars(text, self.max_chars);
        tracing::info!(
            "Summarizing {} of {} characters with {}",
            excerpt.chars().count(),
            text.chars().count(),
            self.llm.model()
        );

        let prompt = PromptBuilder::build_summary_prompt(excerpt);
        let summary = self.llm.complete(&prompt).await?;
        Ok(summary.trim().to_string())
    }
}

/// Longest prefix of `text` holding at most `max_chars` characters
pub fn leading_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
