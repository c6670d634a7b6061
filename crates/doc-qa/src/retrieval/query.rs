//! Retrieval-augmented question answering over a [`VectorIndex`]

use std::sync::Arc;

use crate::error::Result;
use crate::generation::PromptBuilder;
use crate::providers::{EmbeddingProvider, LlmProvider};

use super::index::{ScoredChunk, VectorIndex};

/// Answer given when the index holds no text at all
pub const EMPTY_RESPONSE: &str = "Empty Response";

/// Answer with the chunks it was generated from
#[derive(Debug, Clone)]
pub struct QueryAnswer {
    pub answer: String,
    pub sources: Vec<ScoredChunk>,
}

/// Query engine: embed, retrieve top-K, generate
pub struct QueryEngine {
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
    top_k: usize,
}

impl QueryEngine {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        top_k: usize,
    ) -> Self {
        Self { embedder, llm, top_k }
    }

    /// Answer `question` from the chunks of `index`
    pub async fn query(&self, index: &VectorIndex, question: &str) -> Result<QueryAnswer> {
        if index.is_empty() {
            tracing::info!("Index {} is empty, skipping generation", index.id());
            return Ok(QueryAnswer {
                answer: EMPTY_RESPONSE.to_string(),
                sources: Vec::new(),
            });
        }

        let query_embedding = self.embedder.embed(question).await?;
        let sources = index.search(&query_embedding, self.top_k)?;

        let context = PromptBuilder::build_context(&sources);
        let prompt = PromptBuilder::build_qa_prompt(question, &context);

        tracing::info!(
            "Answering with {} of {} chunks via {}",
            sources.len(),
            index.len(),
            self.llm.model()
        );

        let answer = self.llm.complete(&prompt).await?;

        Ok(QueryAnswer {
            answer: answer.trim().to_string(),
            sources,
        })
    }
}
