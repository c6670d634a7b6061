//! Prompt templates for summaries and question answering

use crate::retrieval::ScoredChunk;

/// Prompt builder for document queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the context block from retrieved chunks, best match first
    pub fn build_context(results: &[ScoredChunk]) -> String {
        results
            .iter()
            .map(|result| result.chunk.content.trim())
            .filter(|content| !content.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Question-answering prompt over the retrieved context
    pub fn build_qa_prompt(question: &str, context: &str) -> String {
        format!(
            "Context information is below.\n\
             ---------------------\n\
             {context}\n\
             ---------------------\n\
             Given the context information and not prior knowledge, answer the query.\n\
             Query: {question}\n\
             Answer: ",
            context = context,
            question = question
        )
    }

    /// Summary prompt over an already truncated excerpt
    pub fn build_summary_prompt(excerpt: &str) -> String {
        format!("Summarize this document:\n\n{}", excerpt)
    }
}
