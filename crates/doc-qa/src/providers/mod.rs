//! Provider abstractions for the local model backend
//!
//! The assistant only talks to embeddings and completions through these traits, so the
//! Ollama backend can be swapped for another local server or for test doubles.

pub mod embedding;
pub mod llm;
pub mod ollama;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use ollama::{OllamaEmbedder, OllamaLlm, OllamaProvider};
