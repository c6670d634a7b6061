//! Generation module: Ollama client, prompts and summaries

mod ollama;
mod prompt;
mod summary;

pub use ollama::OllamaClient;
pub use prompt::PromptBuilder;
pub use summary::{leading_chars, Summarizer};
