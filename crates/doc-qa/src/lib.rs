//! doc-qa: single-document question answering over a local language model
//!
//! Upload a PDF, DOCX or TXT file, get a summary and a preview, then ask questions that
//! are answered from the most relevant passages of that document. Embeddings and answer
//! generation are delegated to a local Ollama server; retrieval runs over an in-memory
//! cosine-similarity index that lives inside the caller's [`Session`].

pub mod assistant;
pub mod config;
pub mod error;
pub mod export;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use assistant::{AskOutcome, DocumentAssistant, UploadOutcome};
pub use config::AppConfig;
pub use error::{Error, Result, Severity};
pub use export::{ExportedTranscript, TranscriptExporter};
pub use session::Session;
pub use types::{
    document::{Document, FileType},
    transcript::{ChatTranscript, ChatTurn},
};
