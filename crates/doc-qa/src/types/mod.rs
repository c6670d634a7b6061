//! Core types for the document assistant

pub mod document;
pub mod response;
pub mod transcript;

pub use document::{Chunk, Document, DocumentInfo, FileType};
pub use response::{
    AskResponse, PreviewPayload, SessionCreated, SourceSnippet, TranscriptResponse, UploadResponse,
};
pub use transcript::{ChatTranscript, ChatTurn, SUMMARY_QUESTION};
