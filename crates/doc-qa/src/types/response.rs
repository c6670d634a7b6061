//! JSON response bodies of the HTTP API

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assistant::{AskOutcome, UploadOutcome};
use crate::ingestion::Preview;
use crate::retrieval::ScoredChunk;

use super::document::DocumentInfo;
use super::transcript::ChatTurn;

/// Preview of an upload, image as base64 PNG
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreviewPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_png_base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl From<&Preview> for PreviewPayload {
    fn from(preview: &Preview) -> Self {
        Self {
            image_png_base64: preview.image_png.as_ref().map(|png| BASE64.encode(png)),
            text: preview.text.clone(),
        }
    }
}

/// A retrieved passage an answer was generated from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSnippet {
    pub chunk_index: u32,
    pub score: f32,
    pub content: String,
}

impl From<&ScoredChunk> for SourceSnippet {
    fn from(scored: &ScoredChunk) -> Self {
        Self {
            chunk_index: scored.chunk.index,
            score: scored.score,
            content: scored.chunk.content.clone(),
        }
    }
}

/// Response to session creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
}

/// Response to an upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Status line
    pub status: String,
    /// Transcript after the upload (the summary turn)
    pub transcript: Vec<ChatTurn>,
    pub preview: PreviewPayload,
    pub document: DocumentInfo,
}

impl UploadResponse {
    pub fn new(outcome: &UploadOutcome, transcript: Vec<ChatTurn>) -> Self {
        Self {
            status: outcome.status.clone(),
            transcript,
            preview: PreviewPayload::from(&outcome.preview),
            document: outcome.document.clone(),
        }
    }
}

/// Response to a question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    /// The new turn
    pub turn: ChatTurn,
    /// Transcript as it should be displayed, including an unrecorded warning turn
    pub transcript: Vec<ChatTurn>,
    pub sources: Vec<SourceSnippet>,
    /// True when the question was not answered from a document
    pub warning: bool,
}

impl AskResponse {
    pub fn new(outcome: &AskOutcome, transcript: Vec<ChatTurn>) -> Self {
        Self {
            turn: outcome.turn().clone(),
            transcript,
            sources: outcome.sources().iter().map(SourceSnippet::from).collect(),
            warning: outcome.is_warning(),
        }
    }
}

/// Transcript listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptResponse {
    pub session_id: Uuid,
    pub document: Option<DocumentInfo>,
    pub turns: Vec<ChatTurn>,
}
