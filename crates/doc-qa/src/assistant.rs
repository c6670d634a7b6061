//! The document assistant: upload, ask and export against an explicit [`Session`]

use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::export::{ExportedTranscript, TranscriptExporter};
use crate::generation::Summarizer;
use crate::ingestion::{Preview, PreviewRenderer, TextExtractor};
use crate::providers::{EmbeddingProvider, LlmProvider, OllamaProvider};
use crate::retrieval::{IndexBuilder, QueryEngine, ScoredChunk};
use crate::session::Session;
use crate::types::{ChatTurn, Document, DocumentInfo};

/// Status after a successful upload
pub const INDEXED_STATUS: &str = "✅ File indexed. Ask anything!";

/// Answer given to questions asked before any upload
pub const NO_DOCUMENT_WARNING: &str = "⚠️ Please upload a document first.";

/// Result of a successful upload
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    /// Status line for the user
    pub status: String,
    /// The summary that now opens the transcript
    pub summary: String,
    /// First page or leading text
    pub preview: Preview,
    /// The document now indexed by the session
    pub document: DocumentInfo,
}

/// Result of asking a question
#[derive(Debug, Clone)]
pub enum AskOutcome {
    /// Answered from the index and appended to the transcript
    Answered {
        turn: ChatTurn,
        sources: Vec<ScoredChunk>,
    },
    /// Not answered; the turn is shown but not recorded
    Warning { turn: ChatTurn },
}

impl AskOutcome {
    pub fn turn(&self) -> &ChatTurn {
        match self {
            Self::Answered { turn, .. } | Self::Warning { turn } => turn,
        }
    }

    pub fn sources(&self) -> &[ScoredChunk] {
        match self {
            Self::Answered { sources, .. } => sources,
            Self::Warning { .. } => &[],
        }
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Warning { .. })
    }
}

/// Runs the upload and question pipelines
///
/// The assistant holds no per-user state. Every call takes the session it acts on, and a
/// session is only modified once every stage of a call has succeeded.
pub struct DocumentAssistant {
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
    index_builder: IndexBuilder,
    query_engine: QueryEngine,
    summarizer: Summarizer,
    previewer: Arc<PreviewRenderer>,
}

impl DocumentAssistant {
    /// Create an assistant over the given providers
    pub fn new(
        config: &AppConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
    ) -> Self {
        Self {
            index_builder: IndexBuilder::new(Arc::clone(&embedder), &config.chunking),
            query_engine: QueryEngine::new(
                Arc::clone(&embedder),
                Arc::clone(&llm),
                config.retrieval.top_k,
            ),
            summarizer: Summarizer::new(Arc::clone(&llm), config.summary.max_chars),
            previewer: Arc::new(PreviewRenderer::new(config.preview.clone())),
            embedder,
            llm,
        }
    }

    /// Create an assistant backed by the configured Ollama server
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let provider = OllamaProvider::new(&config.llm, &config.embeddings)?;
        Ok(Self::new(config, provider.embedder(), provider.llm()))
    }

    /// Check both model backends
    pub async fn health_check(&self) -> bool {
        let llm_ok = self.llm.health_check().await.unwrap_or(false);
        let embed_ok = self.embedder.health_check().await.unwrap_or(false);
        llm_ok && embed_ok
    }

    /// Index `document` into `session`
    ///
    /// On success the session's index is replaced and its transcript holds exactly the
    /// summary turn. On any error the session is left as it was.
    pub async fn upload(&self, session: &mut Session, document: Document) -> Result<UploadOutcome> {
        if !document.file_type.is_supported() {
            tracing::info!("Rejected upload {}: unsupported type", document.filename);
            return Err(Error::UnsupportedFileType(document.file_type.extension()));
        }

        tracing::info!(
            "Processing upload {} ({}, {} bytes)",
            document.filename,
            document.file_type.display_name(),
            document.size()
        );

        let document = Arc::new(document);

        let text = {
            let document = Arc::clone(&document);
            tokio::task::spawn_blocking(move || TextExtractor::extract_document(&document))
                .await
                .map_err(|e| Error::internal(format!("Extraction task failed: {}", e)))??
        };

        let index = self.index_builder.build(&text).await?;
        let summary = self.summarizer.summarize(&text).await?;

        let preview = {
            let document = Arc::clone(&document);
            let previewer = Arc::clone(&self.previewer);
            tokio::task::spawn_blocking(move || previewer.preview_document(&document))
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!("Preview task failed: {}", e);
                    Preview::none()
                })
        };

        let info = DocumentInfo::new(&document, text.chars().count(), index.len());
        session.replace_document(index, info.clone(), summary.clone());

        Ok(UploadOutcome {
            status: INDEXED_STATUS.to_string(),
            summary,
            preview,
            document: info,
        })
    }

    /// Answer `question` from the session's document
    pub async fn ask(&self, session: &mut Session, question: &str) -> Result<AskOutcome> {
        let Some(index) = session.index() else {
            return Ok(AskOutcome::Warning {
                turn: ChatTurn::new(question, NO_DOCUMENT_WARNING),
            });
        };

        let answer = self.query_engine.query(index, question).await?;
        let turn = ChatTurn::new(question, answer.answer);
        session.record_turn(turn.clone());

        Ok(AskOutcome::Answered {
            turn,
            sources: answer.sources,
        })
    }

    /// Write the session's transcript to a temporary text file
    pub fn export(&self, session: &Session) -> Result<ExportedTranscript> {
        TranscriptExporter::export(session.transcript())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::PDF_PREVIEW_WARNING;
    use crate::test_support::{
        docx_fixture, pdf_fixture, EchoLlm, FailingEmbedder, FailingLlm, HashEmbedder, ScriptedLlm,
    };
    use crate::types::{FileType, SUMMARY_QUESTION};

    fn assistant(llm: Arc<dyn LlmProvider>) -> DocumentAssistant {
        DocumentAssistant::new(&AppConfig::default(), Arc::new(HashEmbedder::default()), llm)
    }

    fn txt(name: &str, body: &str) -> Document {
        Document::from_bytes(name, body.as_bytes().to_vec())
    }

    #[tokio::test]
    async fn test_ask_before_upload_warns() {
        let assistant = assistant(Arc::new(FailingLlm));
        let mut session = Session::new();

        let outcome = assistant.ask(&mut session, "What is this?").await.unwrap();

        assert!(outcome.is_warning());
        assert_eq!(outcome.turn().question, "What is this?");
        assert_eq!(outcome.turn().answer, NO_DOCUMENT_WARNING);
        assert!(outcome.sources().is_empty());
        assert!(session.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_upload_seeds_transcript_with_summary() {
        let assistant = assistant(Arc::new(ScriptedLlm::new(["  It is about cats.  "])));
        let mut session = Session::new();

        let outcome = assistant
            .upload(&mut session, txt("cats.txt", "Cats sleep a lot.\nCats purr.\n"))
            .await
            .unwrap();

        assert_eq!(outcome.status, INDEXED_STATUS);
        assert_eq!(outcome.summary, "It is about cats.");
        assert_eq!(outcome.preview.text.as_deref(), Some("Cats sleep a lot.\nCats purr.\n"));
        assert_eq!(outcome.document.file_type, FileType::Txt);
        assert!(session.has_index());

        let turns = session.transcript().turns();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].question, SUMMARY_QUESTION);
        assert_eq!(turns[0].answer, "It is about cats.");
    }

    #[tokio::test]
    async fn test_unsupported_upload_leaves_session_unchanged() {
        let assistant = assistant(Arc::new(ScriptedLlm::new(["summary"])));
        let mut session = Session::new();
        assistant
            .upload(&mut session, txt("a.txt", "First document."))
            .await
            .unwrap();
        assistant.ask(&mut session, "Anything?").await.unwrap();

        let err = assistant
            .upload(&mut session, Document::from_bytes("sheet.xlsx", b"PK".to_vec()))
            .await
            .unwrap_err();

        assert_eq!(err.status_message(), "Unsupported file format.");
        assert_eq!(session.transcript().len(), 2);
        assert_eq!(session.document().unwrap().filename, "a.txt");
    }

    #[tokio::test]
    async fn test_failed_summary_leaves_session_unchanged() {
        let mut session = Session::new();
        assistant(Arc::new(ScriptedLlm::new(["old summary"])))
            .upload(&mut session, txt("old.txt", "Old text."))
            .await
            .unwrap();

        let err = assistant(Arc::new(FailingLlm))
            .upload(&mut session, txt("new.txt", "New text."))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Llm(_)));
        assert_eq!(session.document().unwrap().filename, "old.txt");
        assert_eq!(session.transcript().turns()[0].answer, "old summary");
    }

    #[tokio::test]
    async fn test_embedding_failure_is_fatal() {
        let assistant = DocumentAssistant::new(
            &AppConfig::default(),
            Arc::new(FailingEmbedder),
            Arc::new(ScriptedLlm::new(["summary"])),
        );
        let mut session = Session::new();

        let err = assistant
            .upload(&mut session, txt("a.txt", "Some text."))
            .await
            .unwrap_err();

        assert_eq!(err.severity(), crate::error::Severity::Fatal);
        assert!(!session.has_index());
    }

    #[tokio::test]
    async fn test_reupload_replaces_index_and_clears_transcript() {
        let llm = Arc::new(EchoLlm::default());
        let assistant = assistant(llm.clone());
        let mut session = Session::new();

        assistant
            .upload(&mut session, txt("first.txt", "Zebras graze on the savanna."))
            .await
            .unwrap();
        assistant.ask(&mut session, "What do zebras do?").await.unwrap();
        assert_eq!(session.transcript().len(), 2);

        assistant
            .upload(&mut session, txt("second.txt", "Submarines dive under the sea."))
            .await
            .unwrap();
        assert_eq!(session.transcript().len(), 1);

        let outcome = assistant.ask(&mut session, "What do zebras do?").await.unwrap();
        assert!(!outcome.is_warning());
        assert!(outcome.sources().len() <= 3);
        let prompt = llm.prompts().pop().unwrap();
        assert!(prompt.contains("Submarines"));
        assert!(!prompt.contains("Zebras graze"));
        assert_eq!(session.transcript().len(), 2);
    }

    #[tokio::test]
    async fn test_docx_and_pdf_uploads() {
        let assistant = assistant(Arc::new(ScriptedLlm::new(["summary"])));
        let mut session = Session::new();

        let docx = Document::from_bytes(
            "memo.docx",
            docx_fixture(&["Quarterly plan", "Hire two engineers"]),
        );
        let outcome = assistant.upload(&mut session, docx).await.unwrap();
        assert_eq!(outcome.preview.text.as_deref(), Some("Quarterly plan\nHire two engineers"));

        let pdf = Document::from_bytes("report.pdf", pdf_fixture(&["Revenue grew"]));
        let outcome = assistant.upload(&mut session, pdf).await.unwrap();
        assert_eq!(outcome.document.file_type, FileType::Pdf);
        assert!(outcome.document.total_chunks >= 1);
        // Either a rendered page or the warning, depending on whether pdfium is installed
        assert!(
            outcome.preview.image_png.is_some()
                || outcome.preview.text.as_deref() == Some(PDF_PREVIEW_WARNING)
        );
    }

    #[tokio::test]
    async fn test_export_matches_transcript() {
        let llm = ScriptedLlm::new(["summary", "answer one", "answer two"]);
        let assistant = assistant(Arc::new(llm));
        let mut session = Session::new();
        assistant
            .upload(&mut session, txt("a.txt", "Some facts here."))
            .await
            .unwrap();
        assistant.ask(&mut session, "first?").await.unwrap();
        assistant.ask(&mut session, "second?").await.unwrap();

        let exported = assistant.export(&session).unwrap();
        assert_eq!(
            exported.contents().unwrap(),
            "Q: 📄 Summary\nA: summary\n\nQ: first?\nA: answer one\n\nQ: second?\nA: answer two\n\n"
        );
    }
}
