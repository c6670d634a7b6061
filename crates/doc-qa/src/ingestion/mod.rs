//! Document ingestion: text extraction, previews, loading and chunking

mod chunker;
mod extractor;
mod loader;
mod preview;

pub use chunker::TextChunker;
pub use extractor::TextExtractor;
pub use loader::{DocumentLoader, SourceDocument};
pub use preview::{
    Preview, PreviewRenderer, DOCX_PREVIEW_WARNING, PDF_PREVIEW_WARNING, TEXT_PREVIEW_WARNING,
};
