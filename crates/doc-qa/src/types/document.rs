//! Uploaded document types

use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Declared file type of an upload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// PDF document
    Pdf,
    /// Microsoft Word document (.docx)
    Docx,
    /// Plain text file
    Txt,
    /// Anything else, with the lowercased extension that was given
    Unsupported(String),
}

impl FileType {
    /// Detect file type from an extension, with or without the leading dot
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.trim_start_matches('.').to_lowercase();
        match ext.as_str() {
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "txt" => Self::Txt,
            _ => Self::Unsupported(ext),
        }
    }

    /// Detect file type from a filename or path
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        Self::from_extension(ext)
    }

    /// Check if this is a supported file type
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }

    /// Extension including the leading dot
    pub fn extension(&self) -> String {
        match self {
            Self::Pdf => ".pdf".to_string(),
            Self::Docx => ".docx".to_string(),
            Self::Txt => ".txt".to_string(),
            Self::Unsupported(ext) if ext.is_empty() => String::new(),
            Self::Unsupported(ext) => format!(".{}", ext),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "Word Document (.docx)",
            Self::Txt => "Text File",
            Self::Unsupported(_) => "Unsupported",
        }
    }
}

/// A user-supplied file, read once per upload
#[derive(Debug, Clone)]
pub struct Document {
    /// Original filename
    pub filename: String,
    /// File type declared by the extension
    pub file_type: FileType,
    /// Raw bytes
    pub data: Vec<u8>,
}

impl Document {
    /// Wrap bytes received from an upload
    pub fn from_bytes(filename: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        let filename = filename.into();
        Self {
            file_type: FileType::from_path(&filename),
            filename,
            data: data.into(),
        }
    }

    /// Read a document from disk
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let data = std::fs::read(path).map_err(|e| Error::file_read(&filename, e.to_string()))?;

        Ok(Self::from_bytes(filename, data))
    }

    /// Size in bytes
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// What a session knows about the document it currently indexes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Upload ID
    pub id: Uuid,
    /// Original filename
    pub filename: String,
    /// File type
    pub file_type: FileType,
    /// File size in bytes
    pub file_size: u64,
    /// Characters of extracted text
    pub text_chars: usize,
    /// Chunks in the index
    pub total_chunks: usize,
    /// Upload timestamp
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

impl DocumentInfo {
    /// Describe a freshly indexed document
    pub fn new(document: &Document, text_chars: usize, total_chunks: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename: document.filename.clone(),
            file_type: document.file_type.clone(),
            file_size: document.size(),
            text_chars,
            total_chunks,
            uploaded_at: chrono::Utc::now(),
        }
    }
}

/// A slice of document text that is embedded and retrieved as a unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk ID
    pub id: Uuid,
    /// Position of the chunk in the document
    pub index: u32,
    /// Chunk text
    pub content: String,
    /// Byte offset of the chunk window in the source text
    pub char_start: usize,
    /// Byte offset one past the end of the chunk window
    pub char_end: usize,
}

impl Chunk {
    pub fn new(index: u32, content: String, char_start: usize, char_end: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            index,
            content,
            char_start,
            char_end,
        }
    }
}
