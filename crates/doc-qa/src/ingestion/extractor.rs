//! Plain-text extraction for PDF, DOCX and TXT files

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{Document, FileType};

/// Text extractor for the supported upload formats
pub struct TextExtractor;

impl TextExtractor {
    /// Extract the full text of a file on disk
    pub fn extract(path: impl AsRef<Path>, file_type: &FileType) -> Result<String> {
        let path = path.as_ref();
        let filename = path.display().to_string();

        if !file_type.is_supported() {
            return Err(Error::UnsupportedFileType(file_type.extension()));
        }

        let data = std::fs::read(path).map_err(|e| Error::file_read(&filename, e.to_string()))?;
        Self::extract_bytes(&filename, &data, file_type)
    }

    /// Extract the full text of an uploaded document
    pub fn extract_document(document: &Document) -> Result<String> {
        Self::extract_bytes(&document.filename, &document.data, &document.file_type)
    }

    /// Extract text from raw bytes of the given type
    pub fn extract_bytes(filename: &str, data: &[u8], file_type: &FileType) -> Result<String> {
        let text = match file_type {
            FileType::Pdf => Self::extract_pdf(filename, data)?,
            FileType::Docx => Self::extract_docx(filename, data)?,
            FileType::Txt => Self::extract_text(data),
            FileType::Unsupported(_) => {
                return Err(Error::UnsupportedFileType(file_type.extension()))
            }
        };

        tracing::debug!(
            "Extracted {} characters from '{}' ({})",
            text.chars().count(),
            filename,
            file_type.display_name()
        );

        Ok(text)
    }

    /// PDF: page texts concatenated in page order
    fn extract_pdf(filename: &str, data: &[u8]) -> Result<String> {
        match Self::extract_pdf_pages(data) {
            Ok(pages) => Ok(pages.concat()),
            Err(e) => {
                tracing::debug!("Page-wise PDF extraction failed ({}), using whole-document pass", e);
                // pdf-extract panics on some malformed inputs
                std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(data))
                    .map_err(|_| Error::file_parse(filename, "PDF parser panicked"))?
                    .map_err(|e| Error::file_parse(filename, e.to_string()))
            }
        }
    }

    /// Text of every page, in page order
    pub fn extract_pdf_pages(data: &[u8]) -> std::result::Result<Vec<String>, lopdf::Error> {
        let doc = lopdf::Document::load_mem(data)?;

        // get_pages is keyed by 1-based page number in a BTreeMap, so iteration is ordered
        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();

        page_numbers
            .iter()
            .map(|page| doc.extract_text(&[*page]))
            .collect()
    }

    /// DOCX: top-level paragraphs joined with newlines, empty ones included
    fn extract_docx(filename: &str, data: &[u8]) -> Result<String> {
        Ok(Self::docx_paragraphs(filename, data)?.join("\n"))
    }

    /// Text of each top-level paragraph of a DOCX file
    pub fn docx_paragraphs(filename: &str, data: &[u8]) -> Result<Vec<String>> {
        let doc = docx_rs::read_docx(data).map_err(|e| Error::file_parse(filename, e.to_string()))?;

        let mut paragraphs = Vec::new();
        for child in doc.document.children {
            if let docx_rs::DocumentChild::Paragraph(p) = child {
                let mut text = String::new();
                for child in p.children {
                    if let docx_rs::ParagraphChild::Run(run) = child {
                        for child in run.children {
                            match child {
                                docx_rs::RunChild::Text(t) => text.push_str(&t.text),
                                docx_rs::RunChild::Tab(_) => text.push('\t'),
                                _ => {}
                            }
                        }
                    }
                }
                paragraphs.push(text);
            }
        }

        Ok(paragraphs)
    }

    /// TXT: lossy UTF-8, undecodable bytes become U+FFFD, line endings become `\n`
    fn extract_text(data: &[u8]) -> String {
        Self::normalize_newlines(&String::from_utf8_lossy(data))
    }

    /// Rewrite CRLF and bare CR line endings as LF
    pub fn normalize_newlines(text: &str) -> String {
        if !text.contains('\r') {
            return text.to_string();
        }
        text.replace("\r\n", "\n").replace('\r', "\n")
    }
}
