//! First-page / first-lines preview of an upload
//!
//! Previews are presentational only. Every failure is turned into a warning string so
//! an upload never fails because its preview could not be produced.

use std::io::{BufReader, Cursor, Read};
use std::path::Path;

use pdfium_render::prelude::*;

use crate::config::PreviewConfig;
use crate::error::{Error, Result};
use crate::types::{Document, FileType};

use super::extractor::TextExtractor;

pub const PDF_PREVIEW_WARNING: &str = "⚠️ Could not preview image.";
pub const TEXT_PREVIEW_WARNING: &str = "⚠️ Could not preview text.";
pub const DOCX_PREVIEW_WARNING: &str = "⚠️ Could not preview document.";

/// Rendered first page (PNG) or leading text of a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preview {
    /// PNG-encoded first page, for PDFs
    pub image_png: Option<Vec<u8>>,
    /// Leading text, or a warning when rendering failed
    pub text: Option<String>,
}

impl Preview {
    fn image(png: Vec<u8>) -> Self {
        Self {
            image_png: Some(png),
            text: None,
        }
    }

    fn text(text: impl Into<String>) -> Self {
        Self {
            image_png: None,
            text: Some(text.into()),
        }
    }

    /// No preview for this file type
    pub fn none() -> Self {
        Self::default()
    }
}

/// Preview renderer
pub struct PreviewRenderer {
    config: PreviewConfig,
}

impl PreviewRenderer {
    pub fn new(config: PreviewConfig) -> Self {
        Self { config }
    }

    /// Preview a file on disk
    pub fn preview(&self, path: impl AsRef<Path>, file_type: &FileType) -> Preview {
        let path = path.as_ref();
        match file_type {
            FileType::Txt => match std::fs::File::open(path) {
                Ok(file) => self.preview_text_reader(BufReader::new(file)),
                Err(e) => {
                    tracing::warn!("Text preview failed for {}: {}", path.display(), e);
                    Preview::text(TEXT_PREVIEW_WARNING)
                }
            },
            FileType::Pdf | FileType::Docx => match std::fs::read(path) {
                Ok(data) => self.preview_bytes(&path.display().to_string(), &data, file_type),
                Err(e) => {
                    tracing::warn!("Preview failed for {}: {}", path.display(), e);
                    Preview::text(Self::warning_for(file_type))
                }
            },
            FileType::Unsupported(_) => Preview::none(),
        }
    }

    /// Preview an uploaded document
    pub fn preview_document(&self, document: &Document) -> Preview {
        self.preview_bytes(&document.filename, &document.data, &document.file_type)
    }

    /// Preview raw bytes of the given type
    pub fn preview_bytes(&self, filename: &str, data: &[u8], file_type: &FileType) -> Preview {
        match file_type {
            FileType::Pdf => match self.render_pdf_first_page(data) {
                Ok(png) => Preview::image(png),
                Err(e) => {
                    tracing::warn!("Image conversion failed for {}: {}", filename, e);
                    Preview::text(PDF_PREVIEW_WARNING)
                }
            },
            FileType::Txt => self.preview_text_reader(Cursor::new(data)),
            FileType::Docx => match TextExtractor::docx_paragraphs(filename, data) {
                Ok(paragraphs) => {
                    let shown: Vec<String> = paragraphs
                        .into_iter()
                        .take(self.config.docx_paragraphs)
                        .collect();
                    Preview::text(shown.join("\n"))
                }
                Err(e) => {
                    tracing::warn!("Document preview failed for {}: {}", filename, e);
                    Preview::text(DOCX_PREVIEW_WARNING)
                }
            },
            FileType::Unsupported(_) => Preview::none(),
        }
    }

    /// First `text_lines` lines, invalid UTF-8 replaced, any line ending shown as `\n`
    fn preview_text_reader<R: Read>(&self, mut reader: R) -> Preview {
        let mut data = Vec::new();
        if let Err(e) = reader.read_to_end(&mut data) {
            tracing::warn!("Text preview failed: {}", e);
            return Preview::text(TEXT_PREVIEW_WARNING);
        }

        let text = TextExtractor::normalize_newlines(&String::from_utf8_lossy(&data));
        Preview::text(
            text.split_inclusive('\n')
                .take(self.config.text_lines)
                .collect::<String>(),
        )
    }

    /// Rasterise page 1 with pdfium and encode it as PNG
    fn render_pdf_first_page(&self, data: &[u8]) -> Result<Vec<u8>> {
        let bindings = match &self.config.pdfium_library_dir {
            Some(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
                .or_else(|_| Pdfium::bind_to_system_library()),
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| Error::internal(format!("pdfium unavailable: {}", e)))?;

        let pdfium = Pdfium::new(bindings);
        let document = pdfium
            .load_pdf_from_byte_slice(data, None)
            .map_err(|e| Error::file_parse("preview.pdf", e.to_string()))?;

        let page = document
            .pages()
            .get(0)
            .map_err(|e| Error::file_parse("preview.pdf", e.to_string()))?;

        let render_config = PdfRenderConfig::new().set_target_width(self.config.pdf_width as i32);
        let image = page
            .render_with_config(&render_config)
            .map_err(|e| Error::internal(format!("render failed: {}", e)))?
            .as_image();

        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .map_err(|e| Error::internal(format!("PNG encoding failed: {}", e)))?;

        Ok(png)
    }

    fn warning_for(file_type: &FileType) -> &'static str {
        match file_type {
            FileType::Pdf => PDF_PREVIEW_WARNING,
            FileType::Docx => DOCX_PREVIEW_WARNING,
            _ => TEXT_PREVIEW_WARNING,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::docx_fixture;

    fn renderer() -> PreviewRenderer {
        PreviewRenderer::new(PreviewConfig::default())
    }

    #[test]
    fn test_txt_first_twenty_lines() {
        let body: String = (1..=30).map(|i| format!("line {}\n", i)).collect();
        let preview = renderer().preview_bytes("long.txt", body.as_bytes(), &FileType::Txt);

        let text = preview.text.unwrap();
        assert_eq!(text.lines().count(), 20);
        assert!(text.starts_with("line 1\n"));
        assert!(text.ends_with("line 20\n"));
        assert!(preview.image_png.is_none());
    }

    #[test]
    fn test_txt_short_file_and_bad_bytes() {
        let preview = renderer().preview_bytes("short.txt", b"only \xff line", &FileType::Txt);
        assert_eq!(preview.text.unwrap(), "only \u{FFFD} line");
    }

    #[test]
    fn test_txt_carriage_return_lines() {
        let body: String = (1..=30).map(|i| format!("line {}\r", i)).collect();
        let preview = renderer().preview_bytes("mac.txt", body.as_bytes(), &FileType::Txt);
        let text = preview.text.unwrap();
        assert_eq!(text.lines().count(), 20);
        assert!(text.ends_with("line 20\n"));

        let body: String = (1..=30).map(|i| format!("line {}\r\n", i)).collect();
        let preview = renderer().preview_bytes("dos.txt", body.as_bytes(), &FileType::Txt);
        let text = preview.text.unwrap();
        assert_eq!(text.lines().count(), 20);
        assert!(!text.contains('\r'));
    }

    #[test]
    fn test_docx_first_ten_paragraphs() {
        let paragraphs: Vec<String> = (1..=12).map(|i| format!("Paragraph {}", i)).collect();
        let refs: Vec<&str> = paragraphs.iter().map(String::as_str).collect();
        let data = docx_fixture(&refs);

        let preview = renderer().preview_bytes("memo.docx", &data, &FileType::Docx);
        let text = preview.text.unwrap();
        assert_eq!(text.lines().count(), 10);
        assert!(text.ends_with("Paragraph 10"));
    }

    #[test]
    fn test_corrupt_pdf_yields_warning() {
        let preview = renderer().preview_bytes("broken.pdf", b"%PDF-1.4 garbage", &FileType::Pdf);
        assert_eq!(preview.image_png, None);
        assert_eq!(preview.text.as_deref(), Some(PDF_PREVIEW_WARNING));
    }

    #[test]
    fn test_corrupt_docx_yields_warning() {
        let preview = renderer().preview_bytes("broken.docx", b"nope", &FileType::Docx);
        assert_eq!(preview.text.as_deref(), Some(DOCX_PREVIEW_WARNING));
    }

    #[test]
    fn test_unsupported_has_no_preview() {
        let preview =
            renderer().preview_bytes("sheet.xlsx", b"PK", &FileType::Unsupported("xlsx".into()));
        assert_eq!(preview, Preview::none());
    }

    #[test]
    fn test_missing_txt_file_yields_warning() {
        let preview = renderer().preview("/no/such/file.txt", &FileType::Txt);
        assert_eq!(preview.text.as_deref(), Some(TEXT_PREVIEW_WARNING));
    }
}
