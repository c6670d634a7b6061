//! Loads staged text files into source documents for indexing

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Text handed to the chunker, with the metadata of the file it came from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Full text
    pub text: String,
    /// File name of the loaded file
    pub file_name: String,
    /// Size of the loaded file in bytes
    pub file_size: u64,
    /// When the document was loaded
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

/// Reads a text file from disk
pub struct DocumentLoader;

impl DocumentLoader {
    /// Load a UTF-8 text file (invalid bytes are replaced)
    pub fn load_file(path: &Path) -> Result<SourceDocument> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let data = std::fs::read(path).map_err(|e| Error::file_read(&file_name, e.to_string()))?;

        Ok(SourceDocument {
            text: String::from_utf8_lossy(&data).into_owned(),
            file_size: data.len() as u64,
            file_name,
            loaded_at: chrono::Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("staged.txt");
        std::fs::write(&path, "The quick brown fox.").unwrap();

        let doc = DocumentLoader::load_file(&path).unwrap();
        assert_eq!(doc.text, "The quick brown fox.");
        assert_eq!(doc.file_name, "staged.txt");
        assert_eq!(doc.file_size, 20);
    }

    #[test]
    fn test_load_missing_file() {
        let result = DocumentLoader::load_file(Path::new("/missing/staged.txt"));
        assert!(matches!(result, Err(Error::FileRead { .. })));
    }
}
