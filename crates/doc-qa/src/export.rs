//! Plain-text transcript export

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempPath;

use crate::error::Result;
use crate::types::ChatTranscript;

/// Render a transcript as `Q: <question>\nA: <answer>\n\n` blocks, in order
pub fn render_transcript(transcript: &ChatTranscript) -> String {
    transcript
        .iter()
        .map(|turn| format!("Q: {}\nA: {}\n\n", turn.question, turn.answer))
        .collect()
}

/// A transcript written to a temporary file
///
/// The file is deleted when this value is dropped, unless it was persisted first.
#[derive(Debug)]
pub struct ExportedTranscript {
    path: TempPath,
    turns: usize,
}

impl ExportedTranscript {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of Q/A blocks written
    pub fn turns(&self) -> usize {
        self.turns
    }

    /// Read the exported text back
    pub fn contents(&self) -> Result<String> {
        Ok(std::fs::read_to_string(&self.path)?)
    }

    /// Move the export to `dest`, keeping it past the lifetime of this value
    pub fn persist(self, dest: impl AsRef<Path>) -> Result<PathBuf> {
        let dest = dest.as_ref();
        match self.path.persist(dest) {
            Ok(()) => Ok(dest.to_path_buf()),
            Err(e) => {
                // rename fails across filesystems; copy, and the returned guard removes the original
                tracing::debug!("Rename to {} failed ({}), copying", dest.display(), e.error);
                std::fs::copy(&e.path, dest)?;
                Ok(dest.to_path_buf())
            }
        }
    }
}

/// Writes transcripts to downloadable text files
pub struct TranscriptExporter;

impl TranscriptExporter {
    pub fn export(transcript: &ChatTranscript) -> Result<ExportedTranscript> {
        let mut file = tempfile::Builder::new()
            .prefix("doc-qa-chat-")
            .suffix(".txt")
            .tempfile()?;
        file.write_all(render_transcript(transcript).as_bytes())?;
        file.flush()?;

        let path = file.into_temp_path();
        tracing::info!("Exported {} turns to {}", transcript.len(), path.display());

        Ok(ExportedTranscript {
            path,
            turns: transcript.len(),
        })
    }
}
