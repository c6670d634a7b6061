//! Sentence-aware text chunking with overlap

use unicode_segmentation::UnicodeSegmentation;

use crate::types::Chunk;

/// Text chunker with configurable size and overlap
pub struct TextChunker {
    /// Target chunk size in bytes of UTF-8 text
    chunk_size: usize,
    /// Overlap between consecutive chunks
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            overlap: overlap.min(chunk_size - 1),
        }
    }

    /// Chunk text into overlapping windows; blank windows are dropped
    pub fn chunk_text(&self, text: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();

        let mut current_chunk = String::new();
        let mut current_start = 0usize;
        let mut char_pos = 0usize;
        // False while the window holds only text carried over from the previous chunk
        let mut has_new_text = false;

        for segment in self.split_into_segments(text) {
            if has_new_text && current_chunk.len() + segment.len() > self.chunk_size {
                self.push_chunk(&mut chunks, &current_chunk, current_start, char_pos);

                // Start new chunk with overlap
                current_chunk = self.get_overlap_text(&current_chunk);
                current_start = char_pos - current_chunk.len();
                has_new_text = false;
            }

            if current_chunk.is_empty() {
                current_start = char_pos;
            }
            current_chunk.push_str(segment);
            char_pos += segment.len();
            has_new_text = true;
        }

        if has_new_text {
            self.push_chunk(&mut chunks, &current_chunk, current_start, char_pos);
        }

        tracing::debug!("Split {} bytes into {} chunks", text.len(), chunks.len());
        chunks
    }

    fn push_chunk(&self, chunks: &mut Vec<Chunk>, window: &str, start: usize, end: usize) {
        let content = window.trim();
        if content.is_empty() {
            return;
        }
        chunks.push(Chunk::new(chunks.len() as u32, content.to_string(), start, end));
    }

    /// Sentences, with sentences longer than the chunk size split further
    fn split_into_segments<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut segments = Vec::new();
        for sentence in text.split_sentence_bounds() {
            if sentence.len() <= self.chunk_size {
                segments.push(sentence);
            } else {
                segments.extend(self.split_oversized(sentence));
            }
        }
        segments
    }

    /// Split at word bounds, falling back to character bounds for giant words
    fn split_oversized<'a>(&self, sentence: &'a str) -> Vec<&'a str> {
        let mut pieces = Vec::new();
        let mut start = 0usize;
        let mut end = 0usize;

        for word in sentence.split_word_bounds() {
            if end > start && end - start + word.len() > self.chunk_size {
                pieces.push(&sentence[start..end]);
                start = end;
            }

            if word.len() > self.chunk_size {
                let mut word_start = end;
                for (offset, ch) in word.char_indices() {
                    let at = end + offset;
                    if at > word_start && at + ch.len_utf8() - word_start > self.chunk_size {
                        pieces.push(&sentence[word_start..at]);
                        word_start = at;
                    }
                }
                start = word_start;
            }

            end += word.len();
        }

        if end > start {
            pieces.push(&sentence[start..end]);
        }
        pieces
    }

    /// Get overlap text from the end of a chunk
    fn get_overlap_text(&self, text: &str) -> String {
        if self.overlap == 0 {
            return String::new();
        }
        if text.len() <= self.overlap {
            return text.to_string();
        }

        let mut start = text.len() - self.overlap;

        // Ensure we're at a valid UTF-8 character boundary
        while start < text.len() && !text.is_char_boundary(start) {
            start += 1;
        }

        let overlap_text = &text[start..];

        // Try to start at a sentence boundary
        if let Some(pos) = overlap_text.find(". ") {
            return overlap_text[pos + 2..].to_string();
        }

        // Fall back to word boundary
        if let Some(pos) = overlap_text.find(' ') {
            return overlap_text[pos + 1..].to_string();
        }

        overlap_text.to_string()
    }
}
