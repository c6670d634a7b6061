//! In-memory vector index over the chunks of one document

use std::io::Write;
use std::sync::Arc;

use uuid::Uuid;

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use crate::ingestion::{DocumentLoader, TextChunker};
use crate::providers::EmbeddingProvider;
use crate::types::Chunk;

/// Search result with chunk and similarity
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// The retrieved chunk
    pub chunk: Chunk,
    /// Cosine similarity to the query, higher is better
    pub score: f32,
}

#[derive(Debug, Clone)]
struct IndexEntry {
    chunk: Chunk,
    embedding: Vec<f32>,
    norm: f32,
}

/// Chunks of a single document with their embeddings
///
/// An index is built once per upload and only read afterwards; a new upload builds a new
/// index rather than updating this one.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    id: Uuid,
    source_name: String,
    dimensions: usize,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Create an index from chunks and their embeddings, in the same order
    pub fn new(
        source_name: impl Into<String>,
        chunks: Vec<Chunk>,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<Self> {
        if chunks.len() != embeddings.len() {
            return Err(Error::embedding(format!(
                "Got {} embeddings for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        let dimensions = embeddings.first().map(Vec::len).unwrap_or(0);
        let mut entries = Vec::with_capacity(chunks.len());
        for (chunk, embedding) in chunks.into_iter().zip(embeddings) {
            if embedding.len() != dimensions {
                return Err(Error::embedding(format!(
                    "Embedding dimension mismatch: expected {}, got {}",
                    dimensions,
                    embedding.len()
                )));
            }
            entries.push(IndexEntry {
                norm: l2_norm(&embedding),
                chunk,
                embedding,
            });
        }

        Ok(Self {
            id: Uuid::new_v4(),
            source_name: source_name.into(),
            dimensions,
            entries,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Name of the file the text was loaded from
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of chunks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Chunks in document order
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.entries.iter().map(|entry| &entry.chunk)
    }

    /// The `top_k` chunks most similar to `query`, best first
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>> {
        if self.entries.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }
        if query.len() != self.dimensions {
            return Err(Error::embedding(format!(
                "Query embedding has {} dimensions, index has {}",
                query.len(),
                self.dimensions
            )));
        }

        let query_norm = l2_norm(query);
        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                chunk: entry.chunk.clone(),
                score: cosine_similarity(query, &entry.embedding, query_norm, entry.norm),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.chunk.index.cmp(&b.chunk.index))
        });
        scored.truncate(top_k);

        tracing::debug!(
            "Search over {} chunks kept {} (best score {:.3})",
            self.entries.len(),
            scored.len(),
            scored.first().map(|s| s.score).unwrap_or(0.0)
        );

        Ok(scored)
    }
}

pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity with precomputed norms; zero vectors score 0
pub fn cosine_similarity(a: &[f32], b: &[f32], a_norm: f32, b_norm: f32) -> f32 {
    if a_norm == 0.0 || b_norm == 0.0 {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    dot / (a_norm * b_norm)
}

/// Builds a fresh [`VectorIndex`] from extracted text
pub struct IndexBuilder {
    embedder: Arc<dyn EmbeddingProvider>,
    chunker: TextChunker,
}

impl IndexBuilder {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, chunking: &ChunkingConfig) -> Self {
        Self {
            embedder,
            chunker: TextChunker::new(chunking.chunk_size, chunking.chunk_overlap),
        }
    }

    /// Stage the text in a temporary file, load, chunk, embed and index it
    ///
    /// The temporary file is removed before this returns, on success and on error.
    pub async fn build(&self, text: &str) -> Result<VectorIndex> {
        let mut staged = tempfile::Builder::new()
            .prefix("doc-qa-")
            .suffix(".txt")
            .tempfile()?;
        staged.write_all(text.as_bytes())?;
        staged.flush()?;

        let source = DocumentLoader::load_file(staged.path())?;
        drop(staged);

        let chunks = self.chunker.chunk_text(&source.text);
        let contents: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();

        tracing::info!(
            "Embedding {} chunks from {} ({} bytes) with {}",
            chunks.len(),
            source.file_name,
            source.file_size,
            self.embedder.name()
        );

        let embeddings = if contents.is_empty() {
            Vec::new()
        } else {
            self.embedder.embed_batch(&contents).await?
        };

        let index = VectorIndex::new(source.file_name, chunks, embeddings)?;
        if !index.is_empty() && index.dimensions() != self.embedder.dimensions() {
            tracing::warn!(
                "{} returned {}-dimensional embeddings, configured for {}",
                self.embedder.name(),
                index.dimensions(),
                self.embedder.dimensions()
            );
        }
        Ok(index)
    }
}
