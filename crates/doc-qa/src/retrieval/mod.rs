//! Retrieval module: vector index, index builder and query engine

mod index;
mod query;

pub use index::{cosine_similarity, l2_norm, IndexBuilder, ScoredChunk, VectorIndex};
pub use query::{QueryAnswer, QueryEngine, EMPTY_RESPONSE};
