//! In-memory vector index.

use super::{cosine_similarity, Chunk, ScoredChunk};
use crate::error::{AppsterError, Result};
use tracing::{debug, warn};

/// Default number of chunks returned by [`VectorIndex::top_k`].
pub const DEFAULT_TOP_K: usize = 5;

/// Read-only collection of chunks sharing one embedding dimension.
#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    chunks: Vec<Chunk>,
    dimension: usize,
}

impl VectorIndex {
    /// Build an index, checking that every embedding has the same length.
    pub fn new(chunks: Vec<Chunk>) -> Result<Self> {
        let dimension = chunks.first().map(|c| c.embedding.len()).unwrap_or(0);

        if let Some(bad) = chunks.iter().find(|c| c.embedding.len() != dimension) {
            return Err(AppsterError::VectorIndex(format!(
                "chunk {} has embedding dimension {}, expected {}",
                bad.id,
                bad.embedding.len(),
                dimension
            )));
        }

        Ok(Self { chunks, dimension })
    }

    /// An index with no chunks.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Embedding dimension shared by all chunks (0 for an empty index).
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Rank every chunk by cosine similarity and keep the best `k`.
    ///
    /// Ties keep insertion order.
    pub fn top_k(&self, query: &[f32], k: usize) -> Retrieval {
        if !self.is_empty() && query.len() != self.dimension {
            warn!(
                query_dimension = query.len(),
                index_dimension = self.dimension,
                "query embedding dimension does not match index"
            );
        }

        let mut matches: Vec<ScoredChunk> = self
            .chunks
            .iter()
            .map(|chunk| ScoredChunk {
                chunk: chunk.clone(),
                score: cosine_similarity(query, &chunk.embedding),
            })
            .collect();

        // `sort_by` is stable
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(k);

        debug!("Retrieved {} of {} chunks", matches.len(), self.len());
        Retrieval { matches }
    }
}

/// Ranked result of a [`VectorIndex::top_k`] query.
#[derive(Debug, Clone, Default)]
pub struct Retrieval {
    /// Matches, best first.
    pub matches: Vec<ScoredChunk>,
}

impl Retrieval {
    /// Best similarity score, or 0.0 when nothing was retrieved.
    pub fn top_score(&self) -> f32 {
        self.matches.first().map(|m| m.score).unwrap_or(0.0)
    }

    /// Chunk texts joined by a blank line.
    pub fn context(&self) -> String {
        self.matches
            .iter()
            .map(|m| m.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Texts of the first `n` matches.
    pub fn snippets(&self, n: usize) -> Vec<String> {
        self.matches
            .iter()
            .take(n)
            .map(|m| m.chunk.text.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}
