//! Retrieved context in a form ready for display.

use crate::vector_store::{Retrieval, ScoredChunk};
use serde::Serialize;

/// A retrieved chunk with formatted metadata.
#[derive(Debug, Clone, Serialize)]
pub struct ContextChunk {
    /// Chunk ID in the index.
    pub chunk_id: i64,
    /// Source number.
    pub number: String,
    /// Source title.
    pub title: String,
    /// Formatted timestamp (e.g., "02:34").
    pub timestamp: String,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    /// Text content.
    pub text: String,
    /// Similarity score.
    pub score: f32,
}

impl From<&ScoredChunk> for ContextChunk {
    fn from(scored: &ScoredChunk) -> Self {
        Self {
            chunk_id: scored.chunk.id,
            number: scored.chunk.source_number.clone(),
            title: scored.chunk.title.clone(),
            timestamp: scored.chunk.format_timestamp(),
            start: scored.chunk.start,
            end: scored.chunk.end,
            text: scored.chunk.text.clone(),
            score: scored.score,
        }
    }
}

/// Convert a retrieval into display chunks, keeping rank order.
pub fn from_retrieval(retrieval: &Retrieval) -> Vec<ContextChunk> {
    retrieval.matches.iter().map(ContextChunk::from).collect()
}

/// Format context chunks for display to the user.
pub fn format_context_for_display(chunks: &[ContextChunk]) -> String {
    chunks
        .iter()
        .map(|chunk| {
            format!(
                "[{}] {} @ {} (score: {:.2})",
                chunk.number, chunk.title, chunk.timestamp, chunk.score
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::{test_chunk, VectorIndex};

    #[test]
    fn test_from_retrieval_keeps_order() {
        let index = VectorIndex::new(vec![
            test_chunk(0, "far", vec![0.0, 1.0]),
            test_chunk(9, "near", vec![1.0, 0.0]),
        ])
        .unwrap();

        let chunks = from_retrieval(&index.top_k(&[1.0, 0.0], 5));
        assert_eq!(chunks[0].chunk_id, 9);
        assert_eq!(chunks[0].timestamp, "01:30");
        assert_eq!(chunks[1].text, "far");

        let display = format_context_for_display(&chunks);
        assert_eq!(
            display.lines().next(),
            Some("[001] Intro @ 01:30 (score: 1.00)")
        );
    }
}
