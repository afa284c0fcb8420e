//! Vector index for Appster.
//!
//! The index lives in memory for the whole process and is loaded once from a
//! persisted table. Storage backends sit behind the [`IndexStorage`] trait.

mod json;
mod memory;
mod sqlite;

pub use json::JsonIndexStorage;
pub use memory::{Retrieval, VectorIndex, DEFAULT_TOP_K};
pub use sqlite::SqliteIndexStorage;

use crate::error::{AppsterError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A time-bounded segment of transcribed text with its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Sequential chunk ID across the whole index.
    #[serde(rename = "chunk_id")]
    pub id: i64,
    /// Source number (e.g. lecture or episode number, zero-padded).
    #[serde(rename = "number")]
    pub source_number: String,
    /// Source title.
    pub title: String,
    /// Text content of this chunk.
    pub text: String,
    /// Start time in the source (seconds).
    pub start: f64,
    /// End time in the source (seconds).
    pub end: f64,
    /// Embedding vector.
    pub embedding: Vec<f32>,
}

impl Chunk {
    /// Format the start timestamp for display.
    pub fn format_timestamp(&self) -> String {
        let total_seconds = self.start.max(0.0) as u32;
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let secs = total_seconds % 60;

        if hours > 0 {
            format!("{:02}:{:02}:{:02}", hours, minutes, secs)
        } else {
            format!("{:02}:{:02}", minutes, secs)
        }
    }
}

/// A chunk with its similarity to a query.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// The matched chunk.
    pub chunk: Chunk,
    /// Cosine similarity (higher is better).
    pub score: f32,
}

/// Persisted form of a vector index.
pub trait IndexStorage {
    /// Read every chunk, in insertion order.
    fn load(&self) -> Result<Vec<Chunk>>;

    /// Replace the persisted table with `chunks`.
    fn save(&self, chunks: &[Chunk]) -> Result<()>;
}

/// Pick the storage backend from the file extension.
pub fn storage_for(path: &Path) -> Result<Box<dyn IndexStorage>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "db" | "sqlite" | "sqlite3" => Ok(Box::new(SqliteIndexStorage::new(path))),
        "json" => Ok(Box::new(JsonIndexStorage::new(path))),
        _ => Err(AppsterError::InvalidInput(format!(
            "Unsupported index format '{}' (expected .db, .sqlite, .sqlite3 or .json)",
            path.display()
        ))),
    }
}

/// Load a vector index from disk. Any failure is an `IndexLoad` error.
pub fn load_index(path: &Path) -> Result<VectorIndex> {
    let to_load_error = |e: AppsterError| AppsterError::IndexLoad {
        path: path.display().to_string(),
        reason: e.to_string(),
    };

    if !path.exists() {
        return Err(AppsterError::IndexLoad {
            path: path.display().to_string(),
            reason: "file does not exist".to_string(),
        });
    }

    let storage = storage_for(path).map_err(to_load_error)?;
    let chunks = storage.load().map_err(to_load_error)?;
    VectorIndex::new(chunks).map_err(to_load_error)
}

/// Persist chunks to disk in the format implied by the extension.
pub fn save_index(path: &Path, chunks: &[Chunk]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    storage_for(path)?.save(chunks)
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
pub(crate) fn test_chunk(id: i64, text: &str, embedding: Vec<f32>) -> Chunk {
    Chunk {
        id,
        source_number: "001".to_string(),
        title: "Intro".to_string(),
        text: text.to_string(),
        start: id as f64 * 10.0,
        end: id as f64 * 10.0 + 10.0,
        embedding,
    }
}
