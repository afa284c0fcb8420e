//! Error types for Appster.

use thiserror::Error;

/// Library-level error type for Appster operations.
#[derive(Error, Debug)]
pub enum AppsterError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Question is empty")]
    EmptyQuestion,

    #[error("Embedding service unavailable after {attempts} attempt(s): {reason}")]
    EmbeddingUnavailable { attempts: u32, reason: String },

    #[error("Embedding request failed: {0}")]
    Embedding(String),

    #[error("Generation request failed: {0}")]
    Generation(String),

    #[error("Failed to load vector index from {path}: {reason}")]
    IndexLoad { path: String, reason: String },

    #[error("Vector index error: {0}")]
    VectorIndex(String),

    #[error("Memory storage error: {0}")]
    MemoryIo(String),

    #[error("Invalid transcript {file}: {reason}")]
    Transcript { file: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Appster operations.
pub type Result<T> = std::result::Result<T, AppsterError>;
