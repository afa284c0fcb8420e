//! Embedding generation for semantic search and retrieval.

mod ollama;
mod retry;

pub use ollama::OllamaEmbedder;
pub use retry::{RetryPolicy, RetryingEmbedder};

use crate::config::Settings;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Trait for embedding generation.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Model identifier sent with every request.
    fn model(&self) -> &str;
}

/// Build the configured embedder: the Ollama client wrapped in the retry policy.
pub fn from_settings(settings: &Settings) -> Result<Arc<dyn Embedder>> {
    let client = OllamaEmbedder::with_config(
        &settings.ollama.base_url,
        &settings.embedding.model,
        settings.ollama.timeout(),
    )?;
    let policy = RetryPolicy::from_settings(&settings.embedding);
    Ok(Arc::new(RetryingEmbedder::new(Arc::new(client), policy)))
}
