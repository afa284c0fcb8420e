//! Ollama embeddings implementation.

use super::Embedder;
use crate::error::{AppsterError, Result};
use crate::ollama::{create_client_with_timeout, endpoint, DEFAULT_TIMEOUT_SECS};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Option<Vec<f32>>,
}

/// Ollama-based embedder. Performs exactly one request per call; wrap it in
/// [`RetryingEmbedder`](super::RetryingEmbedder) for retries.
pub struct OllamaEmbedder {
    client: reqwest::Client,
    url: String,
    model: String,
}

impl OllamaEmbedder {
    /// Create a new embedder against a local Ollama with default settings.
    pub fn new() -> Result<Self> {
        Self::with_config(
            "http://localhost:11434",
            "bge-m3",
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Create a new embedder with custom base URL, model and timeout.
    pub fn with_config(base_url: &str, model: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: create_client_with_timeout(timeout)?,
            url: endpoint(base_url, "api/embeddings"),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    #[instrument(skip(self, text), fields(model = %self.model, len = text.len()))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self.client.post(&self.url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppsterError::Embedding(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let parsed: EmbeddingResponse = response.json().await?;
        let embedding = parsed
            .embedding
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AppsterError::Embedding("Response has no embedding".to_string()))?;

        debug!("Generated embedding with {} dimensions", embedding.len());
        Ok(embedding)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
