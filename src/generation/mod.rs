//! Text generation backed by an LLM service.
//!
//! Two layers: [`Generator`] implementations talk to a backend and report
//! failures as errors, while [`GenerationClient`] turns every failure into a
//! fixed fallback answer so a chat turn always completes.

mod ollama;

pub use ollama::OllamaGenerator;

use crate::config::Settings;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// Trait for text generation backends.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Model identifier sent with every request.
    fn model(&self) -> &str;
}

/// Generation front-end that never fails.
#[derive(Clone)]
pub struct GenerationClient {
    generator: Arc<dyn Generator>,
    fallback_message: String,
}

impl GenerationClient {
    pub fn new(generator: Arc<dyn Generator>, fallback_message: impl Into<String>) -> Self {
        Self {
            generator,
            fallback_message: fallback_message.into(),
        }
    }

    /// Build the configured Ollama generation client.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let generator = OllamaGenerator::with_config(
            &settings.ollama.base_url,
            &settings.generation.model,
            settings.ollama.timeout(),
        )?;
        Ok(Self::new(
            Arc::new(generator),
            settings.generation.fallback_message.clone(),
        ))
    }

    /// Generate an answer, or the fallback message if the backend fails.
    pub async fn generate(&self, prompt: &str) -> String {
        match self.generator.generate(prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, "generation failed, using fallback answer");
                self.fallback_message.clone()
            }
        }
    }

    /// Generate without the fallback, for callers that must tell failure apart.
    pub async fn try_generate(&self, prompt: &str) -> Result<String> {
        self.generator.generate(prompt).await
    }

    pub fn model(&self) -> &str {
        self.generator.model()
    }
}
