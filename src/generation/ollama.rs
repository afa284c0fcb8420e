//! Ollama `/api/generate` implementation.

use super::Generator;
use crate::error::{AppsterError, Result};
use crate::ollama::{create_client_with_timeout, endpoint};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

/// Non-streaming Ollama text generator.
pub struct OllamaGenerator {
    client: reqwest::Client,
    url: String,
    model: String,
}

impl OllamaGenerator {
    /// Create a new generator with custom base URL, model and timeout.
    pub fn with_config(base_url: &str, model: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: create_client_with_timeout(timeout)?,
            url: endpoint(base_url, "api/generate"),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self.client.post(&self.url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppsterError::Generation(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let parsed: GenerateResponse = response.json().await?;
        let answer = parsed
            .response
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .ok_or_else(|| AppsterError::Generation("Empty response from LLM".to_string()))?;

        debug!("Generated {} characters", answer.len());
        Ok(answer)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
