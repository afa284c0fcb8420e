//! Bounded retry for embedding requests.

use super::Embedder;
use crate::config::EmbeddingSettings;
use crate::error::{AppsterError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{instrument, warn};

/// How many times to try an embedding request and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Always at least 1.
    pub max_attempts: u32,
    /// Fixed delay between consecutive attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Retry without waiting between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }

    pub fn from_settings(settings: &EmbeddingSettings) -> Self {
        Self::new(
            settings.max_attempts,
            Duration::from_millis(settings.retry_delay_ms),
        )
    }
}

/// Embedder wrapper that retries the inner embedder according to a [`RetryPolicy`].
///
/// Any failure of the inner embedder counts as a failed attempt. Once all
/// attempts are used up the call fails with `EmbeddingUnavailable`.
pub struct RetryingEmbedder {
    inner: Arc<dyn Embedder>,
    policy: RetryPolicy,
}

impl RetryingEmbedder {
    pub fn new(inner: Arc<dyn Embedder>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl Embedder for RetryingEmbedder {
    #[instrument(skip(self, text), fields(max_attempts = self.policy.max_attempts))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut last_error = String::new();

        for attempt in 1..=self.policy.max_attempts {
            if attempt > 1 && !self.policy.delay.is_zero() {
                tokio::time::sleep(self.policy.delay).await;
            }

            match self.inner.embed(text).await {
                Ok(embedding) => return Ok(embedding),
                Err(e) => {
                    warn!(attempt, error = %e, "embedding attempt failed");
                    last_error = e.to_string();
                }
            }
        }

        Err(AppsterError::EmbeddingUnavailable {
            attempts: self.policy.max_attempts,
            reason: last_error,
        })
    }

    fn model(&self) -> &str {
        self.inner.model()
    }
}
