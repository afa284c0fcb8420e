//! Query orchestrator for Appster.
//!
//! Runs one user turn end to end: embed the question, retrieve context,
//! summarize memory when it has grown too large, compose the prompt, generate
//! the answer and persist the updated memory. Turns are strictly sequential;
//! the orchestrator is borrowed mutably for the whole turn.

use crate::config::{Prompts, RagSettings, Settings};
use crate::embedding::{self, Embedder};
use crate::error::{AppsterError, Result};
use crate::generation::GenerationClient;
use crate::memory::{ConversationMemory, MemoryStore};
use crate::rag::{
    context, ContextChunk, PromptComposer, DEFAULT_CONTEXT_THRESHOLD, DEFAULT_SNIPPET_COUNT,
};
use crate::vector_store::{load_index, VectorIndex, DEFAULT_TOP_K};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Question used to request a memory summary.
const SUMMARIZE_REQUEST: &str = "Summarize memory";

/// Stage of the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    Embedding,
    Retrieving,
    MaybeSummarizing,
    Composing,
    Generating,
    Persisting,
}

impl fmt::Display for TurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TurnState::Idle => "idle",
            TurnState::Embedding => "embedding",
            TurnState::Retrieving => "retrieving",
            TurnState::MaybeSummarizing => "maybe-summarizing",
            TurnState::Composing => "composing",
            TurnState::Generating => "generating",
            TurnState::Persisting => "persisting",
        };
        f.write_str(name)
    }
}

/// Retrieval knobs for a turn.
#[derive(Debug, Clone, Copy)]
pub struct RetrievalOptions {
    /// Number of chunks retrieved per question.
    pub top_k: usize,
    /// Top score must be strictly greater than this to use context.
    pub context_threshold: f32,
    /// Number of snippets returned with the answer.
    pub snippet_count: usize,
}

impl Default for RetrievalOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            context_threshold: DEFAULT_CONTEXT_THRESHOLD,
            snippet_count: DEFAULT_SNIPPET_COUNT,
        }
    }
}

impl From<&RagSettings> for RetrievalOptions {
    fn from(settings: &RagSettings) -> Self {
        Self {
            top_k: settings.top_k,
            context_threshold: settings.context_threshold,
            snippet_count: settings.snippet_count,
        }
    }
}

/// Outcome of a completed turn.
#[derive(Debug, Clone)]
pub struct TurnResponse {
    /// The generated answer, or the fallback message.
    pub answer: String,
    /// Whether retrieved context was included in the prompt.
    pub used_context: bool,
    /// Up to `snippet_count` retrieved chunk texts, best first.
    pub snippets: Vec<String>,
    /// Similarity of the best chunk (0.0 when nothing was retrieved).
    pub top_score: f32,
    /// Whether memory was summarized before answering.
    pub summarized: bool,
    /// All retrieved chunks, best first.
    pub sources: Vec<ContextChunk>,
}

/// The per-turn control loop.
pub struct Orchestrator {
    embedder: Arc<dyn Embedder>,
    generation: GenerationClient,
    index: Arc<VectorIndex>,
    memory: ConversationMemory,
    store: MemoryStore,
    composer: PromptComposer,
    options: RetrievalOptions,
    state: TurnState,
}

impl Orchestrator {
    /// Build the orchestrator from settings.
    ///
    /// Fails if the vector index cannot be loaded. An unreadable memory file
    /// is logged and treated as empty memory.
    pub fn new(settings: &Settings) -> Result<Self> {
        let index = Arc::new(load_index(&settings.index_path())?);
        info!(
            "Loaded vector index with {} chunks (dimension {})",
            index.len(),
            index.dimension()
        );
        Self::with_index(settings, index)
    }

    /// Build the orchestrator around an already loaded index.
    pub fn with_index(settings: &Settings, index: Arc<VectorIndex>) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let embedder = embedding::from_settings(settings)?;
        let generation = GenerationClient::from_settings(settings)?;

        let store = MemoryStore::new(settings.memory_path());
        let composer = PromptComposer::new(prompts, settings.memory.assistant_name.clone());

        Ok(Self::with_components(
            embedder,
            generation,
            index,
            store,
            composer,
            RetrievalOptions::from(&settings.rag),
            settings.memory.summarize_threshold_words,
        ))
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        embedder: Arc<dyn Embedder>,
        generation: GenerationClient,
        index: Arc<VectorIndex>,
        store: MemoryStore,
        composer: PromptComposer,
        options: RetrievalOptions,
        summarize_threshold: usize,
    ) -> Self {
        let text = match store.load() {
            Ok(text) => {
                if text.is_empty() {
                    info!("Starting new session (no history found)");
                } else {
                    info!("Loaded previous chat history");
                }
                text
            }
            Err(e) => {
                warn!(error = %e, "could not read memory, starting with empty memory");
                String::new()
            }
        };

        let memory = ConversationMemory::new(
            text,
            composer.assistant_name().to_string(),
            summarize_threshold,
        );

        Self {
            embedder,
            generation,
            index,
            memory,
            store,
            composer,
            options,
            state: TurnState::Idle,
        }
    }

    /// Answer one question.
    ///
    /// Rejects empty questions before any backend call. If the question cannot
    /// be embedded the turn is aborted with `EmbeddingUnavailable` and memory
    /// is left untouched. Generation failures never abort a turn.
    #[instrument(skip(self, question), fields(question_len = question.len()))]
    pub async fn submit_question(&mut self, question: &str) -> Result<TurnResponse> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AppsterError::EmptyQuestion);
        }

        let result = self.run_turn(question).await;
        self.transition(TurnState::Idle);
        result
    }

    async fn run_turn(&mut self, question: &str) -> Result<TurnResponse> {
        self.transition(TurnState::Embedding);
        let query = match self.embedder.embed(question).await {
            Ok(embedding) => embedding,
            Err(e @ AppsterError::EmbeddingUnavailable { .. }) => return Err(e),
            Err(e) => {
                return Err(AppsterError::EmbeddingUnavailable {
                    attempts: 1,
                    reason: e.to_string(),
                })
            }
        };

        self.transition(TurnState::Retrieving);
        let retrieval = self.index.top_k(&query, self.options.top_k);
        let top_score = retrieval.top_score();
        let used_context = top_score > self.options.context_threshold;
        let context_text = retrieval.context();
        debug!(top_score, used_context, "retrieved {} chunks", retrieval.matches.len());

        self.transition(TurnState::MaybeSummarizing);
        let summarized = if self.memory.needs_summarization() {
            self.summarize_memory().await
        } else {
            false
        };

        self.transition(TurnState::Composing);
        let prompt = self.composer.compose(
            self.memory.as_str(),
            &context_text,
            question,
            used_context,
            false,
        );

        self.transition(TurnState::Generating);
        let answer = self.generation.generate(&prompt).await;

        self.transition(TurnState::Persisting);
        self.memory.append(question, &answer);
        self.persist();

        Ok(TurnResponse {
            answer,
            used_context,
            snippets: retrieval.snippets(self.options.snippet_count),
            top_score,
            summarized,
            sources: context::from_retrieval(&retrieval),
        })
    }

    /// Replace the whole memory with a generated summary.
    ///
    /// Returns whether the memory was replaced. On generation failure the
    /// existing memory is kept.
    async fn summarize_memory(&mut self) -> bool {
        info!(
            words = self.memory.word_count(),
            "memory too long, summarizing"
        );

        let prompt = self
            .composer
            .compose(self.memory.as_str(), "", SUMMARIZE_REQUEST, false, true);

        match self.generation.try_generate(&prompt).await {
            Ok(summary) => {
                self.memory.replace(summary);
                self.persist();
                info!(words = self.memory.word_count(), "memory summarized");
                true
            }
            Err(e) => {
                warn!(error = %e, "memory summarization failed, keeping full memory");
                false
            }
        }
    }

    /// Save memory; failures are logged and the in-memory buffer stays authoritative.
    fn persist(&self) {
        if let Err(e) = self.store.save(self.memory.as_str()) {
            warn!(error = %e, "failed to persist conversation memory");
        }
    }

    fn transition(&mut self, next: TurnState) {
        debug!(from = %self.state, to = %next, "turn state");
        self.state = next;
    }

    /// Current conversation memory.
    pub fn history(&self) -> &str {
        self.memory.as_str()
    }

    /// Reset memory and persist the empty memory.
    pub fn clear_history(&mut self) {
        self.memory.clear();
        self.persist();
        info!("Conversation memory cleared");
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn index(&self) -> Arc<VectorIndex> {
        self.index.clone()
    }
}
