//! RAG (Retrieval-Augmented Generation) building blocks.
//!
//! Intent classification and prompt assembly, plus display helpers for
//! retrieved context. The per-turn control loop lives in the orchestrator.

pub mod context;
mod prompt;

pub use context::ContextChunk;
pub use prompt::{Intent, PromptComposer, QUESTION_GENERATION_KEYWORDS};

/// Similarity the best chunk must exceed for context to be included.
pub const DEFAULT_CONTEXT_THRESHOLD: f32 = 0.45;

/// Number of context snippets returned with each answer.
pub const DEFAULT_SNIPPET_COUNT: usize = 2;
