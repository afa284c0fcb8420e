//! Configuration module for Appster.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::Prompts;
pub use settings::{
    EmbeddingSettings, GeneralSettings, GenerationSettings, IndexSettings, MemorySettings,
    OllamaSettings, PromptSettings, RagSettings, Settings,
};
