//! Configuration settings for Appster.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub ollama: OllamaSettings,
    pub embedding: EmbeddingSettings,
    pub generation: GenerationSettings,
    pub index: IndexSettings,
    pub rag: RagSettings,
    pub memory: MemorySettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.appster".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

/// Connection settings for the Ollama server hosting both models.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaSettings {
    /// Base URL of the Ollama HTTP API.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl OllamaSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use.
    pub model: String,
    /// Maximum number of attempts per embedding request.
    pub max_attempts: u32,
    /// Delay between attempts in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "bge-m3".to_string(),
            max_attempts: 3,
            retry_delay_ms: 2000,
        }
    }
}

/// Answer generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// LLM model for response generation.
    pub model: String,
    /// Answer returned when the generation service fails.
    pub fallback_message: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: "llama3".to_string(),
            fallback_message: "Sorry, I couldn't generate a response right now.".to_string(),
        }
    }
}

/// Vector index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    /// Path to the persisted index (.db/.sqlite for SQLite, .json for JSON).
    pub path: String,
    /// Directory of transcript JSON files used by `appster index`.
    pub transcripts_dir: String,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            path: "~/.appster/embeddings.db".to_string(),
            transcripts_dir: "jsons".to_string(),
        }
    }
}

/// RAG (Retrieval-Augmented Generation) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    /// Number of chunks retrieved per question.
    pub top_k: usize,
    /// Top similarity score must exceed this for context to be used.
    pub context_threshold: f32,
    /// Number of context snippets returned alongside the answer.
    pub snippet_count: usize,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            top_k: 5,
            context_threshold: 0.45,
            snippet_count: 2,
        }
    }
}

/// Conversation memory settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemorySettings {
    /// Path to the plain-text memory file.
    pub path: String,
    /// Memory is summarized once it holds more than this many words.
    pub summarize_threshold_words: usize,
    /// Name the assistant uses in memory and prompts.
    pub assistant_name: String,
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self {
            path: "~/.appster/chat_history.txt".to_string(),
            summarize_threshold_words: 1200,
            assistant_name: "AppsterGPT".to_string(),
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let settings: Settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the query pipeline cannot work with.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::AppsterError;

        url::Url::parse(&self.ollama.base_url).map_err(|e| {
            AppsterError::Config(format!("ollama.base_url '{}': {}", self.ollama.base_url, e))
        })?;
        if self.embedding.max_attempts == 0 {
            return Err(AppsterError::Config(
                "embedding.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.rag.top_k == 0 {
            return Err(AppsterError::Config("rag.top_k must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::AppsterError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Set a single value by dotted key (e.g. "rag.top_k"), keeping the value's type.
    pub fn set_value(&self, key: &str, value: &str) -> crate::error::Result<Settings> {
        use crate::error::AppsterError;

        let mut root = toml::Value::try_from(self)
            .map_err(|e| AppsterError::Config(e.to_string()))?;

        let (section, field) = key
            .split_once('.')
            .ok_or_else(|| AppsterError::Config(format!("Expected 'section.key', got '{}'", key)))?;

        let table = root
            .get_mut(section)
            .and_then(|s| s.as_table_mut())
            .ok_or_else(|| AppsterError::Config(format!("Unknown section: {}", section)))?;

        let new_value = match table.get(field) {
            Some(toml::Value::Integer(_)) => value
                .parse::<i64>()
                .map(toml::Value::Integer)
                .map_err(|e| AppsterError::Config(format!("{}: {}", key, e)))?,
            Some(toml::Value::Float(_)) => value
                .parse::<f64>()
                .map(toml::Value::Float)
                .map_err(|e| AppsterError::Config(format!("{}: {}", key, e)))?,
            Some(toml::Value::Boolean(_)) => value
                .parse::<bool>()
                .map(toml::Value::Boolean)
                .map_err(|e| AppsterError::Config(format!("{}: {}", key, e)))?,
            Some(toml::Value::String(_)) => toml::Value::String(value.to_string()),
            // Optional fields are absent from the serialized tree while unset.
            None if key == "prompts.custom_dir" => toml::Value::String(value.to_string()),
            None => return Err(AppsterError::Config(format!("Unknown key: {}", key))),
            Some(_) => {
                return Err(AppsterError::Config(format!(
                    "{} cannot be set from the command line",
                    key
                )))
            }
        };
        table.insert(field.to_string(), new_value);

        let updated: Settings = root
            .try_into()
            .map_err(|e: toml::de::Error| AppsterError::Config(e.to_string()))?;
        updated.validate()?;
        Ok(updated)
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("appster")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded vector index path.
    pub fn index_path(&self) -> PathBuf {
        Self::expand_path(&self.index.path)
    }

    /// Get the expanded transcripts directory.
    pub fn transcripts_dir(&self) -> PathBuf {
        Self::expand_path(&self.index.transcripts_dir)
    }

    /// Get the expanded memory file path.
    pub fn memory_path(&self) -> PathBuf {
        Self::expand_path(&self.memory.path)
    }
}
