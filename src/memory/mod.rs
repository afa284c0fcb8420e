//! Conversation memory.
//!
//! Memory is one flat text blob. Each turn appends a `User:` / assistant pair;
//! once the blob grows past a word threshold the orchestrator replaces it
//! wholesale with a generated summary.

use crate::error::{AppsterError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Default word count above which memory is summarized.
pub const DEFAULT_SUMMARIZE_THRESHOLD: usize = 1200;

/// Number of whitespace-delimited words in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// True when `text` holds more than `threshold` words.
pub fn needs_summarization(text: &str, threshold: usize) -> bool {
    word_count(text) > threshold
}

/// Plain-text file holding the persisted memory.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    path: PathBuf,
}

impl MemoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read persisted memory, trimmed. A missing file is empty memory.
    pub fn load(&self) -> Result<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(text.trim().to_string()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(AppsterError::MemoryIo(format!(
                "failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    /// Overwrite persisted memory with the trimmed text.
    ///
    /// Writes a sibling temporary file and renames it over the target, so
    /// readers see either the previous or the new content.
    #[instrument(skip(self, text), fields(path = %self.path.display(), len = text.len()))]
    pub fn save(&self, text: &str) -> Result<()> {
        let to_memory_error = |e: std::io::Error| {
            AppsterError::MemoryIo(format!("failed to write {}: {}", self.path.display(), e))
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(to_memory_error)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(to_memory_error)?;
        tmp.write_all(text.trim().as_bytes()).map_err(to_memory_error)?;
        tmp.as_file().sync_all().map_err(to_memory_error)?;
        tmp.persist(&self.path).map_err(|e| to_memory_error(e.error))?;

        debug!("Saved conversation memory");
        Ok(())
    }
}

/// In-process memory buffer.
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    text: String,
    assistant_name: String,
    summarize_threshold: usize,
}

impl ConversationMemory {
    pub fn new(
        text: impl Into<String>,
        assistant_name: impl Into<String>,
        summarize_threshold: usize,
    ) -> Self {
        Self {
            text: text.into(),
            assistant_name: assistant_name.into(),
            summarize_threshold,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn assistant_name(&self) -> &str {
        &self.assistant_name
    }

    pub fn word_count(&self) -> usize {
        word_count(&self.text)
    }

    pub fn needs_summarization(&self) -> bool {
        needs_summarization(&self.text, self.summarize_threshold)
    }

    /// Append one question/answer turn.
    pub fn append(&mut self, question: &str, answer: &str) {
        self.text.push_str(&format!(
            "\nUser: {}\n{}: {}\n",
            question, self.assistant_name, answer
        ));
    }

    /// Replace the entire buffer, e.g. with a summary.
    pub fn replace(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_summarization_boundary() {
        assert!(!needs_summarization(&words(1200), DEFAULT_SUMMARIZE_THRESHOLD));
        assert!(needs_summarization(&words(1201), DEFAULT_SUMMARIZE_THRESHOLD));
        assert!(!needs_summarization("", DEFAULT_SUMMARIZE_THRESHOLD));
    }

    #[test]
    fn test_word_count_uses_any_whitespace() {
        assert_eq!(word_count("  one\ttwo\n\nthree  "), 3);
        assert_eq!(word_count("   "), 0);
    }

    #[test]
    fn test_append_format() {
        let mut memory = ConversationMemory::new("", "AppsterGPT", 1200);
        memory.append("What is Rust?", "A language.");
        assert_eq!(
            memory.as_str(),
            "\nUser: What is Rust?\nAppsterGPT: A language.\n"
        );

        memory.append("Fast?", "Yes.");
        assert!(memory.as_str().ends_with("\nUser: Fast?\nAppsterGPT: Yes.\n"));
        assert_eq!(memory.word_count(), 11);
    }

    #[test]
    fn test_replace_and_clear() {
        let mut memory = ConversationMemory::new(words(1300), "Bot", 1200);
        assert!(memory.needs_summarization());

        memory.replace("short summary");
        assert_eq!(memory.as_str(), "short summary");
        assert!(!memory.needs_summarization());

        memory.clear();
        assert_eq!(memory.as_str(), "");
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new(dir.path().join("chat_history.txt"));
        assert_eq!(store.load().unwrap(), "");
    }

    #[test]
    fn test_save_trims_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new(dir.path().join("nested").join("chat_history.txt"));

        store.save("\nUser: hi\nBot: hello\n").unwrap();
        assert_eq!(store.load().unwrap(), "User: hi\nBot: hello");

        store.save("").unwrap();
        assert_eq!(store.load().unwrap(), "");
        assert!(store.path().exists());
    }

    #[test]
    fn test_save_of_load_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat_history.txt");
        std::fs::write(&path, "User: a\nBot: b").unwrap();

        let store = MemoryStore::new(&path);
        let loaded = store.load().unwrap();
        store.save(&loaded).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "User: a\nBot: b");
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new(dir.path().join("chat_history.txt"));
        store.save("one").unwrap();
        store.save("two").unwrap();

        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }
}
