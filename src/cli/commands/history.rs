//! History command: print or clear the conversation memory.

use crate::cli::Output;
use crate::config::Settings;
use crate::memory::{word_count, MemoryStore};
use anyhow::Result;

/// Run the history command.
pub fn run_history(clear: bool, settings: &Settings) -> Result<()> {
    let store = MemoryStore::new(settings.memory_path());

    if clear {
        store.save("")?;
        Output::success("Conversation memory cleared.");
        return Ok(());
    }

    let text = store.load()?;
    if text.is_empty() {
        Output::info("No conversation history yet.");
        return Ok(());
    }

    Output::header("Conversation Memory");
    Output::kv("File", &store.path().display().to_string());
    Output::kv("Words", &word_count(&text).to_string());
    println!("\n{}\n", text);
    Ok(())
}
