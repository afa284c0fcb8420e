//! Pre-flight checks before expensive operations.
//!
//! Catches missing files up front so a command fails with a useful hint
//! instead of midway through a turn.

use crate::config::Settings;
use crate::error::{AppsterError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Answering questions needs a built index.
    Ask,
    /// Searching needs a built index.
    Search,
    /// Indexing needs the transcripts directory.
    Index,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Ask | Operation::Search => check_index(settings),
        Operation::Index => check_transcripts(settings),
    }
}

fn check_index(settings: &Settings) -> Result<()> {
    let path = settings.index_path();
    if path.is_file() {
        Ok(())
    } else {
        Err(AppsterError::Config(format!(
            "Vector index not found at {}. Build it with: appster index",
            path.display()
        )))
    }
}

fn check_transcripts(settings: &Settings) -> Result<()> {
    let dir = settings.transcripts_dir();
    if dir.is_dir() {
        Ok(())
    } else {
        Err(AppsterError::Config(format!(
            "Transcript directory not found at {}. Pass --dir or set index.transcripts_dir",
            dir.display()
        )))
    }
}
