//! Transcript files consumed by the index builder.
//!
//! Each file holds the segments of one transcribed source:
//! `{"number": "12", "title": "...", "full_text": "...", "chunks": [{"start", "end", "text", ...}]}`.

use crate::error::{AppsterError, Result};
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// One transcript segment.
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptSegment {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub end: f64,
    pub text: String,
}

/// A parsed transcript file.
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptFile {
    #[serde(default)]
    pub video_number: Option<serde_json::Value>,
    #[serde(default)]
    pub number: Option<serde_json::Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub full_text: Option<String>,
    pub chunks: Vec<TranscriptSegment>,
}

impl TranscriptFile {
    /// Parse a transcript file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| AppsterError::Transcript {
            file: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Zero-padded source number, taken from the file contents or its name.
    pub fn source_number(&self, path: &Path) -> String {
        let from_field = self
            .video_number
            .as_ref()
            .or(self.number.as_ref())
            .map(|v| match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            });

        let raw = from_field.unwrap_or_else(|| file_stem(path));
        match first_number(&raw) {
            Some(n) => format!("{:0>3}", n),
            None => "unknown".to_string(),
        }
    }

    /// Title from the file contents, falling back to the file name.
    pub fn source_title(&self, path: &Path) -> String {
        self.title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| file_stem(path))
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn digits_regex() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    DIGITS.get_or_init(|| Regex::new(r"\d+").expect("static regex is valid"))
}

/// First run of ASCII digits in `text`.
fn first_number(text: &str) -> Option<&str> {
    digits_regex().find(text).map(|m| m.as_str())
}

/// List `*.json` files in `dir`, ordered by the first number in the file
/// name. Files without a number come last, ordered by name.
pub fn list_transcripts(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("json"))
        })
        .collect();

    files.sort_by_key(|p| {
        let name = p
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let number = first_number(&name).and_then(|n| n.parse::<u64>().ok());
        (number.is_none(), number.unwrap_or(0), name)
    });

    Ok(files)
}
