//! CLI output formatting utilities.

use crate::rag::ContextChunk;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print the assistant's reply.
    pub fn answer(assistant: &str, text: &str) {
        println!("\n{} {}\n", style(format!("{}:", assistant)).cyan().bold(), text);
    }

    /// Print a context snippet shown alongside an answer.
    pub fn snippet(index: usize, text: &str) {
        println!(
            "  {} {}",
            style(format!("[{}]", index)).dim(),
            preview(text, 300)
        );
    }

    /// Print one retrieved chunk.
    pub fn search_result(chunk: &ContextChunk) {
        println!(
            "\n{} {} {} @ {} (score: {:.2})",
            style(">>").green(),
            style(format!("[{}]", chunk.number)).dim(),
            style(&chunk.title).bold(),
            style(&chunk.timestamp).cyan(),
            chunk.score
        );
        println!("   {}", preview(&chunk.text, 200));
    }

    /// Create a progress bar.
    pub fn progress_bar(len: u64, msg: &str) -> ProgressBar {
        let pb = ProgressBar::new(len);
        if let Ok(bar_style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(bar_style.progress_chars("#>-"));
        }
        pb.set_message(msg.to_string());
        pb
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
        {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Collapse newlines and truncate at a char boundary.
pub(crate) fn preview(content: &str, max_chars: usize) -> String {
    let content = content.replace('\n', " ");
    if content.chars().count() <= max_chars {
        content
    } else {
        let truncated: String = content.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}
