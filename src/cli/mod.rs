//! CLI module for Appster.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Appster - ask questions about your course transcripts
///
/// Retrieval-augmented answers from a local Ollama server, with a persistent
/// conversation memory that is summarized when it grows too long.
#[derive(Parser, Debug)]
#[command(name = "appster")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "APPSTER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the data directory and a default config file
    Init,

    /// Check Ollama, models, index and memory file
    Doctor,

    /// Ask a single question
    Ask {
        /// The question to ask
        question: String,
    },

    /// Start an interactive chat session
    Chat,

    /// Search the index without generating an answer
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// Show or clear the conversation memory
    History {
        /// Clear the memory instead of printing it
        #[arg(long)]
        clear: bool,
    },

    /// Build the vector index from transcript files
    Index {
        /// Directory containing transcript JSON files
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Output index file (.db, .sqlite or .json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start the HTTP chat API
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8000")]
        port: u16,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "generation.model")
        key: String,
        /// Configuration value
        value: String,
    },

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
