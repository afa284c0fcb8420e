//! Appster - retrieval-augmented chat over course transcripts
//!
//! Answers questions about a transcribed course using a local Ollama server,
//! and keeps a rolling conversation memory that is summarized when it grows
//! too long.
//!
//! # Overview
//!
//! Appster allows you to:
//! - Build a vector index from transcript JSON files
//! - Ask questions and get answers grounded in the closest transcript chunks
//! - Generate interview and quiz questions from the course material
//! - Chat interactively or over a small HTTP API, with memory kept on disk
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `ollama` - Shared HTTP client setup for the Ollama API
//! - `embedding` - Embedding client with retry
//! - `generation` - Text generation client with a fallback answer
//! - `vector_store` - In-memory vector index and its persisted forms
//! - `memory` - Persistent conversation memory
//! - `rag` - Intent classification and prompt composition
//! - `indexing` - Offline index building from transcripts
//! - `orchestrator` - The per-turn control loop
//!
//! # Example
//!
//! ```rust,no_run
//! use appster::config::Settings;
//! use appster::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let mut orchestrator = Orchestrator::new(&settings)?;
//!
//!     let turn = orchestrator.submit_question("What is a closure?").await?;
//!     println!("{}", turn.answer);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod indexing;
pub mod memory;
pub mod ollama;
pub mod orchestrator;
pub mod rag;
pub mod vector_store;

pub use error::{AppsterError, Result};
