//! Search command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::embedding;
use crate::rag::context;
use crate::vector_store::load_index;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(query: &str, limit: usize, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Search, &settings) {
        Output::error(&e.to_string());
        return Err(e.into());
    }

    let index = load_index(&settings.index_path())?;
    let embedder = embedding::from_settings(&settings)?;

    let spinner = Output::spinner("Searching...");
    let query_embedding = embedder.embed(query).await;
    spinner.finish_and_clear();

    let query_embedding = match query_embedding {
        Ok(e) => e,
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    };

    let retrieval = index.top_k(&query_embedding, limit.max(1));
    let chunks = context::from_retrieval(&retrieval);

    if chunks.is_empty() {
        Output::warning("The index is empty.");
    } else {
        Output::success(&format!("Top {} results", chunks.len()));
        for chunk in &chunks {
            Output::search_result(chunk);
        }
        println!();
    }

    Ok(())
}
