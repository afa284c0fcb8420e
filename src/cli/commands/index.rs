//! Index command: embed transcript files into the vector index.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::embedding;
use crate::indexing::{list_transcripts, IndexBuilder};
use anyhow::Result;
use std::path::PathBuf;

/// Run the index command.
pub async fn run_index(
    dir: Option<PathBuf>,
    output: Option<PathBuf>,
    settings: Settings,
) -> Result<()> {
    if dir.is_none() {
        if let Err(e) = preflight::check(Operation::Index, &settings) {
            Output::error(&e.to_string());
            return Err(e.into());
        }
    }

    let dir = dir.unwrap_or_else(|| settings.transcripts_dir());
    let output = output.unwrap_or_else(|| settings.index_path());

    let total = list_transcripts(&dir)?.len();
    if total == 0 {
        Output::warning(&format!("No transcript files found in {}", dir.display()));
        return Ok(());
    }

    Output::info(&format!(
        "Indexing {} transcript file(s) from {} with {}",
        total,
        dir.display(),
        settings.embedding.model
    ));

    let builder = IndexBuilder::new(embedding::from_settings(&settings)?);
    let pb = Output::progress_bar(total as u64, "");

    let result = builder
        .build_to(&dir, &output, |path, i, _| {
            pb.set_position(i as u64);
            pb.set_message(
                path.file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default(),
            );
        })
        .await;
    pb.finish_and_clear();

    let summary = result?;
    Output::success(&format!("Wrote index to {}", output.display()));
    Output::kv("Files processed", &summary.files_processed.to_string());
    Output::kv("Chunks indexed", &summary.chunks_indexed.to_string());
    if summary.files_skipped > 0 {
        Output::warning(&format!("{} file(s) could not be parsed", summary.files_skipped));
    }
    if summary.chunks_skipped > 0 {
        Output::warning(&format!(
            "{} chunk(s) skipped after embedding failures",
            summary.chunks_skipped
        ));
    }

    Ok(())
}
