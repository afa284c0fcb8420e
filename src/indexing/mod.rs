//! Offline index building.
//!
//! Reads every transcript file in a directory, embeds each segment and writes
//! the resulting chunks as a persisted vector index. Segments whose embedding
//! fails after retries are skipped, as are files that cannot be parsed.

mod transcript;

pub use transcript::{list_transcripts, TranscriptFile, TranscriptSegment};

use crate::embedding::Embedder;
use crate::error::{AppsterError, Result};
use crate::vector_store::{save_index, Chunk};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Counts reported after an indexing run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IndexSummary {
    /// Transcript files that were read successfully.
    pub files_processed: usize,
    /// Transcript files that could not be read or parsed.
    pub files_skipped: usize,
    /// Chunks written to the index.
    pub chunks_indexed: usize,
    /// Segments dropped because no embedding could be produced.
    pub chunks_skipped: usize,
}

/// Builds a vector index from transcript files.
pub struct IndexBuilder {
    embedder: Arc<dyn Embedder>,
}

impl IndexBuilder {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    /// Embed every transcript in `dir`. `on_file` is called before each file.
    #[instrument(skip(self, dir, on_file), fields(dir = %dir.display()))]
    pub async fn build<F>(&self, dir: &Path, mut on_file: F) -> Result<(Vec<Chunk>, IndexSummary)>
    where
        F: FnMut(&Path, usize, usize),
    {
        if !dir.is_dir() {
            return Err(AppsterError::InvalidInput(format!(
                "Transcript directory not found: {}",
                dir.display()
            )));
        }

        let files = list_transcripts(dir)?;
        let mut summary = IndexSummary::default();
        let mut chunks = Vec::new();
        let mut next_id: i64 = 0;

        for (i, path) in files.iter().enumerate() {
            on_file(path, i, files.len());

            let transcript = match TranscriptFile::load(path) {
                Ok(t) => t,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "skipping transcript");
                    summary.files_skipped += 1;
                    continue;
                }
            };

            let number = transcript.source_number(path);
            let title = transcript.source_title(path);
            info!(
                "Creating embeddings for {} (source {}, {} segments)",
                title,
                number,
                transcript.chunks.len()
            );

            for segment in &transcript.chunks {
                if segment.text.trim().is_empty() {
                    continue;
                }

                match self.embedder.embed(&segment.text).await {
                    Ok(embedding) => {
                        chunks.push(Chunk {
                            id: next_id,
                            source_number: number.clone(),
                            title: segment.title.clone().unwrap_or_else(|| title.clone()),
                            text: segment.text.clone(),
                            start: segment.start,
                            end: segment.end,
                            embedding,
                        });
                        next_id += 1;
                        summary.chunks_indexed += 1;
                    }
                    Err(e) => {
                        warn!(file = %path.display(), start = segment.start, error = %e, "skipping segment");
                        summary.chunks_skipped += 1;
                    }
                }
            }

            summary.files_processed += 1;
        }

        Ok((chunks, summary))
    }

    /// Build from `dir` and write the index to `output`.
    pub async fn build_to<F>(&self, dir: &Path, output: &Path, on_file: F) -> Result<IndexSummary>
    where
        F: FnMut(&Path, usize, usize),
    {
        let (chunks, summary) = self.build(dir, on_file).await?;
        save_index(output, &chunks)?;
        info!(
            "Wrote {} chunks to {}",
            summary.chunks_indexed,
            output.display()
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::load_index;
    use async_trait::async_trait;

    /// Embeds by text length; fails for texts containing "fail".
    struct LengthEmbedder;

    #[async_trait]
    impl Embedder for LengthEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            if text.contains("fail") {
                return Err(AppsterError::EmbeddingUnavailable {
                    attempts: 3,
                    reason: "down".to_string(),
                });
            }
            Ok(vec![text.len() as f32, 1.0])
        }

        fn model(&self) -> &str {
            "length"
        }
    }

    fn write(dir: &Path, name: &str, body: serde_json::Value) {
        std::fs::write(dir.join(name), body.to_string()).unwrap();
    }

    #[tokio::test]
    async fn test_build_multi_file_index() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "2_Loops.json",
            serde_json::json!({
                "number": "2", "title": "Loops",
                "chunks": [
                    {"start": 0.0, "end": 4.0, "text": "for loops"},
                    {"start": 4.0, "end": 8.0, "text": "this will fail"}
                ]
            }),
        );
        write(
            dir.path(),
            "1_Intro.json",
            serde_json::json!({
                "number": "1", "title": "Intro",
                "chunks": [{"start": 0.0, "end": 3.0, "text": "welcome"}]
            }),
        );
        std::fs::write(dir.path().join("3_broken.json"), "{not json").unwrap();

        let builder = IndexBuilder::new(Arc::new(LengthEmbedder));
        let mut seen = Vec::new();
        let output = dir.path().join("out").join("embeddings.db");

        let summary = builder
            .build_to(dir.path(), &output, |path, _, _| {
                seen.push(path.file_name().unwrap().to_string_lossy().to_string())
            })
            .await
            .unwrap();

        assert_eq!(seen, vec!["1_Intro.json", "2_Loops.json", "3_broken.json"]);
        assert_eq!(
            summary,
            IndexSummary {
                files_processed: 2,
                files_skipped: 1,
                chunks_indexed: 2,
                chunks_skipped: 1,
            }
        );

        let index = load_index(&output).unwrap();
        let chunks = index.chunks();
        assert_eq!(chunks.len(), 2);
        assert_eq!((chunks[0].id, chunks[0].source_number.as_str()), (0, "001"));
        assert_eq!((chunks[1].id, chunks[1].title.as_str()), (1, "Loops"));
        assert_eq!(chunks[1].text, "for loops");
    }

    #[tokio::test]
    async fn test_missing_directory_is_error() {
        let builder = IndexBuilder::new(Arc::new(LengthEmbedder));
        let result = builder
            .build(Path::new("/definitely/not/here"), |_, _, _| {})
            .await;
        assert!(matches!(result, Err(AppsterError::InvalidInput(_))));
    }
}
