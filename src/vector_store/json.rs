//! JSON index storage: one array of chunk rows.

use super::{Chunk, IndexStorage};
use crate::error::Result;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Index stored as a JSON array of `{chunk_id, number, title, text, start, end, embedding}`.
pub struct JsonIndexStorage {
    path: PathBuf,
}

impl JsonIndexStorage {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl IndexStorage for JsonIndexStorage {
    fn load(&self) -> Result<Vec<Chunk>> {
        let file = std::fs::File::open(&self.path)?;
        let chunks: Vec<Chunk> = serde_json::from_reader(BufReader::new(file))?;
        info!("Loaded {} chunks from JSON index", chunks.len());
        Ok(chunks)
    }

    fn save(&self, chunks: &[Chunk]) -> Result<()> {
        let file = std::fs::File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, chunks)?;
        writer.flush()?;
        info!("Saved {} chunks to JSON index", chunks.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_uses_persisted_column_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        std::fs::write(
            &path,
            r#"[{"chunk_id": 7, "number": "012", "title": "Loops", "text": "for loops",
                "start": 1.5, "end": 4.0, "embedding": [0.5, 0.5]}]"#,
        )
        .unwrap();

        let chunks = JsonIndexStorage::new(&path).load().unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].id, 7);
        assert_eq!(chunks[0].source_number, "012");
        assert_eq!(chunks[0].embedding, vec![0.5, 0.5]);
    }

    #[test]
    fn test_load_corrupt_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        std::fs::write(&path, "[{\"chunk_id\": ").unwrap();

        assert!(JsonIndexStorage::new(&path).load().is_err());
    }
}
