//! SQLite-backed index storage.
//!
//! Embeddings are stored as little-endian `f32` blobs and similarity is
//! computed in Rust after the whole table is loaded.

use super::{Chunk, IndexStorage};
use crate::error::{AppsterError, Result};
use rusqlite::{params, Connection, OpenFlags};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS chunks (
        chunk_id INTEGER PRIMARY KEY,
        number TEXT NOT NULL,
        title TEXT NOT NULL,
        text TEXT NOT NULL,
        start REAL NOT NULL,
        "end" REAL NOT NULL,
        embedding BLOB NOT NULL
    );
"#;

/// Index table stored in a SQLite database file.
pub struct SqliteIndexStorage {
    path: PathBuf,
}

impl SqliteIndexStorage {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Serialize embedding to bytes.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize embedding from bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Result<Vec<f32>> {
        if bytes.len() % 4 != 0 {
            return Err(AppsterError::VectorIndex(format!(
                "embedding blob of {} bytes is not a whole number of f32 values",
                bytes.len()
            )));
        }
        Ok(bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect())
    }
}

impl IndexStorage for SqliteIndexStorage {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Result<Vec<Chunk>> {
        // Read-only so a missing file is never created as an empty database
        let conn = Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;

        let mut stmt = conn.prepare(
            r#"
            SELECT chunk_id, number, title, text, start, "end", embedding
            FROM chunks
            ORDER BY rowid
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, f64>(4)?,
                row.get::<_, f64>(5)?,
                row.get::<_, Vec<u8>>(6)?,
            ))
        })?;

        let mut chunks = Vec::new();
        for row in rows {
            let (id, source_number, title, text, start, end, blob) = row?;
            chunks.push(Chunk {
                id,
                source_number,
                title,
                text,
                start,
                end,
                embedding: Self::bytes_to_embedding(&blob)?,
            });
        }

        info!("Loaded {} chunks from SQLite index", chunks.len());
        Ok(chunks)
    }

    #[instrument(skip(self, chunks), fields(path = %self.path.display(), count = chunks.len()))]
    fn save(&self, chunks: &[Chunk]) -> Result<()> {
        let conn = Connection::open(&self.path)?;

        let tx = conn.unchecked_transaction()?;
        tx.execute_batch("DROP TABLE IF EXISTS chunks;")?;
        tx.execute_batch(SCHEMA)?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO chunks (chunk_id, number, title, text, start, "end", embedding)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )?;

            for chunk in chunks {
                stmt.execute(params![
                    chunk.id,
                    chunk.source_number,
                    chunk.title,
                    chunk.text,
                    chunk.start,
                    chunk.end,
                    Self::embedding_to_bytes(&chunk.embedding),
                ])?;
            }
        }

        tx.commit()?;
        info!("Saved {} chunks to SQLite index", chunks.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::test_chunk;

    #[test]
    fn test_embedding_bytes_round_trip() {
        let embedding = vec![0.5f32, -1.25, 3.0];
        let bytes = SqliteIndexStorage::embedding_to_bytes(&embedding);
        assert_eq!(bytes.len(), 12);
        assert_eq!(
            SqliteIndexStorage::bytes_to_embedding(&bytes).unwrap(),
            embedding
        );
        assert!(SqliteIndexStorage::bytes_to_embedding(&bytes[..5]).is_err());
    }

    #[test]
    fn test_save_replaces_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SqliteIndexStorage::new(&dir.path().join("index.db"));

        storage
            .save(&[
                test_chunk(0, "old a", vec![1.0]),
                test_chunk(1, "old b", vec![1.0]),
            ])
            .unwrap();
        storage.save(&[test_chunk(0, "new", vec![2.0])]).unwrap();

        let chunks = storage.load().unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "new");
        assert_eq!(chunks[0].embedding, vec![2.0]);
    }

    #[test]
    fn test_load_corrupt_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.db");
        std::fs::write(&path, b"definitely not sqlite").unwrap();

        assert!(SqliteIndexStorage::new(&path).load().is_err());
    }

    #[test]
    fn test_load_without_table_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.db");
        Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE other (x INTEGER);")
            .unwrap();

        assert!(SqliteIndexStorage::new(&path).load().is_err());
    }
}
