//! Document chunk storage with content-hash deduplication.

use anyhow::Result;
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const DOC_CHUNKS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("doc_chunks");
/// content_hash -> chunk id
const DOC_HASH_INDEX_TABLE: TableDefinition<&str, &str> = TableDefinition::new("doc_hash_index");

/// A chunk of gathered document text with its provenance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredChunk {
    pub id: String,
    pub content: String,
    /// SHA-256 of the chunk content, hex encoded.
    pub content_hash: String,
    pub source_url: String,
    pub title: Option<String>,
    /// Position of this chunk within its source document.
    pub chunk_index: usize,
    pub created_at_ms: i64,
}

/// Result of storing a chunk.
#[derive(Debug, Clone, PartialEq)]
pub enum PutChunk {
    /// The chunk was written under this id.
    Created(String),
    /// Identical content was already stored under this id.
    Existing(String),
}

impl PutChunk {
    pub fn id(&self) -> &str {
        match self {
            PutChunk::Created(id) | PutChunk::Existing(id) => id,
        }
    }
}

/// Chunk persistence keyed by id, with a secondary hash index so identical
/// content fetched twice is stored once.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    db: Arc<Database>,
}

impl DocumentStore {
    pub fn new(db: Arc<Database>) -> Result<Self> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(DOC_CHUNKS_TABLE)?;
        write_txn.open_table(DOC_HASH_INDEX_TABLE)?;
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Store a chunk. When a chunk with the same content hash already exists,
    /// nothing is written and the existing chunk's id is returned.
    pub fn put_chunk(&self, chunk: &StoredChunk) -> Result<PutChunk> {
        if let Some(existing_id) = self.find_by_hash(&chunk.content_hash)? {
            tracing::debug!(
                chunk_id = %existing_id,
                "Skipping duplicate chunk (content hash already stored)"
            );
            return Ok(PutChunk::Existing(existing_id));
        }

        let bytes = bincode::serde::encode_to_vec(chunk, bincode::config::standard())?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(DOC_CHUNKS_TABLE)?;
            table.insert(chunk.id.as_str(), bytes.as_slice())?;
            let mut index = write_txn.open_table(DOC_HASH_INDEX_TABLE)?;
            index.insert(chunk.content_hash.as_str(), chunk.id.as_str())?;
        }
        write_txn.commit()?;
        Ok(PutChunk::Created(chunk.id.clone()))
    }

    /// Get a chunk by id.
    pub fn get_chunk(&self, id: &str) -> Result<Option<StoredChunk>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(DOC_CHUNKS_TABLE)?;

        match table.get(id)? {
            Some(data) => {
                let (chunk, _): (StoredChunk, usize) =
                    bincode::serde::decode_from_slice(data.value(), bincode::config::standard())?;
                Ok(Some(chunk))
            }
            None => Ok(None),
        }
    }

    /// Look up a chunk id by content hash.
    pub fn find_by_hash(&self, content_hash: &str) -> Result<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(DOC_HASH_INDEX_TABLE)?;
        Ok(index.get(content_hash)?.map(|v| v.value().to_string()))
    }

    /// List all stored chunks.
    pub fn list_chunks(&self) -> Result<Vec<StoredChunk>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(DOC_CHUNKS_TABLE)?;

        let mut chunks = Vec::new();
        for item in table.iter()? {
            let (_, value) = item?;
            let (chunk, _): (StoredChunk, usize) =
                bincode::serde::decode_from_slice(value.value(), bincode::config::standard())?;
            chunks.push(chunk);
        }
        Ok(chunks)
    }

    /// Delete a chunk and its hash index entry. Returns false when absent.
    pub fn delete_chunk(&self, id: &str) -> Result<bool> {
        let Some(chunk) = self.get_chunk(id)? else {
            return Ok(false);
        };

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(DOC_CHUNKS_TABLE)?;
            table.remove(id)?;
            let mut index = write_txn.open_table(DOC_HASH_INDEX_TABLE)?;
            index.remove(chunk.content_hash.as_str())?;
        }
        write_txn.commit()?;
        Ok(true)
    }

    /// Number of stored chunks.
    pub fn count(&self) -> Result<usize> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(DOC_CHUNKS_TABLE)?;
        Ok(table.len()? as usize)
    }

    /// Remove all chunks and hash index entries.
    pub fn clear(&self) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(DOC_CHUNKS_TABLE)?;
            table.retain(|_, _| false)?;
            let mut index = write_txn.open_table(DOC_HASH_INDEX_TABLE)?;
            index.retain(|_, _| false)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_store() -> (DocumentStore, tempfile::TempDir) {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Arc::new(Database::create(db_path).unwrap());
        (DocumentStore::new(db).unwrap(), temp_dir)
    }

    fn chunk(id: &str, content: &str, hash: &str) -> StoredChunk {
        StoredChunk {
            id: id.to_string(),
            content: content.to_string(),
            content_hash: hash.to_string(),
            source_url: "https://example.com/page".to_string(),
            title: Some("Example".to_string()),
            chunk_index: 0,
            created_at_ms: 1_700_000_000_000,
        }
    }

    #[test]
    fn put_and_get_roundtrip() {
        let (store, _dir) = test_store();
        let c = chunk("chunk-1", "some content", "hash-a");
        let result = store.put_chunk(&c).unwrap();
        assert_eq!(result, PutChunk::Created("chunk-1".to_string()));

        let loaded = store.get_chunk("chunk-1").unwrap().unwrap();
        assert_eq!(loaded, c);
    }

    #[test]
    fn duplicate_hash_returns_existing_id() {
        let (store, _dir) = test_store();
        store
            .put_chunk(&chunk("chunk-1", "same text", "hash-a"))
            .unwrap();

        let result = store
            .put_chunk(&chunk("chunk-2", "same text", "hash-a"))
            .unwrap();
        assert_eq!(result, PutChunk::Existing("chunk-1".to_string()));
        assert_eq!(store.count().unwrap(), 1);
        assert!(store.get_chunk("chunk-2").unwrap().is_none());
    }

    #[test]
    fn delete_clears_hash_index() {
        let (store, _dir) = test_store();
        store.put_chunk(&chunk("chunk-1", "text", "hash-a")).unwrap();

        assert!(store.delete_chunk("chunk-1").unwrap());
        assert!(store.find_by_hash("hash-a").unwrap().is_none());

        // Same content can be stored again after deletion.
        let result = store.put_chunk(&chunk("chunk-3", "text", "hash-a")).unwrap();
        assert_eq!(result.id(), "chunk-3");
    }

    #[test]
    fn list_returns_all_chunks() {
        let (store, _dir) = test_store();
        store.put_chunk(&chunk("chunk-1", "one", "hash-1")).unwrap();
        store.put_chunk(&chunk("chunk-2", "two", "hash-2")).unwrap();

        assert_eq!(store.list_chunks().unwrap().len(), 2);
    }

    #[test]
    fn clear_removes_everything() {
        let (store, _dir) = test_store();
        store.put_chunk(&chunk("chunk-1", "one", "hash-1")).unwrap();
        store.put_chunk(&chunk("chunk-2", "two", "hash-2")).unwrap();

        store.clear().unwrap();
        assert_eq!(store.count().unwrap(), 0);
        assert!(store.find_by_hash("hash-1").unwrap().is_none());
    }
}
