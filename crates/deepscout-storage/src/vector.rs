//! Vector storage using HNSW for approximate nearest neighbor search.
//!
//! Embeddings are persisted to redb for durability; the HNSW index itself is
//! in-memory and rebuilt from the persisted vectors on startup.

use anyhow::Result;
use hnsw_rs::prelude::*;
use parking_lot::RwLock;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::collections::HashMap;
use std::sync::Arc;

type VectorIndex = Hnsw<'static, f32, DistCosine>;

const DOC_VECTORS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("doc_vectors");

/// Configuration for vector storage.
#[derive(Debug, Clone)]
pub struct VectorConfig {
    /// Vector dimension (1536 for OpenAI text-embedding-3-small)
    pub dimension: usize,
    /// Maximum number of connections per node
    pub max_connections: usize,
    /// Search width during construction
    pub ef_construction: usize,
    /// Maximum elements to store
    pub max_elements: usize,
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            dimension: 1536,
            max_connections: 16,
            ef_construction: 200,
            max_elements: 100_000,
        }
    }
}

/// Chunk id <-> internal HNSW id mappings plus the id counter.
#[derive(Default)]
struct IdMaps {
    by_chunk: HashMap<String, usize>,
    by_vector: HashMap<usize, String>,
    next_id: usize,
}

/// Chunk embedding storage with an HNSW similarity index.
pub struct VectorStorage {
    db: Arc<Database>,
    config: VectorConfig,
    index: RwLock<VectorIndex>,
    ids: RwLock<IdMaps>,
}

impl VectorStorage {
    /// Create new vector storage, loading existing vectors from the DB.
    pub fn new(db: Arc<Database>, config: VectorConfig) -> Result<Self> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(DOC_VECTORS_TABLE)?;
        write_txn.commit()?;

        let storage = Self {
            db,
            index: RwLock::new(Self::empty_index(&config)),
            ids: RwLock::new(IdMaps::default()),
            config,
        };

        storage.rebuild_index()?;
        Ok(storage)
    }

    fn empty_index(config: &VectorConfig) -> VectorIndex {
        Hnsw::new(
            config.max_connections,
            config.max_elements,
            16,
            config.ef_construction,
            DistCosine,
        )
    }

    /// Add (or replace) the embedding for a chunk.
    pub fn add(&self, chunk_id: &str, vector: &[f32]) -> Result<()> {
        self.check_dimension(vector)?;

        if self.ids.read().by_chunk.contains_key(chunk_id) {
            self.delete(chunk_id)?;
        }

        let vector_id = {
            let mut ids = self.ids.write();
            let id = ids.next_id;
            ids.next_id += 1;
            ids.by_chunk.insert(chunk_id.to_string(), id);
            ids.by_vector.insert(id, chunk_id.to_string());
            id
        };

        self.index.read().insert((vector, vector_id));
        self.persist_vector(chunk_id, vector)
    }

    /// Delete a chunk's embedding. Returns false when none exists.
    ///
    /// The HNSW index cannot remove points in place, so deleted ids are only
    /// dropped from the mappings; the point stays unreachable until the next
    /// index rebuild.
    pub fn delete(&self, chunk_id: &str) -> Result<bool> {
        let removed = {
            let mut ids = self.ids.write();
            match ids.by_chunk.remove(chunk_id) {
                Some(vector_id) => {
                    ids.by_vector.remove(&vector_id);
                    true
                }
                None => return Ok(false),
            }
        };

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(DOC_VECTORS_TABLE)?;
            table.remove(chunk_id)?;
        }
        write_txn.commit()?;

        Ok(removed)
    }

    /// Search for the `top_k` most similar chunks. Returns (chunk_id, cosine
    /// distance) pairs, closest first.
    pub fn search(
        &self,
        query: &[f32],
        top_k: usize,
        ef_search: usize,
    ) -> Result<Vec<(String, f32)>> {
        self.check_dimension(query)?;

        let index = self.index.read();
        let ids = self.ids.read();
        let results = index.search(query, top_k, ef_search);
        Ok(results
            .into_iter()
            .filter_map(|item| {
                let chunk_id = ids.by_vector.get(&item.d_id)?;
                Some((chunk_id.clone(), item.distance))
            })
            .collect())
    }

    /// Check if a chunk has an embedding.
    pub fn has_vector(&self, chunk_id: &str) -> bool {
        self.ids.read().by_chunk.contains_key(chunk_id)
    }

    /// Number of indexed embeddings.
    pub fn count(&self) -> usize {
        self.ids.read().by_chunk.len()
    }

    /// Drop all embeddings and reset the index.
    pub fn clear(&self) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(DOC_VECTORS_TABLE)?;
            table.retain(|_, _| false)?;
        }
        write_txn.commit()?;

        *self.index.write() = Self::empty_index(&self.config);
        *self.ids.write() = IdMaps::default();
        Ok(())
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.config.dimension {
            anyhow::bail!(
                "Vector dimension mismatch: expected {}, got {}",
                self.config.dimension,
                vector.len()
            );
        }
        Ok(())
    }

    fn persist_vector(&self, chunk_id: &str, vector: &[f32]) -> Result<()> {
        let bytes = bincode::serde::encode_to_vec(vector, bincode::config::standard())?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(DOC_VECTORS_TABLE)?;
            table.insert(chunk_id, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn rebuild_index(&self) -> Result<()> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(DOC_VECTORS_TABLE)?;
        let mut vectors: Vec<(String, Vec<f32>)> = Vec::new();
        for item in table.iter()? {
            let (key, value) = item?;
            let (vector, _): (Vec<f32>, usize) =
                bincode::serde::decode_from_slice(value.value(), bincode::config::standard())?;
            vectors.push((key.value().to_string(), vector));
        }
        drop(read_txn);

        let mut index = self.index.write();
        let mut ids = self.ids.write();

        *index = Self::empty_index(&self.config);
        *ids = IdMaps::default();

        for (chunk_id, vector) in vectors {
            let vector_id = ids.next_id;
            ids.next_id += 1;
            index.insert((vector.as_slice(), vector_id));
            ids.by_chunk.insert(chunk_id.clone(), vector_id);
            ids.by_vector.insert(vector_id, chunk_id);
        }

        if ids.next_id > 0 {
            tracing::info!("Rebuilt vector index with {} vectors", ids.by_chunk.len());
        }
        Ok(())
    }
}
