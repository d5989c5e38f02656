//! DeepScout Storage - embedded persistence layer
//!
//! Uses redb as the embedded database. The vector index (HNSW) lives in
//! memory and is rebuilt from persisted vectors on startup.
//!
//! # Tables
//!
//! - `doc_chunks` - Document chunks gathered during research
//! - `doc_hash_index` - Content hash -> chunk id, for deduplication
//! - `doc_vectors` - Chunk embeddings
//! - `sessions` - Completed research session records

pub mod documents;
pub mod paths;
pub mod sessions;
pub mod vector;

use anyhow::Result;
use redb::Database;
use std::path::Path;
use std::sync::Arc;

pub use documents::{DocumentStore, PutChunk, StoredChunk};
pub use paths::{database_path, ensure_deepscout_dir, resolve_deepscout_dir};
pub use sessions::{SessionRecord, SessionStore};
pub use vector::{VectorConfig, VectorStorage};

/// Central storage manager that initializes all storage subsystems
pub struct Storage {
    db: Arc<Database>,
    pub documents: DocumentStore,
    pub sessions: SessionStore,
    pub vectors: VectorStorage,
}

impl Storage {
    /// Open (or create) the database at the given path and initialize all
    /// tables.
    pub fn new(path: &Path, vector_config: VectorConfig) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Arc::new(Database::create(path)?);

        let documents = DocumentStore::new(db.clone())?;
        let sessions = SessionStore::new(db.clone())?;
        let vectors = VectorStorage::new(db.clone(), vector_config)?;

        Ok(Self {
            db,
            documents,
            sessions,
            vectors,
        })
    }

    /// Open the database at the default location.
    pub fn open_default(vector_config: VectorConfig) -> Result<Self> {
        Self::new(&database_path()?, vector_config)
    }

    /// Get a reference to the underlying database
    pub fn get_db(&self) -> Arc<Database> {
        self.db.clone()
    }
}
