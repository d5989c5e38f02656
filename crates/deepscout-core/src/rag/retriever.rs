//! Document retrieval: chunk, embed, store, and search gathered documents.

use std::sync::Arc;

use chrono::Utc;
use deepscout_ai::EmbeddingProvider;
use deepscout_storage::{PutChunk, Storage, StoredChunk};
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::TextChunker;
use crate::error::Result;

const EF_SEARCH: usize = 64;

/// A retrieved chunk with its similarity score (1.0 = identical).
#[derive(Debug, Clone, Serialize)]
pub struct ScoredChunk {
    pub chunk: StoredChunk,
    pub score: f32,
}

/// RAG retriever over the embedded document store.
pub struct DocumentRetriever {
    embedder: Arc<dyn EmbeddingProvider>,
    storage: Arc<Storage>,
    chunker: TextChunker,
}

impl DocumentRetriever {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, storage: Arc<Storage>) -> Self {
        Self {
            embedder,
            storage,
            chunker: TextChunker::default(),
        }
    }

    pub fn with_chunker(mut self, chunker: TextChunker) -> Self {
        self.chunker = chunker;
        self
    }

    /// Chunk, deduplicate, embed, and store a document. Returns the number of
    /// newly indexed chunks (duplicates are skipped).
    pub async fn index_document(
        &self,
        content: &str,
        source_url: &str,
        title: Option<&str>,
    ) -> Result<usize> {
        let pieces = self.chunker.split(content);
        if pieces.is_empty() {
            return Ok(0);
        }

        let now_ms = Utc::now().timestamp_millis();
        let mut new_chunks = Vec::new();
        for (chunk_index, piece) in pieces.into_iter().enumerate() {
            let hash = content_hash(&piece);
            if self.storage.documents.find_by_hash(&hash)?.is_some() {
                continue;
            }
            new_chunks.push(StoredChunk {
                id: Uuid::new_v4().to_string(),
                content_hash: hash,
                content: piece,
                source_url: source_url.to_string(),
                title: title.map(str::to_string),
                chunk_index,
                created_at_ms: now_ms,
            });
        }

        if new_chunks.is_empty() {
            return Ok(0);
        }

        // Embed before storing anything; a failed embedding call must not
        // leave vectorless chunks behind that the hash index would then
        // treat as already indexed.
        let texts: Vec<String> = new_chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        let mut indexed = 0usize;
        for (chunk, embedding) in new_chunks.iter().zip(embeddings) {
            if let PutChunk::Created(_) = self.storage.documents.put_chunk(chunk)? {
                self.storage.vectors.add(&chunk.id, &embedding)?;
                indexed += 1;
            }
        }

        tracing::debug!(chunks = indexed, source_url, "Indexed document chunks");
        Ok(indexed)
    }

    /// The `k` chunks most similar to the query, best first.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        if self.storage.vectors.count() == 0 {
            return Ok(Vec::new());
        }

        let embedding = self.embedder.embed(query).await?;
        let hits = self.storage.vectors.search(&embedding, k, EF_SEARCH)?;

        let mut results = Vec::with_capacity(hits.len());
        for (chunk_id, distance) in hits {
            if let Some(chunk) = self.storage.documents.get_chunk(&chunk_id)? {
                results.push(ScoredChunk {
                    chunk,
                    score: 1.0 - distance,
                });
            }
        }
        Ok(results)
    }

    /// A formatted context block for the query, capped at `max_length` chars
    /// of chunk content.
    pub async fn context_for(&self, query: &str, k: usize, max_length: usize) -> Result<String> {
        let results = self.retrieve(query, k).await?;
        if results.is_empty() {
            return Ok("No relevant documents found.".to_string());
        }

        let mut parts = vec!["Retrieved Context:".to_string()];
        let mut used = 0usize;

        for (i, result) in results.iter().enumerate() {
            let content = &result.chunk.content;
            if used + content.len() > max_length {
                let remaining = max_length.saturating_sub(used);
                let mut end = remaining.min(content.len());
                while end > 0 && !content.is_char_boundary(end) {
                    end -= 1;
                }
                parts.push(format!("\n{}. {}...", i + 1, &content[..end]));
                break;
            }
            parts.push(format!("\n{}. {}", i + 1, content));
            used += content.len();
        }

        Ok(parts.join("\n"))
    }

    /// Number of indexed chunks.
    pub fn count(&self) -> Result<usize> {
        Ok(self.storage.documents.count()?)
    }

    /// Drop all indexed documents and their embeddings.
    pub fn clear(&self) -> Result<()> {
        self.storage.documents.clear()?;
        self.storage.vectors.clear()?;
        Ok(())
    }
}

/// SHA-256 of the content, hex encoded.
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
