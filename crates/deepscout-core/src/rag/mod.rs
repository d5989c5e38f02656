//! RAG layer: text chunking and embedded-document retrieval.

mod chunker;
mod retriever;

pub use chunker::TextChunker;
pub use retriever::{DocumentRetriever, ScoredChunk, content_hash};
