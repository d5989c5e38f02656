//! DeepScout Core - research pipeline orchestration
//!
//! Ties the AI layer (planner, ReAct agent, report generation) to the
//! persistence layer (sessions, RAG document store) behind the
//! [`ResearchSystem`] facade.

pub mod config;
pub mod error;
pub mod memory;
pub mod pipeline;
pub mod plan;
pub mod planner;
pub mod rag;
pub mod report;
pub mod system;

pub use config::{ResearchConfig, Settings};
pub use error::{CoreError, Result};
pub use memory::{
    MemoryItem, MemoryKind, MemoryManager, SessionSummary, ShortTermMemory, WorkingMemory,
};
pub use pipeline::{ResearchOutcome, ResearchPipeline};
pub use plan::{Depth, Plan};
pub use planner::Planner;
pub use rag::{DocumentRetriever, ScoredChunk, TextChunker};
pub use report::ReportGenerator;
pub use system::ResearchSystem;

pub use deepscout_storage::SessionRecord;
