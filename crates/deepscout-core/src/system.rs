//! The top-level facade tying settings, memory, storage, and the pipeline
//! together.

use std::path::PathBuf;
use std::sync::Arc;

use deepscout_ai::llm::ModelRouter;
use deepscout_ai::{FetchPageTool, OpenAiEmbedding, ToolRegistry, WebSearchTool};
use deepscout_storage::{SessionRecord, Storage, VectorConfig};

use crate::config::{ResearchConfig, Settings};
use crate::error::Result;
use crate::memory::{MemoryManager, SessionSummary};
use crate::pipeline::{ResearchOutcome, ResearchPipeline};
use crate::rag::DocumentRetriever;

/// Owns every long-lived component of the research system.
pub struct ResearchSystem {
    settings: Settings,
    config: ResearchConfig,
    router: ModelRouter,
    memory: MemoryManager,
    storage: Arc<Storage>,
    retriever: Option<Arc<DocumentRetriever>>,
    tools: Arc<ToolRegistry>,
}

impl ResearchSystem {
    /// Build the system. `db_path` overrides the default database location.
    pub fn new(
        settings: Settings,
        config: ResearchConfig,
        db_path: Option<PathBuf>,
    ) -> Result<Self> {
        let storage = Arc::new(match db_path {
            Some(path) => Storage::new(&path, VectorConfig::default())?,
            None => Storage::open_default(VectorConfig::default())?,
        });

        let router = ModelRouter::new(settings.router_config());
        let memory = MemoryManager::new(
            settings.max_working_memory,
            settings.max_short_term_memory,
        );

        // RAG needs the OpenAI embeddings API; without a key it is disabled
        // rather than failing every run.
        let retriever = if config.enable_rag {
            match &settings.openai_api_key {
                Some(key) => {
                    let embedder = Arc::new(OpenAiEmbedding::new(key.clone(), None));
                    Some(Arc::new(DocumentRetriever::new(embedder, storage.clone())))
                }
                None => {
                    tracing::warn!("RAG disabled: OPENAI_API_KEY not set");
                    None
                }
            }
        } else {
            None
        };

        let mut tools = ToolRegistry::new();
        let mut search = WebSearchTool::new();
        if let Some(key) = &settings.tavily_api_key {
            search = search.with_tavily_key(key.clone());
        }
        tools.register(search);
        tools.register(FetchPageTool::new());

        tracing::info!(
            provider = config.provider.as_str(),
            rag = retriever.is_some(),
            "Research system initialized"
        );

        Ok(Self {
            settings,
            config,
            router,
            memory,
            storage,
            retriever,
            tools: Arc::new(tools),
        })
    }

    /// Run a full research session for the query.
    pub async fn research(&mut self, query: &str) -> Result<ResearchOutcome> {
        let llm = self
            .router
            .client(self.config.provider, self.config.model.as_deref())?;
        let pipeline = ResearchPipeline::new(
            llm.clone(),
            llm,
            self.tools.clone(),
            self.config.clone(),
        );

        pipeline
            .run(
                query,
                &mut self.memory,
                self.retriever.as_deref(),
                Some(&self.storage.sessions),
            )
            .await
    }

    /// The combined memory context block.
    pub fn memory_context(&self) -> String {
        self.memory.context()
    }

    /// Reset working and short-term memory.
    pub fn clear_memory(&mut self) {
        self.memory.reset();
        tracing::info!("Memory cleared");
    }

    /// Past in-memory sessions most similar to the query.
    pub fn similar_sessions(&self, query: &str, top_k: usize) -> Vec<(&SessionSummary, f64)> {
        self.memory.short_term.find_similar(query, top_k)
    }

    /// Recently persisted sessions, newest first.
    pub fn recent_sessions(&self, n: usize) -> Result<Vec<SessionRecord>> {
        Ok(self.storage.sessions.recent(n)?)
    }

    /// A persisted session by ID.
    pub fn session(&self, id: &str) -> Result<Option<SessionRecord>> {
        Ok(self.storage.sessions.get(id)?)
    }

    /// Retrieved RAG context for a query, when RAG is enabled.
    pub async fn retrieved_context(&self, query: &str, k: usize) -> Result<Option<String>> {
        match &self.retriever {
            Some(retriever) => Ok(Some(retriever.context_for(query, k, 2000).await?)),
            None => Ok(None),
        }
    }

    pub fn config(&self) -> &ResearchConfig {
        &self.config
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
