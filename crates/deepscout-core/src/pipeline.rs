//! The plan -> research -> report pipeline.

use std::sync::Arc;

use chrono::Utc;
use deepscout_ai::llm::{LlmClient, TokenUsage};
use deepscout_ai::{AgentConfig, ResearchAgent, ToolRegistry};
use deepscout_storage::{SessionRecord, SessionStore};
use serde::Serialize;
use uuid::Uuid;

use crate::config::ResearchConfig;
use crate::error::Result;
use crate::memory::{MemoryKind, MemoryManager, truncate_chars};
use crate::plan::Plan;
use crate::planner::Planner;
use crate::rag::DocumentRetriever;
use crate::report::ReportGenerator;

const AGENT_TEMPERATURE: f32 = 0.1;

/// Result of one full research run.
#[derive(Debug, Clone, Serialize)]
pub struct ResearchOutcome {
    pub session_id: String,
    pub query: String,
    pub plan: Plan,
    pub findings: String,
    pub report: String,
    pub iterations: usize,
    pub tool_calls: usize,
    pub usage: TokenUsage,
}

/// Sequential three-stage research pipeline.
pub struct ResearchPipeline {
    planner: Planner,
    agent: ResearchAgent,
    report: ReportGenerator,
    config: ResearchConfig,
}

impl ResearchPipeline {
    /// `llm` drives planning and reporting; `agent_llm` drives the tool loop.
    pub fn new(
        llm: Arc<dyn LlmClient>,
        agent_llm: Arc<dyn LlmClient>,
        tools: Arc<ToolRegistry>,
        config: ResearchConfig,
    ) -> Self {
        let agent_config = AgentConfig {
            max_iterations: config.max_iterations,
            temperature: AGENT_TEMPERATURE,
            ..AgentConfig::default()
        };
        Self {
            planner: Planner::new(llm.clone()),
            agent: ResearchAgent::new(agent_llm, tools).with_config(agent_config),
            report: ReportGenerator::new(llm),
            config,
        }
    }

    /// Run the full pipeline for a query.
    ///
    /// Memory and persistence side effects: working memory records the plan
    /// and findings, the completed session lands in short-term memory and the
    /// session store, and findings are indexed into the retriever. Indexing
    /// and session-store failures are logged and do not fail the run.
    pub async fn run(
        &self,
        query: &str,
        memory: &mut MemoryManager,
        retriever: Option<&DocumentRetriever>,
        sessions: Option<&SessionStore>,
    ) -> Result<ResearchOutcome> {
        let session_id = Uuid::new_v4().to_string();

        // Stage 1: plan
        tracing::info!(query, "Planning research");
        let memory_context = if self.config.memory_enabled {
            memory.context()
        } else {
            String::new()
        };
        if self.config.memory_enabled {
            memory.remember(MemoryKind::Query, query.to_string());
        }
        let plan = self.planner.create_plan(query, &memory_context).await?;
        if self.config.memory_enabled {
            memory.remember(MemoryKind::Plan, plan.as_prompt_block());
        }

        // Stage 2: research
        tracing::info!("Starting research agent");
        let task = build_research_task(query, &plan);
        let run = self.agent.run(&task).await?;
        if self.config.memory_enabled {
            memory.remember(
                MemoryKind::Findings,
                truncate_chars(&run.findings, 500).to_string(),
            );
        }
        tracing::info!(
            iterations = run.iterations,
            findings_chars = run.findings.len(),
            "Research completed"
        );

        // Stage 3: report
        tracing::info!("Generating report");
        let report = self.report.generate(query, &plan, &run.findings).await?;

        if let Some(retriever) = retriever {
            let source = format!("deepscout://sessions/{session_id}");
            match retriever
                .index_document(&run.findings, &source, Some(query))
                .await
            {
                Ok(indexed) => tracing::debug!(indexed, "Findings indexed into RAG store"),
                Err(e) => tracing::warn!(error = %e, "Failed to index findings"),
            }
        }

        if let Some(sessions) = sessions {
            let record = SessionRecord {
                id: session_id.clone(),
                query: query.to_string(),
                objective: plan.objective.clone(),
                report: report.clone(),
                created_at_ms: Utc::now().timestamp_millis(),
            };
            if let Err(e) = sessions.put(&record) {
                tracing::warn!(error = %e, "Failed to persist session record");
            }
        }

        if self.config.memory_enabled {
            memory.save_session(query, &plan.objective, &report);
        }

        Ok(ResearchOutcome {
            session_id,
            query: query.to_string(),
            plan,
            findings: run.findings,
            report,
            iterations: run.iterations,
            tool_calls: run.tool_calls,
            usage: run.usage,
        })
    }
}

/// The prompt that kicks off the research agent.
fn build_research_task(query: &str, plan: &Plan) -> String {
    format!(
        "Research Query: {query}\n\nResearch Plan:\n{}\n\n\
         Please execute the research plan above. Use web_search for each search \
         query, and fetch_page for the most relevant URLs to get detailed \
         content. After gathering sufficient information, provide a structured \
         summary of your findings.",
        plan.as_prompt_block()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepscout_ai::llm::{MockLlm, MockStep};
    use deepscout_storage::{Storage, VectorConfig};
    use tempfile::tempdir;

    const PLAN_JSON: &str = r#"{
        "objective": "Understand topic T",
        "sub_topics": ["t1"],
        "search_queries": ["T overview"],
        "priority_areas": [],
        "depth": "shallow"
    }"#;

    fn pipeline(steps: Vec<MockStep>, config: ResearchConfig) -> ResearchPipeline {
        let llm = Arc::new(MockLlm::new(steps));
        ResearchPipeline::new(
            llm.clone(),
            llm,
            Arc::new(ToolRegistry::new()),
            config,
        )
    }

    #[tokio::test]
    async fn full_run_produces_outcome() {
        // Planner, agent (answers without tools), and report share one script.
        let pipeline = pipeline(
            vec![
                MockStep::text(PLAN_JSON),
                MockStep::text("**Key Findings:** T is well understood."),
                MockStep::text("# T Report\n\nAll about T."),
            ],
            ResearchConfig::default(),
        );
        let mut memory = MemoryManager::new(5, 10);

        let outcome = pipeline
            .run("what is T?", &mut memory, None, None)
            .await
            .unwrap();

        assert_eq!(outcome.plan.objective, "Understand topic T");
        assert!(outcome.findings.contains("Key Findings"));
        assert!(outcome.report.starts_with("# T Report"));
        assert_eq!(outcome.iterations, 1);

        // Session recorded in short-term memory, stages in working memory.
        assert_eq!(memory.short_term.len(), 1);
        assert_eq!(memory.working.by_kind(MemoryKind::Query).len(), 1);
        assert_eq!(memory.working.by_kind(MemoryKind::Plan).len(), 1);
        assert_eq!(memory.working.by_kind(MemoryKind::Findings).len(), 1);
    }

    #[tokio::test]
    async fn memory_disabled_leaves_memory_untouched() {
        let pipeline = pipeline(
            vec![
                MockStep::text(PLAN_JSON),
                MockStep::text("findings"),
                MockStep::text("report"),
            ],
            ResearchConfig {
                memory_enabled: false,
                ..ResearchConfig::default()
            },
        );
        let mut memory = MemoryManager::new(5, 10);

        pipeline
            .run("what is T?", &mut memory, None, None)
            .await
            .unwrap();

        assert!(memory.working.is_empty());
        assert!(memory.short_term.is_empty());
    }

    #[tokio::test]
    async fn session_is_persisted_to_store() {
        let temp_dir = tempdir().unwrap();
        let storage = Storage::new(
            &temp_dir.path().join("test.db"),
            VectorConfig {
                dimension: 4,
                max_connections: 8,
                ef_construction: 100,
                max_elements: 100,
            },
        )
        .unwrap();

        let pipeline = pipeline(
            vec![
                MockStep::text(PLAN_JSON),
                MockStep::text("findings"),
                MockStep::text("report body"),
            ],
            ResearchConfig::default(),
        );
        let mut memory = MemoryManager::new(5, 10);

        let outcome = pipeline
            .run("what is T?", &mut memory, None, Some(&storage.sessions))
            .await
            .unwrap();

        let stored = storage.sessions.get(&outcome.session_id).unwrap().unwrap();
        assert_eq!(stored.query, "what is T?");
        assert_eq!(stored.objective, "Understand topic T");
        assert_eq!(stored.report, "report body");
    }

    #[tokio::test]
    async fn planner_failure_aborts_run() {
        let pipeline = pipeline(
            vec![MockStep::text("garbage")],
            ResearchConfig::default(),
        );
        let mut memory = MemoryManager::new(5, 10);

        let err = pipeline
            .run("what is T?", &mut memory, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::CoreError::PlanParse(_)));
        assert!(memory.short_term.is_empty());
    }
}
