//! ReAct research agent
//!
//! The agent alternates LLM completions and tool executions: each completion
//! may request tool calls (`web_search`, `fetch_page`), whose observations are
//! appended to the conversation before the next completion. The loop ends when
//! the model answers without tool calls, or when the iteration cap forces a
//! tools-free wrap-up completion.

mod history;

pub use history::ConversationHistory;

use std::sync::Arc;

use crate::error::{AiError, Result};
use crate::llm::{CompletionRequest, FinishReason, LlmClient, Message, TokenUsage};
use crate::tools::ToolRegistry;

/// Default cap on completions with tools per run.
pub const DEFAULT_MAX_ITERATIONS: usize = 5;

/// Research agent configuration
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Maximum LLM completions with tools before the wrap-up completion.
    pub max_iterations: usize,
    /// Observations longer than this are truncated before entering history.
    pub max_observation_len: usize,
    /// Temperature for agent completions.
    pub temperature: f32,
    /// History cap (messages); system prompt survives trimming.
    pub max_history_messages: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_observation_len: 8_000,
            temperature: 0.1,
            max_history_messages: 100,
        }
    }
}

/// Outcome of one agent run
#[derive(Debug, Clone)]
pub struct AgentRun {
    /// The agent's final findings text.
    pub findings: String,
    /// Completions performed (including the wrap-up, when it happens).
    pub iterations: usize,
    /// Tool calls executed across the run.
    pub tool_calls: usize,
    /// Aggregated token usage.
    pub usage: TokenUsage,
}

const SYSTEM_PROMPT: &str = "\
You are an expert research agent. Your job is to thoroughly investigate a topic
based on a research plan.

## Tools

- **web_search**: Search the web for information on any topic.
- **fetch_page**: Fetch full text content from a web page.

## Research Strategy

1. Execute each search query from the plan using web_search.
2. For the most promising results, use fetch_page to get full page content.
3. After completing all planned searches, check for information gaps. If any
   remain, formulate new search queries and continue.
4. When you have sufficient information, produce a structured summary.

## Output Format

When done, output your findings as:

**Key Findings:**
- Finding 1 (with source URL)
- ...

**Sources:**
- [Title](URL) - brief description
- ...

**Information Gaps:**
- Any areas where you could not find sufficient information.

Be thorough but efficient. Prioritize high-quality, authoritative sources.
Do NOT fabricate information - only report what you actually found.";

/// Tool-calling ReAct agent for the research stage.
pub struct ResearchAgent {
    llm: Arc<dyn LlmClient>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl ResearchAgent {
    pub fn new(llm: Arc<dyn LlmClient>, tools: Arc<ToolRegistry>) -> Self {
        Self {
            llm,
            tools,
            config: AgentConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the agent on a research task until it produces findings.
    pub async fn run(&self, task: &str) -> Result<AgentRun> {
        let mut history = ConversationHistory::new(self.config.max_history_messages);
        history.add(Message::system(SYSTEM_PROMPT));
        history.add(Message::user(task));

        let schemas = self.tools.schemas();
        let mut usage = TokenUsage::default();
        let mut tool_calls_executed = 0usize;

        for iteration in 1..=self.config.max_iterations {
            tracing::debug!(iteration, "Agent completion");

            let request = CompletionRequest::new(history.messages().to_vec())
                .with_tools(schemas.clone())
                .with_temperature(self.config.temperature);

            let response = self.llm.complete(request).await?;
            if let Some(u) = &response.usage {
                usage.accumulate(u);
            }

            match response.finish_reason {
                FinishReason::ToolCalls => {
                    let calls = response.tool_calls;
                    history.add(Message::assistant_with_tool_calls(
                        response.content,
                        calls.clone(),
                    ));

                    for call in calls {
                        tracing::debug!(tool = %call.name, "Executing tool call");
                        let observation = match self
                            .tools
                            .execute(&call.name, call.arguments.clone())
                            .await
                        {
                            Ok(output) => output.as_observation(),
                            // Tool failures become observations; the agent
                            // decides whether to retry or move on.
                            Err(e) => format!("Error: {}", e),
                        };
                        tool_calls_executed += 1;

                        let observation =
                            truncate_observation(&observation, self.config.max_observation_len);
                        history.add(Message::tool_result(call.id, observation));
                    }
                }
                FinishReason::Stop | FinishReason::MaxTokens => {
                    let findings = response.content.unwrap_or_default();
                    if findings.trim().is_empty() {
                        return Err(AiError::Agent(
                            "Agent finished without producing findings".to_string(),
                        ));
                    }
                    return Ok(AgentRun {
                        findings,
                        iterations: iteration,
                        tool_calls: tool_calls_executed,
                        usage,
                    });
                }
                FinishReason::Error => {
                    return Err(AiError::Agent(
                        "LLM reported an error finish reason".to_string(),
                    ));
                }
            }
        }

        // Iteration cap reached: one tools-free completion to wrap up.
        tracing::warn!(
            max_iterations = self.config.max_iterations,
            "Iteration cap reached, forcing wrap-up"
        );
        history.add(Message::user(
            "You have reached the research step limit. Based on everything gathered \
             so far, produce your structured findings summary now. Do not call any \
             more tools.",
        ));

        let request = CompletionRequest::new(history.messages().to_vec())
            .with_temperature(self.config.temperature);
        let response = match self.llm.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Wrap-up completion failed");
                return Err(AiError::MaxIterations(self.config.max_iterations));
            }
        };
        if let Some(u) = &response.usage {
            usage.accumulate(u);
        }

        let findings = response.content.unwrap_or_default();
        if findings.trim().is_empty() {
            return Err(AiError::MaxIterations(self.config.max_iterations));
        }

        Ok(AgentRun {
            findings,
            iterations: self.config.max_iterations + 1,
            tool_calls: tool_calls_executed,
            usage,
        })
    }
}

fn truncate_observation(content: &str, max_len: usize) -> String {
    if content.len() <= max_len {
        return content.to_string();
    }
    let mut end = max_len;
    while end > 0 && !content.is_char_boundary(end) {
        end -= 1;
    }
    format!(
        "{}\n...[observation truncated, {} chars total]",
        &content[..end],
        content.len()
    )
}
