//! Research planner - a single LLM call that produces a structured plan.

use std::sync::Arc;

use deepscout_ai::llm::{CompletionRequest, LlmClient, Message};

use crate::error::{CoreError, Result};
use crate::plan::Plan;

const PLANNER_TEMPERATURE: f32 = 0.3;

const SYSTEM_PROMPT: &str = r#"You are an expert research planner. Given a research query and optional context
from previous research sessions, produce a structured research plan in JSON.

Output exactly this JSON structure:
{
    "objective": "One-sentence research goal",
    "sub_topics": ["sub-topic 1", "sub-topic 2", ...],
    "search_queries": ["specific search query 1", "query 2", ...],
    "priority_areas": ["most important area 1", ...],
    "depth": "shallow | medium | deep"
}

Guidelines:
- Generate 3-6 specific, diverse search queries that cover different angles.
- Identify 2-4 sub-topics that break the research into logical parts.
- Set depth based on query complexity: factual questions -> shallow, multi-faceted
  analysis -> deep."#;

/// Creates a structured research plan from a query.
///
/// A plain LLM call with JSON output, not an agent.
pub struct Planner {
    llm: Arc<dyn LlmClient>,
}

impl Planner {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub async fn create_plan(&self, query: &str, memory_context: &str) -> Result<Plan> {
        let context = if memory_context.trim().is_empty() {
            "No previous research context."
        } else {
            memory_context
        };

        let user_prompt = format!(
            "Research Query: {query}\n\nPrevious Research Context:\n{context}\n\n\
             Create a research plan in JSON format."
        );

        let request = CompletionRequest::new(vec![
            Message::system(SYSTEM_PROMPT),
            Message::user(user_prompt),
        ])
        .with_temperature(PLANNER_TEMPERATURE);

        let response = self.llm.complete(request).await?;
        let content = response.content.unwrap_or_default();
        let json = extract_json(&content);

        let plan: Plan = serde_json::from_str(json).map_err(|e| {
            CoreError::PlanParse(format!("{e} in planner output: {}", snippet(&content)))
        })?;

        tracing::info!(
            search_queries = plan.search_queries.len(),
            depth = plan.depth.as_str(),
            "Plan created"
        );
        Ok(plan)
    }
}

/// Strip Markdown code fences around a JSON payload, if present.
fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the language tag on the fence line.
    let body = rest.split_once('\n').map(|(_, b)| b).unwrap_or(rest);
    body.rsplit_once("```").map(|(b, _)| b).unwrap_or(body).trim()
}

fn snippet(text: &str) -> String {
    let mut end = text.len().min(200);
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepscout_ai::llm::{MockLlm, MockStep};

    const PLAN_JSON: &str = r#"{
        "objective": "Survey quantum computing progress",
        "sub_topics": ["hardware", "algorithms"],
        "search_queries": ["quantum computing 2025", "qubit error correction"],
        "priority_areas": ["hardware"],
        "depth": "deep"
    }"#;

    #[tokio::test]
    async fn parses_plain_json() {
        let llm = Arc::new(MockLlm::new(vec![MockStep::text(PLAN_JSON)]));
        let planner = Planner::new(llm);

        let plan = planner.create_plan("quantum computing", "").await.unwrap();
        assert_eq!(plan.objective, "Survey quantum computing progress");
        assert_eq!(plan.search_queries.len(), 2);
    }

    #[tokio::test]
    async fn tolerates_code_fences() {
        let fenced = format!("```json\n{PLAN_JSON}\n```");
        let llm = Arc::new(MockLlm::new(vec![MockStep::text(fenced)]));
        let planner = Planner::new(llm);

        let plan = planner.create_plan("quantum computing", "").await.unwrap();
        assert_eq!(plan.sub_topics, vec!["hardware", "algorithms"]);
    }

    #[tokio::test]
    async fn malformed_json_is_plan_parse_error() {
        let llm = Arc::new(MockLlm::new(vec![MockStep::text("not json at all")]));
        let planner = Planner::new(llm);

        let err = planner.create_plan("anything", "").await.unwrap_err();
        assert!(matches!(err, CoreError::PlanParse(_)));
    }

    #[test]
    fn extract_json_variants() {
        assert_eq!(extract_json("{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(extract_json("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(extract_json("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }
}
