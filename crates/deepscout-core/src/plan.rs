//! Structured research plan model.

use serde::{Deserialize, Serialize};

/// How deep the research should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Depth {
    Shallow,
    #[default]
    Medium,
    Deep,
}

impl Depth {
    pub fn as_str(&self) -> &'static str {
        match self {
            Depth::Shallow => "shallow",
            Depth::Medium => "medium",
            Depth::Deep => "deep",
        }
    }
}

/// Research plan produced by the planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// One-sentence research goal.
    pub objective: String,
    #[serde(default)]
    pub sub_topics: Vec<String>,
    #[serde(default)]
    pub search_queries: Vec<String>,
    #[serde(default)]
    pub priority_areas: Vec<String>,
    #[serde(default)]
    pub depth: Depth,
}

impl Plan {
    /// Render the plan as a prompt block for the agent and report stages.
    pub fn as_prompt_block(&self) -> String {
        let mut parts = vec![format!("Objective: {}", self.objective)];
        if !self.sub_topics.is_empty() {
            parts.push(format!("Sub-topics: {}", self.sub_topics.join(", ")));
        }
        if !self.search_queries.is_empty() {
            parts.push("Search queries to execute:".to_string());
            for (i, query) in self.search_queries.iter().enumerate() {
                parts.push(format!("  {}. {}", i + 1, query));
            }
        }
        if !self.priority_areas.is_empty() {
            parts.push(format!("Priority areas: {}", self.priority_areas.join(", ")));
        }
        parts.push(format!("Depth: {}", self.depth.as_str()));
        parts.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_with_missing_optional_fields() {
        let plan: Plan = serde_json::from_str(r#"{"objective": "Study X"}"#).unwrap();
        assert_eq!(plan.objective, "Study X");
        assert!(plan.search_queries.is_empty());
        assert_eq!(plan.depth, Depth::Medium);
    }

    #[test]
    fn depth_parses_lowercase() {
        let plan: Plan =
            serde_json::from_str(r#"{"objective": "X", "depth": "deep"}"#).unwrap();
        assert_eq!(plan.depth, Depth::Deep);
    }

    #[test]
    fn prompt_block_lists_queries_in_order() {
        let plan = Plan {
            objective: "Map the field".to_string(),
            sub_topics: vec!["a".to_string(), "b".to_string()],
            search_queries: vec!["q1".to_string(), "q2".to_string()],
            priority_areas: vec!["p".to_string()],
            depth: Depth::Deep,
        };
        let block = plan.as_prompt_block();
        assert!(block.contains("Objective: Map the field"));
        assert!(block.contains("  1. q1"));
        assert!(block.contains("  2. q2"));
        assert!(block.contains("Depth: deep"));
    }
}
