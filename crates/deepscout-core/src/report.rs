//! Report generator - synthesizes query, plan, and findings into Markdown.

use std::sync::Arc;

use deepscout_ai::llm::{CompletionRequest, LlmClient, Message};

use crate::error::Result;
use crate::plan::Plan;

const REPORT_TEMPERATURE: f32 = 0.3;

const SYSTEM_PROMPT: &str = r#"You are an expert research report writer. Given a research query, a research plan,
and the research findings, produce a comprehensive, well-structured Markdown report.

## Report Structure

# [Report Title]

## Executive Summary
A concise overview of the key findings (2-3 paragraphs).

## Introduction
Context, background, and research objectives.

## Key Findings
Main discoveries organized by topic/sub-topic. Use subsections as needed.

## Detailed Analysis
In-depth discussion of findings, comparisons, trends, and implications.

## Sources and References
Numbered list of all sources used, with URLs.

## Conclusion
Summary of key takeaways, limitations, and suggestions for further research.

## Guidelines
- Be factual and cite sources inline (e.g., [1], [2]).
- Use proper Markdown formatting: headers, bullet points, bold, etc.
- Do NOT fabricate information - only include what the research findings support.
- If information gaps exist, acknowledge them honestly.
- Write in a professional, objective tone."#;

/// Generates a structured Markdown research report.
///
/// A plain LLM call, not an agent.
pub struct ReportGenerator {
    llm: Arc<dyn LlmClient>,
}

impl ReportGenerator {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub async fn generate(&self, query: &str, plan: &Plan, findings: &str) -> Result<String> {
        let user_prompt = format!(
            "Research Query: {query}\n\nResearch Plan:\n{}\n\nResearch Findings:\n{findings}\n\n\
             Generate a comprehensive research report based on the above information.",
            plan.as_prompt_block()
        );

        let request = CompletionRequest::new(vec![
            Message::system(SYSTEM_PROMPT),
            Message::user(user_prompt),
        ])
        .with_temperature(REPORT_TEMPERATURE);

        let response = self.llm.complete(request).await?;
        let report = response.content.unwrap_or_default();
        tracing::info!(report_chars = report.len(), "Report generated");
        Ok(report)
    }
}
