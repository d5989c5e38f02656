//! Integration tests for the research agent

use async_trait::async_trait;
use deepscout_ai::{
    FetchPageTool, OpenAiClient, ResearchAgent, Tool, ToolOutput, ToolRegistry, WebSearchTool,
};
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn disable_system_proxy_for_tests() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        // Safety: set once for the process before any HTTP clients are built.
        unsafe {
            std::env::set_var("DEEPSCOUT_DISABLE_SYSTEM_PROXY", "1");
        }
    });
}

struct LookupTool;

#[async_trait]
impl Tool for LookupTool {
    fn name(&self) -> &str {
        "lookup"
    }

    fn description(&self) -> &str {
        "Look up a fact by key"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "key": { "type": "string" }
            },
            "required": ["key"]
        })
    }

    async fn execute(&self, input: Value) -> deepscout_ai::Result<ToolOutput> {
        let key = input["key"].as_str().unwrap_or("");
        Ok(ToolOutput::success(json!(format!(
            "fact for {key}: 42"
        ))))
    }
}

fn tool_call_response() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{
            "message": {
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {
                        "name": "lookup",
                        "arguments": "{\"key\": \"answer\"}"
                    }
                }]
            },
            "finish_reason": "tool_calls"
        }],
        "usage": { "prompt_tokens": 20, "completion_tokens": 10, "total_tokens": 30 }
    }))
}

fn final_answer_response(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{
            "message": { "content": text, "tool_calls": null },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 30, "completion_tokens": 15, "total_tokens": 45 }
    }))
}

#[tokio::test]
async fn agent_loop_over_http() {
    disable_system_proxy_for_tests();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(tool_call_response())
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(final_answer_response("The answer is 42."))
        .mount(&server)
        .await;

    let llm = Arc::new(OpenAiClient::new("test-key").with_base_url(server.uri()));
    let mut tools = ToolRegistry::new();
    tools.register(LookupTool);

    let agent = ResearchAgent::new(llm, Arc::new(tools));
    let run = agent
        .run("What is the answer? Use the lookup tool.")
        .await
        .expect("agent run");

    assert_eq!(run.findings, "The answer is 42.");
    assert_eq!(run.tool_calls, 1);
    assert_eq!(run.iterations, 2);
    assert_eq!(run.usage.total_tokens, 75);
}

#[tokio::test]
async fn research_tool_registry() {
    disable_system_proxy_for_tests();

    let mut registry = ToolRegistry::new();
    registry.register(WebSearchTool::new());
    registry.register(FetchPageTool::new());

    assert!(registry.has("web_search"));
    assert!(registry.has("fetch_page"));
    assert!(!registry.has("unknown"));

    let schemas = registry.schemas();
    assert_eq!(schemas.len(), 2);
}

#[tokio::test]
#[ignore] // Requires OPENAI_API_KEY environment variable
async fn live_agent_with_web_search() {
    let api_key = std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY required");

    let llm = Arc::new(OpenAiClient::new(api_key));
    let mut tools = ToolRegistry::new();
    tools.register(WebSearchTool::new());
    tools.register(FetchPageTool::new());

    let agent = ResearchAgent::new(llm, Arc::new(tools));
    let run = agent
        .run("What is the capital of France? Use web_search to confirm.")
        .await
        .expect("agent run");

    assert!(!run.findings.is_empty());
    println!("Findings: {}", run.findings);
}
