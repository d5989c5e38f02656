//! LLM provider clients

mod anthropic;
mod client;
mod mock;
mod openai;
mod retry;
mod router;

pub use anthropic::AnthropicClient;
pub use client::{
    CompletionRequest, CompletionResponse, FinishReason, LlmClient, Message, Role, TokenUsage,
    ToolCall,
};
pub use mock::{MockLlm, MockStep};
pub use openai::OpenAiClient;
pub use retry::{LlmRetryConfig, response_to_error};
pub use router::{LlmProvider, ModelRouter, RouterConfig};
