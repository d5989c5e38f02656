//! DeepScout AI - LLM clients and the research agent
//!
//! This crate provides:
//! - Multi-provider LLM client (OpenAI, Anthropic) with retry
//! - Tool trait, registry, and the web research tools
//! - ReAct (Reasoning + Acting) loop for the research agent
//! - Embedding providers for the RAG layer

pub mod agent;
pub mod embedding;
pub mod error;
mod http_client;
pub mod llm;
pub mod tools;

// Re-export commonly used types
pub use agent::{AgentConfig, AgentRun, ConversationHistory, ResearchAgent};
pub use embedding::{EmbeddingConfig, EmbeddingProvider, OpenAiEmbedding};
pub use error::{AiError, Result};
pub use llm::{
    AnthropicClient, CompletionRequest, CompletionResponse, FinishReason, LlmClient, LlmProvider,
    Message, MockLlm, MockStep, ModelRouter, OpenAiClient, Role, TokenUsage, ToolCall,
};
pub use tools::{FetchPageTool, Tool, ToolOutput, ToolRegistry, ToolSchema, WebSearchTool};
