//! Environment-driven settings and per-run research configuration.

use std::collections::HashMap;

use deepscout_ai::llm::{LlmProvider, RouterConfig};

use crate::error::{CoreError, Result};

/// Application settings, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Settings {
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub tavily_api_key: Option<String>,
    pub default_provider: LlmProvider,
    pub openai_model: Option<String>,
    pub anthropic_model: Option<String>,
    pub max_working_memory: usize,
    pub max_short_term_memory: usize,
    pub max_research_iterations: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            anthropic_api_key: None,
            tavily_api_key: None,
            default_provider: LlmProvider::OpenAi,
            openai_model: None,
            anthropic_model: None,
            max_working_memory: 5,
            max_short_term_memory: 10,
            max_research_iterations: 5,
        }
    }
}

impl Settings {
    /// Load settings from the environment.
    ///
    /// Recognized variables: `OPENAI_API_KEY`, `ANTHROPIC_API_KEY`,
    /// `TAVILY_API_KEY`, `DEEPSCOUT_PROVIDER`, `DEEPSCOUT_OPENAI_MODEL`,
    /// `DEEPSCOUT_ANTHROPIC_MODEL`, `DEEPSCOUT_WORKING_MEMORY`,
    /// `DEEPSCOUT_SHORT_TERM_MEMORY`, `DEEPSCOUT_MAX_ITERATIONS`.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let default_provider = match env_var("DEEPSCOUT_PROVIDER") {
            Some(name) => LlmProvider::parse(&name)
                .map_err(|e| CoreError::Config(e.to_string()))?,
            None => defaults.default_provider,
        };

        Ok(Self {
            openai_api_key: env_var("OPENAI_API_KEY"),
            anthropic_api_key: env_var("ANTHROPIC_API_KEY"),
            tavily_api_key: env_var("TAVILY_API_KEY"),
            default_provider,
            openai_model: env_var("DEEPSCOUT_OPENAI_MODEL"),
            anthropic_model: env_var("DEEPSCOUT_ANTHROPIC_MODEL"),
            max_working_memory: env_usize("DEEPSCOUT_WORKING_MEMORY")?
                .unwrap_or(defaults.max_working_memory),
            max_short_term_memory: env_usize("DEEPSCOUT_SHORT_TERM_MEMORY")?
                .unwrap_or(defaults.max_short_term_memory),
            max_research_iterations: env_usize("DEEPSCOUT_MAX_ITERATIONS")?
                .unwrap_or(defaults.max_research_iterations),
        })
    }

    /// Build the router configuration from the configured API keys.
    pub fn router_config(&self) -> RouterConfig {
        let mut api_keys = HashMap::new();
        if let Some(key) = &self.openai_api_key {
            api_keys.insert(LlmProvider::OpenAi, key.clone());
        }
        if let Some(key) = &self.anthropic_api_key {
            api_keys.insert(LlmProvider::Anthropic, key.clone());
        }
        RouterConfig {
            api_keys,
            openai_model: self.openai_model.clone(),
            anthropic_model: self.anthropic_model.clone(),
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_usize(name: &str) -> Result<Option<usize>> {
    match env_var(name) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CoreError::Config(format!("{name} must be a positive integer: {value}"))),
        None => Ok(None),
    }
}

/// Configuration for a single research run.
#[derive(Debug, Clone)]
pub struct ResearchConfig {
    pub provider: LlmProvider,
    /// Model override; the provider default is used when unset.
    pub model: Option<String>,
    pub max_iterations: usize,
    pub enable_rag: bool,
    pub memory_enabled: bool,
    pub verbose: bool,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::OpenAi,
            model: None,
            max_iterations: 5,
            enable_rag: true,
            memory_enabled: true,
            verbose: false,
        }
    }
}

impl ResearchConfig {
    /// Defaults derived from settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            provider: settings.default_provider,
            max_iterations: settings.max_research_iterations,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn router_config_includes_only_present_keys() {
        let settings = Settings {
            openai_api_key: Some("sk-test".to_string()),
            ..Settings::default()
        };
        let router = settings.router_config();
        assert!(router.api_keys.contains_key(&LlmProvider::OpenAi));
        assert!(!router.api_keys.contains_key(&LlmProvider::Anthropic));
    }

    #[test]
    fn defaults_match_documented_values() {
        let settings = Settings::default();
        assert_eq!(settings.max_working_memory, 5);
        assert_eq!(settings.max_short_term_memory, 10);
        assert_eq!(settings.max_research_iterations, 5);

        let config = ResearchConfig::from_settings(&settings);
        assert_eq!(config.provider, LlmProvider::OpenAi);
        assert!(config.enable_rag);
        assert!(config.memory_enabled);
    }
}
