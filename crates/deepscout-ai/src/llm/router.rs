//! Provider routing: selects and builds the right LLM client for a request.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AiError, Result};
use crate::llm::{AnthropicClient, LlmClient, OpenAiClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    OpenAi,
    Anthropic,
}

impl LlmProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
        }
    }

    pub fn parse(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            other => Err(AiError::Llm(format!("Unsupported provider: {other}"))),
        }
    }
}

/// Router configuration: API keys and default models per provider.
#[derive(Debug, Clone, Default)]
pub struct RouterConfig {
    pub api_keys: HashMap<LlmProvider, String>,
    pub openai_model: Option<String>,
    pub anthropic_model: Option<String>,
}

/// Builds LLM clients for a provider, caching one client per provider/model.
pub struct ModelRouter {
    config: RouterConfig,
    cache: parking_lot::Mutex<HashMap<String, Arc<dyn LlmClient>>>,
}

impl ModelRouter {
    pub fn new(config: RouterConfig) -> Self {
        Self {
            config,
            cache: parking_lot::Mutex::new(HashMap::new()),
        }
    }

    /// Get (or build) a client for the provider, with an optional model override.
    pub fn client(
        &self,
        provider: LlmProvider,
        model: Option<&str>,
    ) -> Result<Arc<dyn LlmClient>> {
        let model = model
            .map(str::to_string)
            .or_else(|| self.default_model(provider));
        let cache_key = format!("{}:{}", provider.as_str(), model.as_deref().unwrap_or("-"));

        let mut cache = self.cache.lock();
        if let Some(client) = cache.get(&cache_key) {
            return Ok(client.clone());
        }

        let client = self.build_client(provider, model.as_deref())?;
        cache.insert(cache_key, client.clone());
        Ok(client)
    }

    fn default_model(&self, provider: LlmProvider) -> Option<String> {
        match provider {
            LlmProvider::OpenAi => self.config.openai_model.clone(),
            LlmProvider::Anthropic => self.config.anthropic_model.clone(),
        }
    }

    fn api_key(&self, provider: LlmProvider) -> Result<&str> {
        self.config
            .api_keys
            .get(&provider)
            .map(String::as_str)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                AiError::Llm(format!(
                    "{} API key not configured",
                    match provider {
                        LlmProvider::OpenAi => "OpenAI",
                        LlmProvider::Anthropic => "Anthropic",
                    }
                ))
            })
    }

    fn build_client(
        &self,
        provider: LlmProvider,
        model: Option<&str>,
    ) -> Result<Arc<dyn LlmClient>> {
        let key = self.api_key(provider)?;
        match provider {
            LlmProvider::OpenAi => {
                let mut client = OpenAiClient::new(key);
                if let Some(model) = model {
                    client = client.with_model(model);
                }
                Ok(Arc::new(client))
            }
            LlmProvider::Anthropic => {
                let mut client = AnthropicClient::new(key);
                if let Some(model) = model {
                    client = client.with_model(model);
                }
                Ok(Arc::new(client))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_provider_names() {
        assert_eq!(LlmProvider::parse("openai").unwrap(), LlmProvider::OpenAi);
        assert_eq!(
            LlmProvider::parse(" Anthropic ").unwrap(),
            LlmProvider::Anthropic
        );
        assert!(LlmProvider::parse("cohere").is_err());
    }

    #[test]
    fn missing_key_is_rejected() {
        let router = ModelRouter::new(RouterConfig::default());
        let err = router
            .client(LlmProvider::OpenAi, None)
            .map(|_| ())
            .unwrap_err();
        assert!(err.to_string().contains("API key not configured"));
    }

    #[test]
    fn client_is_cached_per_provider_and_model() {
        let mut api_keys = HashMap::new();
        api_keys.insert(LlmProvider::OpenAi, "sk-test".to_string());
        let router = ModelRouter::new(RouterConfig {
            api_keys,
            ..Default::default()
        });

        let a = router.client(LlmProvider::OpenAi, Some("gpt-4o")).unwrap();
        let b = router.client(LlmProvider::OpenAi, Some("gpt-4o")).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
