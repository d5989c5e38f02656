//! CLI configuration file support
//!
//! Loads configuration from ~/.config/deepscout/config.toml

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Default settings
    #[serde(default)]
    pub default: DefaultConfig,
    /// API key settings
    #[serde(default)]
    pub api_keys: ApiKeysConfig,
}

/// Default configuration values
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultConfig {
    /// Default database path
    pub db_path: Option<String>,
    /// Default LLM provider
    pub provider: Option<String>,
    /// Default model
    pub model: Option<String>,
}

/// API key configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiKeysConfig {
    /// OpenAI API key
    pub openai: Option<String>,
    /// Anthropic API key
    pub anthropic: Option<String>,
    /// Tavily API key (web search)
    pub tavily: Option<String>,
}

impl CliConfig {
    /// Load configuration from default path
    pub fn load() -> Self {
        Self::load_from_path(Self::default_path())
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: Option<PathBuf>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Get the default configuration file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("deepscout").join("config.toml"))
    }

    /// Apply API keys to environment variables
    ///
    /// # Safety
    /// This modifies environment variables which can cause issues in multi-threaded contexts.
    /// Should only be called early in main() before spawning threads.
    pub fn apply_api_key_env(&self) {
        if let Some(key) = &self.api_keys.openai {
            if std::env::var("OPENAI_API_KEY").is_err() {
                // SAFETY: Called early in main() before spawning threads
                unsafe { std::env::set_var("OPENAI_API_KEY", key) };
            }
        }
        if let Some(key) = &self.api_keys.anthropic {
            if std::env::var("ANTHROPIC_API_KEY").is_err() {
                // SAFETY: Called early in main() before spawning threads
                unsafe { std::env::set_var("ANTHROPIC_API_KEY", key) };
            }
        }
        if let Some(key) = &self.api_keys.tavily {
            if std::env::var("TAVILY_API_KEY").is_err() {
                // SAFETY: Called early in main() before spawning threads
                unsafe { std::env::set_var("TAVILY_API_KEY", key) };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_default() {
        let config = CliConfig::load_from_path(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(config.default.db_path.is_none());
        assert!(config.api_keys.openai.is_none());
    }

    #[test]
    fn parses_partial_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).expect("create");
        writeln!(
            file,
            "[default]\nprovider = \"anthropic\"\n\n[api_keys]\ntavily = \"tvly-test\"\n"
        )
        .expect("write");

        let config = CliConfig::load_from_path(Some(path));
        assert_eq!(config.default.provider.as_deref(), Some("anthropic"));
        assert_eq!(config.api_keys.tavily.as_deref(), Some("tvly-test"));
        assert!(config.api_keys.openai.is_none());
    }
}
