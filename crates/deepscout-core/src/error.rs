//! Error types for the core pipeline

use deepscout_ai::AiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Ai(#[from] AiError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Failed to parse research plan: {0}")]
    PlanParse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<anyhow::Error> for CoreError {
    fn from(err: anyhow::Error) -> Self {
        CoreError::Storage(format!("{err:#}"))
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ai_error_converts() {
        let err: CoreError = AiError::Agent("loop failed".to_string()).into();
        assert!(matches!(err, CoreError::Ai(_)));
    }

    #[test]
    fn anyhow_maps_to_storage() {
        let err: CoreError = anyhow::anyhow!("db corrupt").into();
        assert!(err.to_string().contains("db corrupt"));
    }
}
