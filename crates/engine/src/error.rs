//! Engine error type.

use pickerkit_domain::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl EngineError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
