use thiserror::Error;

#[derive(Error, Debug)]
pub enum StealthError {
    #[error("Spot not found: {0:?}")]
    SpotNotFound(crate::core::types::SpotId),

    #[error("Agent not found: {0:?}")]
    AgentNotFound(crate::core::types::AgentId),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StealthError>;
