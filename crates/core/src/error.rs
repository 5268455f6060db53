use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("model identifier must be 'provider:model', got: {0}")]
    MalformedModel(String),

    #[error("no CLI tool configured for provider '{provider}' (in '{model}')")]
    UnknownProvider { provider: String, model: String },

    #[error("council model list is empty")]
    NoCouncilModels,
}
