use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the service.
///
/// The first four variants are the protocol-visible taxonomy: their
/// `Display` output is written verbatim into `{"error": ...}` lines.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to load model: {0}")]
    Load(String),

    #[error("{0}")]
    Parse(String),

    #[error("Prompt is required.")]
    MissingPrompt,

    #[error("{0}")]
    Generation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("FSM error: {0}")]
    Fsm(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn fsm(msg: impl Into<String>) -> Self {
        Self::Fsm(msg.into())
    }
}
