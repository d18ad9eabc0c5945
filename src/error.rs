use thiserror::Error;

pub type Result<T> = std::result::Result<T, DaytripError>;

#[derive(Debug, Error)]
pub enum DaytripError {
    #[error("tool `{0}` not found")]
    ToolNotFound(String),

    #[error("language model error: {0}")]
    LanguageModel(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}
