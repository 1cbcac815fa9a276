use thiserror::Error;

#[derive(Error, Debug)]
pub enum CozyError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Retrieval error: {0}")]
    Retrieval(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Handler error: {0}")]
    Handler(#[from] eyre::Report),

    #[error("Internal error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type CozyResult<T> = Result<T, CozyError>;
