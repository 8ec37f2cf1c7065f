use thiserror::Error;

pub type AdboardResult<T> = Result<T, AdboardError>;

#[derive(Error, Debug)]
pub enum AdboardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Record provider error: {0}")]
    Provider(String),

    #[error("Fetch timed out after {0}ms")]
    FetchTimeout(u64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
