use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("activity not found")]
    NotFound,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
