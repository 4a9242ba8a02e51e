use thiserror::Error;

#[derive(Debug, Error)]
pub enum MemoryStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Storage error: {0}")]
    Storage(String),
}

pub type MemoryResult<T> = Result<T, MemoryStoreError>;
