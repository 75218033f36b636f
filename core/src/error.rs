use thiserror::Error;

#[derive(Debug, Error)]
pub enum CeresError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Corrupt directory: {0}")]
    CorruptDirectory(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Out of range: {0}")]
    OutOfRange(String),

    #[error("Corrupt allocation chain: {0}")]
    CorruptChain(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
