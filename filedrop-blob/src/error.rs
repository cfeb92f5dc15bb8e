use thiserror::Error;

/// Errors that can occur during blob storage operations.
#[derive(Debug, Error)]
pub enum BlobError {
    /// The requested blob was not found on disk.
    #[error("blob not found: {0}")]
    NotFound(String),

    /// A storage backend error occurred.
    #[error("blob storage error: {0}")]
    Storage(String),
}

impl From<std::io::Error> for BlobError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
