use thiserror::Error;

use filedrop_registry::RegistryError;

/// Typed outcomes surfaced by the lifecycle layer.
///
/// Validation variants are the caller's fault; `NotFound` covers unknown ids
/// and ids whose bytes were tampered away; `Expired` is a valid id past its
/// deadline; `Storage` is an internal disk failure, not retried here.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The uploaded file had zero bytes.
    #[error("uploaded file is empty")]
    EmptyFile,

    /// The uploaded file exceeds the size limit.
    #[error("file size {size} exceeds maximum of {limit} bytes")]
    FileTooLarge { size: u64, limit: u64 },

    /// The file extension is not on the allow-list.
    #[error("file type {0:?} is not allowed")]
    UnsupportedType(String),

    /// No live record for the given id.
    #[error("file not found: {0}")]
    NotFound(String),

    /// The record exists but is past its expiry deadline.
    #[error("file expired: {0}")]
    Expired(String),

    /// A disk read or write failed.
    #[error("storage failure: {0}")]
    Storage(String),

    /// A registry backend failure.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
