use thiserror::Error;

/// Errors from metadata registry operations.
///
/// The in-memory backend is infallible in practice; the variants exist so a
/// persistent backend can slot in behind [`MetadataRegistry`](crate::MetadataRegistry)
/// without changing the trait.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
