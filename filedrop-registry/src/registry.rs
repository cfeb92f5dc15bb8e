use async_trait::async_trait;

use filedrop_core::FileRecord;

use crate::error::RegistryError;

/// The authoritative table of live file records, keyed by identifier.
///
/// Implementations must be `Send + Sync` and safe for concurrent access.
/// [`delete`](Self::delete) is the linearization point for purging: when two
/// callers race to remove the same expired record, exactly one observes
/// `true` and owns the follow-up blob deletion; the other sees the record as
/// already gone.
#[async_trait]
pub trait MetadataRegistry: Send + Sync {
    /// Insert a newly created record.
    ///
    /// # Panics
    ///
    /// Panics if a record with the same id is already present. Identifier
    /// generation makes that a programming error, not a runtime condition.
    async fn insert(&self, record: FileRecord) -> Result<(), RegistryError>;

    /// Look up a record by id.
    async fn get(&self, id: &str) -> Result<Option<FileRecord>, RegistryError>;

    /// Remove a record. Returns `true` if it was present.
    async fn delete(&self, id: &str) -> Result<bool, RegistryError>;

    /// A point-in-time copy of all records.
    ///
    /// Mutations made after the snapshot is taken are not visible through it.
    async fn snapshot(&self) -> Result<Vec<FileRecord>, RegistryError>;

    /// Number of live records.
    async fn len(&self) -> Result<usize, RegistryError>;

    /// Returns `true` when the registry holds no records.
    async fn is_empty(&self) -> Result<bool, RegistryError> {
        Ok(self.len().await? == 0)
    }
}
