use async_trait::async_trait;
use dashmap::DashMap;

use filedrop_core::FileRecord;

use crate::error::RegistryError;
use crate::registry::MetadataRegistry;

/// In-memory [`MetadataRegistry`] backed by a [`DashMap`].
///
/// Metadata lives only in process memory and is lost on restart; the raw
/// bytes on disk are the only persisted state. This implementation is fully
/// synchronous internally; the async trait methods return immediately.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    records: DashMap<String, FileRecord>,
}

impl MemoryRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MetadataRegistry for MemoryRegistry {
    async fn insert(&self, record: FileRecord) -> Result<(), RegistryError> {
        let id = record.id.clone();
        let previous = self.records.insert(id.clone(), record);
        assert!(previous.is_none(), "duplicate file id inserted: {id}");
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<FileRecord>, RegistryError> {
        Ok(self.records.get(id).map(|entry| entry.value().clone()))
    }

    async fn delete(&self, id: &str) -> Result<bool, RegistryError> {
        Ok(self.records.remove(id).is_some())
    }

    async fn snapshot(&self) -> Result<Vec<FileRecord>, RegistryError> {
        Ok(self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn len(&self) -> Result<usize, RegistryError> {
        Ok(self.records.len())
    }
}
