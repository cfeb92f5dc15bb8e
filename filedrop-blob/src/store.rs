use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::BlobError;

/// Storage backend for raw file bytes.
///
/// Blobs are addressed by the storage path returned from [`put`](Self::put).
/// Implementors must tolerate concurrent operations on distinct paths with
/// no external coordination; ordering between a write and the visibility of
/// its metadata is the lifecycle layer's responsibility.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write a blob under the given storage name, creating the target
    /// directory if needed. Returns the resolved path.
    async fn put(&self, data: Bytes, storage_name: &str) -> Result<PathBuf, BlobError>;

    /// Read a blob's bytes. Fails with [`BlobError::NotFound`] when the path
    /// does not exist.
    async fn get(&self, path: &Path) -> Result<Bytes, BlobError>;

    /// Best-effort delete. Returns whether the blob was removed; failures
    /// are logged by the implementation, never escalated.
    async fn delete(&self, path: &Path) -> bool;

    /// Whether a blob exists at the given path.
    async fn exists(&self, path: &Path) -> bool;
}
