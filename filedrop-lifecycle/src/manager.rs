use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use filedrop_blob::{BlobError, BlobStore};
use filedrop_core::{
    FileRecord, RetentionPeriod, file_extension, generate_file_id, sanitize_file_name,
};
use filedrop_registry::MetadataRegistry;

use crate::error::LifecycleError;
use crate::metrics::LifecycleMetrics;

/// MIME type assumed when the client does not supply one.
const DEFAULT_MIME: &str = "application/octet-stream";

/// Validation limits applied at ingest.
#[derive(Debug, Clone)]
pub struct IngestLimits {
    /// Maximum accepted file size in bytes.
    pub max_size_bytes: u64,
    /// Lower-cased extensions (with leading dot) accepted for upload.
    pub allowed_extensions: Vec<String>,
}

impl Default for IngestLimits {
    fn default() -> Self {
        Self {
            max_size_bytes: 10 * 1024 * 1024,
            allowed_extensions: [
                // Images
                ".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg", ".bmp",
                // Documents
                ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".odt", ".ods", ".odp",
                // Text
                ".txt", ".csv", ".json", ".xml", ".md",
                // Archives
                ".zip", ".rar", ".7z", ".tar", ".gz",
                // Media
                ".mp3", ".mp4", ".avi", ".mov", ".wav", ".flv", ".wmv", ".mkv",
                // Code
                ".js", ".ts", ".html", ".css", ".php", ".py", ".java", ".cpp",
            ]
            .iter()
            .map(|s| (*s).to_owned())
            .collect(),
        }
    }
}

/// Pagination envelope returned alongside a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number as requested.
    pub page: u64,
    /// Page size as requested.
    pub limit: u64,
    /// Total non-expired records at snapshot time.
    pub total: u64,
    /// `ceil(total / limit)`, or 0 when `limit` is 0.
    pub total_pages: u64,
}

/// Outcome of a reconciliation sweep.
///
/// `purged` counts records whose metadata was removed; `leaked_blobs` counts
/// those whose bytes could not be deleted and remain on disk. Keeping the two
/// apart lets operators watch the leak rate instead of it being invisible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Expired records purged from the registry.
    pub purged: u64,
    /// Purged records whose blob delete failed.
    pub leaked_blobs: u64,
}

/// The orchestration core of the service.
///
/// Composes the registry and the blob store to implement ingest, retrieval,
/// listing, and expiry reconciliation. The registry's `delete` is the single
/// claim point for purging: whichever caller (lazy reap or sweep) removes
/// the record owns the follow-up blob deletion, so concurrent observers of
/// the same expired record never double-delete bytes.
pub struct LifecycleManager {
    registry: Arc<dyn MetadataRegistry>,
    blobs: Arc<dyn BlobStore>,
    limits: IngestLimits,
    metrics: Arc<LifecycleMetrics>,
}

impl std::fmt::Debug for LifecycleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleManager")
            .field("limits", &self.limits)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

impl LifecycleManager {
    /// Create a manager over the given registry and blob store.
    pub fn new(
        registry: Arc<dyn MetadataRegistry>,
        blobs: Arc<dyn BlobStore>,
        limits: IngestLimits,
    ) -> Self {
        Self {
            registry,
            blobs,
            limits,
            metrics: Arc::new(LifecycleMetrics::default()),
        }
    }

    /// The lifecycle activity counters.
    pub fn metrics(&self) -> &Arc<LifecycleMetrics> {
        &self.metrics
    }

    /// The ingest validation limits.
    pub fn limits(&self) -> &IngestLimits {
        &self.limits
    }

    /// Number of records currently in the registry (expired or not).
    pub async fn live_files(&self) -> Result<u64, LifecycleError> {
        Ok(self.registry.len().await? as u64)
    }

    /// Validate and store an upload: bytes first, then metadata.
    ///
    /// The blob write completes before the record is inserted, so no reader
    /// can observe metadata that points at unwritten bytes.
    #[instrument(skip(self, data), fields(size = data.len(), name = %original_name))]
    pub async fn ingest(
        &self,
        data: Bytes,
        original_name: &str,
        mime_type: Option<String>,
        retention: RetentionPeriod,
    ) -> Result<FileRecord, LifecycleError> {
        let size = data.len() as u64;
        if size == 0 {
            return Err(LifecycleError::EmptyFile);
        }
        if size > self.limits.max_size_bytes {
            return Err(LifecycleError::FileTooLarge {
                size,
                limit: self.limits.max_size_bytes,
            });
        }

        let extension = file_extension(original_name);
        if !self.limits.allowed_extensions.contains(&extension) {
            return Err(LifecycleError::UnsupportedType(extension));
        }

        let id = generate_file_id();
        let storage_name = format!("{id}_{}", sanitize_file_name(original_name));
        let now = Utc::now();

        let storage_path = self
            .blobs
            .put(data, &storage_name)
            .await
            .map_err(|e| LifecycleError::Storage(e.to_string()))?;

        let record = FileRecord {
            id: id.clone(),
            original_name: original_name.to_owned(),
            storage_name,
            size_bytes: size,
            mime_type: mime_type
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_MIME.to_owned()),
            extension,
            created_at: now,
            expires_at: retention.resolve(now),
            storage_path,
        };

        self.registry.insert(record.clone()).await?;
        self.metrics.increment_uploads();
        info!(id = %record.id, size, "file ingested");

        Ok(record)
    }

    /// Fetch a record and its bytes.
    ///
    /// An expired record is reaped on the spot (metadata claimed first, then
    /// bytes) before `Expired` is returned; that keeps expiry correct even
    /// for files nothing else ever touches. A record whose bytes are missing
    /// on disk is treated as corrupt: the stale metadata is removed and the
    /// caller sees `NotFound`.
    #[instrument(skip(self))]
    pub async fn retrieve(&self, id: &str) -> Result<(FileRecord, Bytes), LifecycleError> {
        let record = self.checked_record(id).await?;

        let data = match self.blobs.get(&record.storage_path).await {
            Ok(data) => data,
            Err(BlobError::NotFound(_)) => {
                // Bytes vanished between the existence check and the read.
                self.registry.delete(id).await?;
                return Err(LifecycleError::NotFound(id.to_owned()));
            }
            Err(e) => return Err(LifecycleError::Storage(e.to_string())),
        };

        self.metrics.increment_downloads();
        Ok((record, data))
    }

    /// Fetch a record without reading its bytes.
    ///
    /// Applies the same expiry and disk-presence checks as
    /// [`retrieve`](Self::retrieve), including the lazy reap.
    pub async fn describe(&self, id: &str) -> Result<FileRecord, LifecycleError> {
        self.checked_record(id).await
    }

    /// Shared validity checks: lookup, lazy reap on expiry, self-heal on
    /// missing bytes.
    async fn checked_record(&self, id: &str) -> Result<FileRecord, LifecycleError> {
        let Some(record) = self.registry.get(id).await? else {
            return Err(LifecycleError::NotFound(id.to_owned()));
        };

        if record.is_expired(Utc::now()) {
            if self.registry.delete(id).await? {
                // This caller won the claim; remove the bytes too.
                self.delete_blob_counting_leaks(&record).await;
                self.metrics.increment_reaped_on_access();
                debug!(id, "expired record reaped on access");
            }
            return Err(LifecycleError::Expired(id.to_owned()));
        }

        if !self.blobs.exists(&record.storage_path).await {
            self.registry.delete(id).await?;
            warn!(id, "blob missing on disk, purged stale record");
            return Err(LifecycleError::NotFound(id.to_owned()));
        }

        Ok(record)
    }

    /// List non-expired records, newest first, with 1-based pagination.
    ///
    /// A `page` or `limit` of zero yields an empty page rather than an
    /// error; out-of-range pages yield empty pages with the true totals.
    pub async fn list(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<FileRecord>, Pagination), LifecycleError> {
        let now = Utc::now();
        let mut records: Vec<FileRecord> = self
            .registry
            .snapshot()
            .await?
            .into_iter()
            .filter(|record| !record.is_expired(now))
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

        let total = records.len() as u64;
        let total_pages = if limit == 0 { 0 } else { total.div_ceil(limit) };

        let page_records = if page == 0 || limit == 0 {
            Vec::new()
        } else {
            let start = usize::try_from((page - 1).saturating_mul(limit)).unwrap_or(usize::MAX);
            records
                .into_iter()
                .skip(start)
                .take(usize::try_from(limit).unwrap_or(usize::MAX))
                .collect()
        };

        Ok((
            page_records,
            Pagination {
                page,
                limit,
                total,
                total_pages,
            },
        ))
    }

    /// Sweep the registry and purge every expired record.
    ///
    /// Metadata is removed first (the claim), then bytes best-effort; a
    /// failed byte delete is counted as a leak, never a sweep failure.
    /// Running twice in a row with no new expirations purges zero the
    /// second time.
    pub async fn reconcile(&self) -> Result<ReconcileReport, LifecycleError> {
        let now = Utc::now();
        let mut report = ReconcileReport::default();

        for record in self.registry.snapshot().await? {
            if !record.is_expired(now) {
                continue;
            }
            // A concurrent lazy reap may have claimed this record already.
            if !self.registry.delete(&record.id).await? {
                continue;
            }
            report.purged += 1;
            if !self.delete_blob_counting_leaks(&record).await {
                report.leaked_blobs += 1;
            }
        }

        self.metrics.add_swept(report.purged);
        if report.purged > 0 {
            info!(
                purged = report.purged,
                leaked = report.leaked_blobs,
                "reconciliation purged expired files"
            );
        }

        Ok(report)
    }

    /// Delete a record's bytes, bumping the leak counter when the blob is
    /// still on disk afterwards. Returns `true` if the disk is clean.
    async fn delete_blob_counting_leaks(&self, record: &FileRecord) -> bool {
        if self.blobs.delete(&record.storage_path).await {
            return true;
        }
        if self.blobs.exists(&record.storage_path).await {
            self.metrics.add_leaked_blobs(1);
            return false;
        }
        // Already gone: someone else cleaned up, nothing leaked.
        true
    }
}
