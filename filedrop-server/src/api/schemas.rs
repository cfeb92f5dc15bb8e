use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use filedrop_core::{FileRecord, RetentionPeriod, format_file_size};

/// Public view of a stored file.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileResponse {
    /// Opaque file identifier.
    #[schema(example = "9f8d3c1a2b4e5f60718293a4b5c6d7e8")]
    pub id: String,
    /// Client-supplied display name.
    #[schema(example = "report.pdf")]
    pub original_name: String,
    /// Size in bytes.
    #[schema(example = 48_221)]
    pub size_bytes: u64,
    /// Human-readable size.
    #[schema(example = "47.09 KB")]
    pub size_label: String,
    /// MIME content type.
    #[schema(example = "application/pdf")]
    pub mime_type: String,
    /// Lower-cased extension with leading dot.
    #[schema(example = ".pdf")]
    pub extension: String,
    /// Upload time.
    pub created_at: DateTime<Utc>,
    /// Expiry time; absent means the file never expires.
    pub expires_at: Option<DateTime<Utc>>,
    /// Absolute URL the file can be downloaded from.
    #[schema(example = "http://localhost:8080/v1/download/9f8d3c1a2b4e5f60718293a4b5c6d7e8")]
    pub download_url: String,
}

impl FileResponse {
    /// Build the public view from a record, resolving the download link
    /// against the configured external URL.
    pub fn from_record(record: &FileRecord, external_url: &str) -> Self {
        Self {
            id: record.id.clone(),
            original_name: record.original_name.clone(),
            size_bytes: record.size_bytes,
            size_label: format_file_size(record.size_bytes),
            mime_type: record.mime_type.clone(),
            extension: record.extension.clone(),
            created_at: record.created_at,
            expires_at: record.expires_at,
            download_url: format!("{external_url}/v1/download/{}", record.id),
        }
    }
}

/// Response returned after a successful upload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    /// Human-readable confirmation.
    #[schema(example = "File uploaded successfully")]
    pub message: String,
    /// The retention period that was applied.
    pub retention: RetentionPeriod,
    /// The stored file.
    pub file: FileResponse,
}

/// Query parameters for the listing endpoint.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListQuery {
    /// 1-based page number (default 1).
    pub page: Option<u64>,
    /// Page size, 1 to 100 (default 10).
    pub limit: Option<u64>,
}

/// One page of stored files.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListResponse {
    /// Files on this page, newest first.
    pub files: Vec<FileResponse>,
    /// Pagination envelope.
    pub pagination: PaginationResponse,
}

/// Pagination envelope for listings.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginationResponse {
    /// 1-based page number.
    #[schema(example = 1)]
    pub page: u64,
    /// Page size.
    #[schema(example = 10)]
    pub limit: u64,
    /// Total non-expired files.
    #[schema(example = 25)]
    pub total: u64,
    /// Total pages at this page size.
    #[schema(example = 3)]
    pub total_pages: u64,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status indicator.
    #[schema(example = "ok")]
    pub status: String,
    /// Current lifecycle metrics snapshot.
    pub metrics: MetricsResponse,
}

/// Lifecycle activity counters.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MetricsResponse {
    /// Files successfully ingested.
    #[schema(example = 142)]
    pub uploads: u64,
    /// Successful byte retrievals.
    #[schema(example = 890)]
    pub downloads: u64,
    /// Expired records reaped lazily on access.
    #[schema(example = 3)]
    pub reaped_on_access: u64,
    /// Expired records purged by reconciliation sweeps.
    #[schema(example = 17)]
    pub swept: u64,
    /// Metadata purges whose blob delete failed.
    #[schema(example = 0)]
    pub leaked_blobs: u64,
    /// Records currently in the registry.
    #[schema(example = 12)]
    pub live_files: u64,
}

/// Generic error response returned on failures.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    #[schema(example = "file not found: 9f8d3c1a")]
    pub error: String,
    /// Machine-readable error code.
    #[schema(example = "NOT_FOUND")]
    pub code: String,
}
