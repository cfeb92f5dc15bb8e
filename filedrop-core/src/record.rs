use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for a stored file.
///
/// Records are immutable once created. Expiry is a computed property of
/// [`expires_at`](Self::expires_at) against the clock, never a stored flag,
/// so there is no status field that can drift from wall-clock reality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    /// Opaque unique identifier, the sole external reference.
    pub id: String,
    /// Client-supplied display name, preserved verbatim for downloads.
    pub original_name: String,
    /// Sanitized, id-prefixed name used as the on-disk filename.
    pub storage_name: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// MIME content type, best-effort from the client.
    pub mime_type: String,
    /// Lower-cased extension derived from the original name (e.g. `".pdf"`).
    pub extension: String,
    /// When the file was uploaded.
    pub created_at: DateTime<Utc>,
    /// When the file expires. `None` means it never expires.
    pub expires_at: Option<DateTime<Utc>>,
    /// Location of the bytes on disk, owned by the blob store.
    pub storage_path: PathBuf,
}

impl FileRecord {
    /// Returns `true` if this record has passed its expiry deadline.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

/// Render a byte count as a human-readable label, e.g. `"1.5 MB"`.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_owned();
    }
    let exp = ((bytes as f64).ln() / 1024_f64.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024_f64.powi(exp as i32);
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded} {}", UNITS[exp])
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn record(expires_at: Option<DateTime<Utc>>) -> FileRecord {
        FileRecord {
            id: "deadbeef".into(),
            original_name: "report.pdf".into(),
            storage_name: "deadbeef_report.pdf".into(),
            size_bytes: 42,
            mime_type: "application/pdf".into(),
            extension: ".pdf".into(),
            created_at: Utc::now(),
            expires_at,
            storage_path: PathBuf::from("/tmp/deadbeef_report.pdf"),
        }
    }

    #[test]
    fn never_expires_without_deadline() {
        let rec = record(None);
        let far_future = Utc::now() + Duration::days(10_000);
        assert!(!rec.is_expired(far_future));
    }

    #[test]
    fn expired_at_and_after_deadline() {
        let deadline = Utc::now();
        let rec = record(Some(deadline));
        assert!(!rec.is_expired(deadline - Duration::seconds(1)));
        assert!(rec.is_expired(deadline));
        assert!(rec.is_expired(deadline + Duration::seconds(1)));
    }

    #[test]
    fn size_labels() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1_572_864), "1.5 MB");
    }
}
