use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters tracking file lifecycle activity.
///
/// All counters use relaxed ordering. For a consistent point-in-time view,
/// call [`snapshot`](Self::snapshot).
#[derive(Debug, Default)]
pub struct LifecycleMetrics {
    /// Files successfully ingested.
    pub uploads: AtomicU64,
    /// Successful byte retrievals.
    pub downloads: AtomicU64,
    /// Expired records reaped lazily on access.
    pub reaped_on_access: AtomicU64,
    /// Expired records purged by reconciliation sweeps.
    pub swept: AtomicU64,
    /// Records whose metadata was purged but whose bytes could not be
    /// deleted. A growing value means disk space is leaking.
    pub leaked_blobs: AtomicU64,
}

impl LifecycleMetrics {
    /// Increment the uploads counter.
    pub fn increment_uploads(&self) {
        self.uploads.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the downloads counter.
    pub fn increment_downloads(&self) {
        self.downloads.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the lazily-reaped counter.
    pub fn increment_reaped_on_access(&self) {
        self.reaped_on_access.fetch_add(1, Ordering::Relaxed);
    }

    /// Add to the swept counter.
    pub fn add_swept(&self, count: u64) {
        self.swept.fetch_add(count, Ordering::Relaxed);
    }

    /// Add to the leaked-blobs counter.
    pub fn add_leaked_blobs(&self, count: u64) {
        self.leaked_blobs.fetch_add(count, Ordering::Relaxed);
    }

    /// Take a consistent point-in-time snapshot of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uploads: self.uploads.load(Ordering::Relaxed),
            downloads: self.downloads.load(Ordering::Relaxed),
            reaped_on_access: self.reaped_on_access.load(Ordering::Relaxed),
            swept: self.swept.load(Ordering::Relaxed),
            leaked_blobs: self.leaked_blobs.load(Ordering::Relaxed),
        }
    }
}

/// A plain data snapshot of [`LifecycleMetrics`] at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Files successfully ingested.
    pub uploads: u64,
    /// Successful byte retrievals.
    pub downloads: u64,
    /// Expired records reaped lazily on access.
    pub reaped_on_access: u64,
    /// Expired records purged by reconciliation sweeps.
    pub swept: u64,
    /// Metadata purges whose blob delete failed.
    pub leaked_blobs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let snap = LifecycleMetrics::default().snapshot();
        assert_eq!(snap.uploads, 0);
        assert_eq!(snap.downloads, 0);
        assert_eq!(snap.reaped_on_access, 0);
        assert_eq!(snap.swept, 0);
        assert_eq!(snap.leaked_blobs, 0);
    }

    #[test]
    fn increment_and_snapshot() {
        let m = LifecycleMetrics::default();
        m.increment_uploads();
        m.increment_uploads();
        m.increment_downloads();
        m.increment_reaped_on_access();
        m.add_swept(3);
        m.add_leaked_blobs(1);

        let snap = m.snapshot();
        assert_eq!(snap.uploads, 2);
        assert_eq!(snap.downloads, 1);
        assert_eq!(snap.reaped_on_access, 1);
        assert_eq!(snap.swept, 3);
        assert_eq!(snap.leaked_blobs, 1);
    }
}
