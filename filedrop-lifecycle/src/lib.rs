pub mod error;
pub mod manager;
pub mod metrics;
pub mod scheduler;

pub use error::LifecycleError;
pub use manager::{IngestLimits, LifecycleManager, Pagination, ReconcileReport};
pub use metrics::{LifecycleMetrics, MetricsSnapshot};
pub use scheduler::{CleanupScheduler, SchedulerHandle};
