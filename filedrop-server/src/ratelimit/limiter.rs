use dashmap::DashMap;
use tokio::time::Instant;

use crate::config::RateLimitConfig;

/// Bucket used when no client address header is present.
/// All such clients share a single window.
pub const ANONYMOUS_BUCKET: &str = "_anonymous";

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    /// The configured per-window limit.
    pub limit: u64,
    /// Remaining requests in the current window.
    pub remaining: u64,
    /// Seconds until the current window resets.
    pub reset_after: u64,
}

/// Error returned when the rate limit is exceeded.
#[derive(Debug)]
pub struct RateLimitExceeded {
    /// Seconds until the caller can retry.
    pub retry_after: u64,
    /// The configured limit.
    pub limit: u64,
}

/// Counter state for one client's current window.
#[derive(Debug, Clone, Copy)]
struct Window {
    count: u64,
    reset_at: Instant,
}

/// In-process fixed-window rate limiter.
///
/// Each client bucket gets at most `max_requests` requests per
/// `window`; the counter resets when the window elapses. Stale windows are
/// replaced lazily on the next request from the same bucket.
#[derive(Debug)]
pub struct RateLimiter {
    windows: DashMap<String, Window>,
    window: std::time::Duration,
    max_requests: u64,
}

impl RateLimiter {
    /// Create a limiter from the server's rate limit configuration.
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            windows: DashMap::new(),
            window: std::time::Duration::from_secs(config.window_seconds),
            max_requests: config.max_requests,
        }
    }

    /// Check and record a request for the given bucket.
    ///
    /// Returns `Ok(RateLimitResult)` if allowed, `Err(RateLimitExceeded)` if
    /// blocked.
    pub fn check(&self, bucket: &str) -> Result<RateLimitResult, RateLimitExceeded> {
        let now = Instant::now();

        // Evict elapsed windows so the map tracks active clients only.
        self.windows.retain(|_, window| now < window.reset_at);

        let mut entry = self
            .windows
            .entry(bucket.to_owned())
            .or_insert_with(|| Window {
                count: 0,
                reset_at: now + self.window,
            });

        if now >= entry.reset_at {
            // Window elapsed: start a fresh one.
            entry.count = 0;
            entry.reset_at = now + self.window;
        }

        let reset_after = entry.reset_at.saturating_duration_since(now).as_secs();
        if entry.count >= self.max_requests {
            return Err(RateLimitExceeded {
                retry_after: reset_after.max(1),
                limit: self.max_requests,
            });
        }

        entry.count += 1;
        Ok(RateLimitResult {
            limit: self.max_requests,
            remaining: self.max_requests - entry.count,
            reset_after,
        })
    }

    /// Number of client buckets currently tracked.
    pub fn tracked_buckets(&self) -> usize {
        self.windows.len()
    }
}
