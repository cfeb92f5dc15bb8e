//! Periodic reconciliation sweeps.
//!
//! The scheduler owns the only background task in the service. Each tick
//! runs one [`LifecycleManager::reconcile`] pass; the pass is awaited inside
//! the loop, so runs can never overlap, and a tick that fires while a sweep
//! is still in progress is skipped rather than queued.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info};

use crate::manager::LifecycleManager;

/// Periodic trigger for expiry reconciliation.
pub struct CleanupScheduler {
    lifecycle: Arc<LifecycleManager>,
    period: Duration,
    shutdown_rx: mpsc::Receiver<()>,
}

impl CleanupScheduler {
    /// Spawn the scheduler as a background task, returning a handle that
    /// stops it on shutdown.
    pub fn spawn(lifecycle: Arc<LifecycleManager>, period: Duration) -> SchedulerHandle {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let scheduler = Self {
            lifecycle,
            period,
            shutdown_rx,
        };
        let task = tokio::spawn(scheduler.run());
        SchedulerHandle { shutdown_tx, task }
    }

    /// Run sweeps until shutdown is signaled.
    async fn run(mut self) {
        info!(period_secs = self.period.as_secs(), "cleanup scheduler starting");

        let mut timer = interval(self.period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately; skip it so we don't sweep
        // at startup.
        timer.tick().await;

        loop {
            tokio::select! {
                _ = self.shutdown_rx.recv() => {
                    info!("cleanup scheduler received shutdown signal");
                    break;
                }
                _ = timer.tick() => {
                    // A failed sweep is logged and must not stop the loop.
                    match self.lifecycle.reconcile().await {
                        Ok(report) if report.purged == 0 => {}
                        Ok(report) => {
                            info!(
                                purged = report.purged,
                                leaked = report.leaked_blobs,
                                "cleanup sweep removed expired files"
                            );
                        }
                        Err(e) => error!(error = %e, "cleanup sweep failed"),
                    }
                }
            }
        }
    }
}

/// Handle to a running [`CleanupScheduler`].
pub struct SchedulerHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stop scheduling future sweeps and wait for the task to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        let _ = self.task.await;
    }
}
