//! Periodic retention enforcement.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::domain::ChangeLogResult;
use crate::ports::AuditSink;

/// Removes audit entries older than the configured retention policy.
pub struct RetentionReaper {
    sink: Arc<dyn AuditSink>,
    interval: Duration,
}

impl RetentionReaper {
    pub fn new(sink: Arc<dyn AuditSink>, interval: Duration) -> Self {
        Self { sink, interval }
    }

    /// Apply the current policy once. Returns the number of entries removed.
    pub fn run_once(&self) -> ChangeLogResult<usize> {
        let policy = self.sink.retention()?;
        let removed = self.sink.clear_before(policy.days)?;
        if removed > 0 {
            ella_telemetry::AUDIT_ENTRIES_REAPED.inc_by(removed as f64);
            info!(removed, retention_days = policy.days, "Purged expired audit entries");
        } else {
            debug!(retention_days = policy.days, "No expired audit entries");
        }
        Ok(removed)
    }

    /// Run until `shutdown` flips to `true`.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.run_once() {
                        error!(error = %e, "Audit retention pass failed");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        debug!("Retention reaper stopping");
                        break;
                    }
                }
            }
        }
    }
}
