use std::sync::Arc;

use parking_lot::RwLock;
use shared_types::{Page, PageRequest};

use crate::adapters::clock::SystemTimeSource;
use crate::domain::{
    AuditEntry, ChangeLogResult, Journal, NewAuditEntry, RetentionPolicy,
};
use crate::ports::{AuditSink, TimeSource};

/// Volatile audit log for tests and ephemeral deployments.
pub struct InMemoryAuditLog {
    journal: RwLock<Journal>,
    clock: Arc<dyn TimeSource>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemTimeSource))
    }

    pub fn with_clock(clock: Arc<dyn TimeSource>) -> Self {
        Self {
            journal: RwLock::new(Journal::new(RetentionPolicy::default())),
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.journal.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.journal.read().is_empty()
    }

    /// All entries, oldest first.
    pub fn snapshot(&self) -> Vec<AuditEntry> {
        self.journal.read().entries().to_vec()
    }
}

impl Default for InMemoryAuditLog {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditSink for InMemoryAuditLog {
    fn record(&self, entry: NewAuditEntry) -> ChangeLogResult<AuditEntry> {
        let mut journal = self.journal.write();
        let sealed = journal.seal(entry, self.clock.now());
        journal.push(sealed.clone());
        ella_telemetry::AUDIT_ENTRIES_WRITTEN.inc();
        Ok(sealed)
    }

    fn list(&self, request: PageRequest) -> ChangeLogResult<Page<AuditEntry>> {
        Ok(self.journal.read().page(request))
    }

    fn clear_before(&self, retention_days: u32) -> ChangeLogResult<usize> {
        let cutoff = RetentionPolicy::new(retention_days)?.cutoff(self.clock.now());
        Ok(self.journal.write().purge_before(cutoff))
    }

    fn retention(&self) -> ChangeLogResult<RetentionPolicy> {
        Ok(self.journal.read().retention())
    }

    fn set_retention(&self, policy: RetentionPolicy) -> ChangeLogResult<()> {
        self.journal.write().set_retention(policy);
        Ok(())
    }
}
