//! # Journal
//!
//! The in-memory index shared by every audit backend. Entries are kept in
//! insertion order (oldest first) with strictly increasing ids; listings are
//! served newest first.

use chrono::{DateTime, Utc};
use shared_types::{Page, PageRequest};

use super::entry::{AuditEntry, NewAuditEntry};
use super::retention::RetentionPolicy;

#[derive(Debug)]
pub struct Journal {
    entries: Vec<AuditEntry>,
    next_id: u64,
    retention: RetentionPolicy,
}

impl Journal {
    pub fn new(retention: RetentionPolicy) -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
            retention,
        }
    }

    /// Rebuild from persisted entries (any order). `next_id` is the sequence
    /// high-water mark saved at the last purge, so ids are never reused.
    pub fn restore(mut entries: Vec<AuditEntry>, retention: RetentionPolicy, next_id: u64) -> Self {
        entries.sort_by_key(|e| e.id);
        let next_id = entries
            .last()
            .map(|e| e.id + 1)
            .unwrap_or(1)
            .max(next_id);
        Self {
            entries,
            next_id,
            retention,
        }
    }

    /// Seal `entry` without appending it. Use `push` once it is durable.
    pub fn seal(&self, entry: NewAuditEntry, now: DateTime<Utc>) -> AuditEntry {
        entry.into_entry(self.next_id, now)
    }

    pub fn push(&mut self, entry: AuditEntry) {
        self.next_id = self.next_id.max(entry.id + 1);
        self.entries.push(entry);
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    pub fn page(&self, request: PageRequest) -> Page<AuditEntry> {
        Page::from_ordered(
            self.entries.iter().rev().cloned(),
            self.entries.len(),
            request,
        )
    }

    /// Entries that would survive a purge at `cutoff`.
    pub fn retained_after(&self, cutoff: DateTime<Utc>) -> Vec<AuditEntry> {
        self.entries
            .iter()
            .filter(|e| e.timestamp >= cutoff)
            .cloned()
            .collect()
    }

    /// Drop entries older than `cutoff`, returning how many were removed.
    pub fn purge_before(&mut self, cutoff: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.timestamp >= cutoff);
        before - self.entries.len()
    }

    pub fn retention(&self) -> RetentionPolicy {
        self.retention
    }

    pub fn set_retention(&mut self, policy: RetentionPolicy) {
        self.retention = policy;
    }
}
