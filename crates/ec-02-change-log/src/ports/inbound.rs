//! # Inbound Ports (Driving Ports)
//!
//! The API the configuration service and the HTTP gateway use to write and
//! read the audit trail.

use shared_types::{Page, PageRequest};

use crate::domain::{AuditEntry, ChangeLogResult, NewAuditEntry, RetentionPolicy};

/// Append-only audit trail.
///
/// Implementations must enforce:
/// - `record` returns only after the entry is durable for the backend
/// - ids are strictly increasing and never reused
/// - entries are never modified after `record` returns
pub trait AuditSink: Send + Sync {
    /// Durably append an entry and return it as stored.
    fn record(&self, entry: NewAuditEntry) -> ChangeLogResult<AuditEntry>;

    /// List entries newest first.
    fn list(&self, request: PageRequest) -> ChangeLogResult<Page<AuditEntry>>;

    /// Remove entries older than `retention_days`. Returns how many were removed.
    fn clear_before(&self, retention_days: u32) -> ChangeLogResult<usize>;

    fn retention(&self) -> ChangeLogResult<RetentionPolicy>;

    fn set_retention(&self, policy: RetentionPolicy) -> ChangeLogResult<()>;
}
