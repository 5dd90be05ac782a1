//! # Change Log (ec-02)
//!
//! Append-only audit trail for operator configuration changes.
//!
//! ## Guarantees
//!
//! | Guarantee | Description |
//! |-----------|-------------|
//! | Durable record | `record` returns only after the entry is persisted |
//! | Write-ahead | Callers record before applying the mutation described |
//! | Monotonic ids | Ids strictly increase and survive purges and restarts |
//! | No secrets | Values are stored as SHA-256 digests, never raw |
//!
//! ## Crate Structure
//!
//! - `domain/` - Entries, digests, retention policy, the shared journal
//! - `ports/` - `AuditSink` (inbound) and `TimeSource` (outbound)
//! - `adapters/` - In-memory and JSON-lines file backends, clocks
//! - `reaper` - Periodic retention enforcement

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod reaper;

pub use adapters::{FileAuditLog, InMemoryAuditLog, ManualTimeSource, SystemTimeSource};
pub use domain::{
    value_digest, AuditEntry, AuditLevel, ChangeLogError, ChangeLogResult, Impact,
    NewAuditEntry, Outcome, RetentionPolicy, DEFAULT_RETENTION_DAYS, MAX_RETENTION_DAYS,
};
pub use ports::{AuditSink, TimeSource};
pub use reaper::RetentionReaper;
