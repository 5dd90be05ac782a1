pub mod digest;
pub mod entry;
pub mod errors;
pub mod journal;
pub mod retention;

pub use digest::value_digest;
pub use entry::{AuditEntry, AuditLevel, Impact, NewAuditEntry, Outcome};
pub use errors::{ChangeLogError, ChangeLogResult};
pub use journal::Journal;
pub use retention::{RetentionPolicy, DEFAULT_RETENTION_DAYS, MAX_RETENTION_DAYS};
