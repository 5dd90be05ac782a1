pub mod clock;
pub mod file;
pub mod memory;

pub use clock::{ManualTimeSource, SystemTimeSource};
pub use file::FileAuditLog;
pub use memory::InMemoryAuditLog;
