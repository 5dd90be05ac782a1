pub mod inbound;
pub mod outbound;

pub use inbound::AuditSink;
pub use outbound::TimeSource;
