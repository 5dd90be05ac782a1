pub mod inbound;
pub mod outbound;

pub use inbound::OperatorConfigApi;
pub use outbound::{AuditSink, IdentityStore, RadioRegistry};
