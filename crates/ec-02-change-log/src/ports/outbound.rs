//! # Outbound Ports (Driven Ports)

use chrono::{DateTime, Utc};

/// Abstract interface for time operations (for testability).
pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
