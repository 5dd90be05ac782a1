use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::errors::{ChangeLogError, ChangeLogResult};

pub const DEFAULT_RETENTION_DAYS: u32 = 7;
/// One hundred years.
pub const MAX_RETENTION_DAYS: u32 = 36_500;

/// How long audit entries are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    pub days: u32,
}

impl RetentionPolicy {
    pub fn new(days: u32) -> ChangeLogResult<Self> {
        if days < 1 {
            return Err(ChangeLogError::InvalidRetention {
                reason: "retention days must be greater than 0".into(),
            });
        }
        if days > MAX_RETENTION_DAYS {
            return Err(ChangeLogError::InvalidRetention {
                reason: format!("retention days must be at most {}", MAX_RETENTION_DAYS),
            });
        }
        Ok(Self { days })
    }

    /// Entries strictly older than this instant are expired.
    ///
    /// Saturates at the earliest representable instant, so a policy loaded
    /// from an older metadata file can never overflow.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(Duration::days(i64::from(self.days)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            days: DEFAULT_RETENTION_DAYS,
        }
    }
}
