//! # Audit Entries
//!
//! An `AuditEntry` is immutable once written. Callers build a `NewAuditEntry`;
//! the log assigns the sequence id, timestamp and level when recording it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{Actor, Role, SubResource};
use uuid::Uuid;

/// Result of a mutation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Accepted,
    Rejected { reason: String },
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted)
    }
}

/// How disruptive an accepted change is for attached radios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    #[default]
    Normal,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditLevel {
    Info,
    Warn,
}

/// A recorded audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Monotonic sequence number assigned by the log.
    pub id: u64,
    /// Correlates the write-ahead entry with a follow-up failure entry.
    pub request_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub level: AuditLevel,
    pub actor: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    pub action: String,
    pub resource: SubResource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_digest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_digest: Option<String>,
    pub outcome: Outcome,
    #[serde(default)]
    pub impact: Impact,
    pub details: String,
}

/// An entry waiting to be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditEntry {
    pub request_id: Uuid,
    pub actor: String,
    pub role: Role,
    pub ip: Option<String>,
    pub resource: SubResource,
    pub previous_digest: Option<String>,
    pub new_digest: Option<String>,
    pub outcome: Outcome,
    pub impact: Impact,
    pub details: String,
}

impl NewAuditEntry {
    /// Start an accepted entry for `resource`.
    pub fn new(request_id: Uuid, actor: &Actor, resource: SubResource) -> Self {
        Self {
            request_id,
            actor: actor.subject.clone(),
            role: actor.role,
            ip: actor.origin.map(|ip| ip.to_string()),
            resource,
            previous_digest: None,
            new_digest: None,
            outcome: Outcome::Accepted,
            impact: Impact::Normal,
            details: String::new(),
        }
    }

    pub fn with_digests(mut self, previous: Option<String>, new: Option<String>) -> Self {
        self.previous_digest = previous;
        self.new_digest = new;
        self
    }

    pub fn with_impact(mut self, impact: Impact) -> Self {
        self.impact = impact;
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }

    pub fn rejected(mut self, reason: impl Into<String>) -> Self {
        self.outcome = Outcome::Rejected {
            reason: reason.into(),
        };
        self
    }

    /// Seal the entry with the log-assigned fields.
    pub fn into_entry(self, id: u64, timestamp: DateTime<Utc>) -> AuditEntry {
        let level = if self.outcome.is_accepted() && self.impact == Impact::Normal {
            AuditLevel::Info
        } else {
            AuditLevel::Warn
        };
        AuditEntry {
            id,
            request_id: self.request_id,
            timestamp,
            level,
            actor: self.actor,
            role: self.role,
            ip: self.ip,
            action: self.resource.update_action().to_string(),
            resource: self.resource,
            previous_digest: self.previous_digest,
            new_digest: self.new_digest,
            outcome: self.outcome,
            impact: self.impact,
            details: self.details,
        }
    }
}
