//! # Staged PLMN Changes
//!
//! A PLMN change moves through explicit states:
//!
//! ```text
//! prepare() ──► PreparedIdentityChange ──confirm(radios)──► ConfirmedIdentityChange ──► commit
//!                       │                        │
//!                       │ registry unavailable   └──────────► AbortedIdentityChange
//!                       ▼
//!                 held as staged (not committed)
//! ```
//!
//! The guard and the mutation live in the same value, so the mutation that gets
//! committed is always the one that was checked.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::entities::OperatorIdentity;
use super::errors::ConflictError;
use super::invariants::radios_in_scope;
use super::mutation::Mutation;
use super::radio::AttachedRadio;
use super::value_objects::{Plmn, TacSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedIdentityChange {
    request_id: Uuid,
    requested_by: String,
    current: Option<Plmn>,
    target: Plmn,
    tracking: Option<TacSet>,
    prepared_at: DateTime<Utc>,
}

impl PreparedIdentityChange {
    /// Capture the current PLMN and tracking areas against which the guard runs.
    pub fn prepare(
        request_id: Uuid,
        requested_by: impl Into<String>,
        identity: &OperatorIdentity,
        target: Plmn,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            request_id,
            requested_by: requested_by.into(),
            current: identity.plmn.clone(),
            target,
            tracking: identity.tracking.clone(),
            prepared_at: now,
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn target(&self) -> &Plmn {
        &self.target
    }

    /// The target equals the stored PLMN.
    pub fn is_noop(&self) -> bool {
        self.current.as_ref() == Some(&self.target)
    }

    /// Whether the guard needs a registry snapshot. A first-time identity or a
    /// no-op cannot strand any radio.
    pub fn needs_confirmation(&self) -> bool {
        self.current.is_some() && !self.is_noop()
    }

    /// Run the guard against a registry snapshot.
    pub fn confirm(
        self,
        radios: &[AttachedRadio],
    ) -> Result<ConfirmedIdentityChange, AbortedIdentityChange> {
        let blocking: Vec<String> = match (&self.current, self.needs_confirmation()) {
            (Some(current), true) => radios_in_scope(radios, current, self.tracking.as_ref())
                .into_iter()
                .map(|radio| radio.name.clone())
                .collect(),
            _ => Vec::new(),
        };

        if blocking.is_empty() {
            Ok(ConfirmedIdentityChange {
                request_id: self.request_id,
                target: self.target,
            })
        } else {
            Err(AbortedIdentityChange {
                prepared: self,
                blocking,
            })
        }
    }

    pub fn view(&self) -> StagedChangeView {
        StagedChangeView {
            request_id: self.request_id,
            requested_by: self.requested_by.clone(),
            current: self.current.clone(),
            target: self.target.clone(),
            prepared_at: self.prepared_at,
        }
    }
}

/// Passed the guard; ready to commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedIdentityChange {
    request_id: Uuid,
    target: Plmn,
}

impl ConfirmedIdentityChange {
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn into_mutation(self) -> Mutation {
        Mutation::SetIdentity(self.target)
    }
}

/// Failed the guard; nothing is committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbortedIdentityChange {
    pub prepared: PreparedIdentityChange,
    pub blocking: Vec<String>,
}

impl AbortedIdentityChange {
    pub fn into_conflict(self) -> ConflictError {
        ConflictError::ActiveRadiosPresent {
            plmn: self
                .prepared
                .current
                .map(|p| p.to_string())
                .unwrap_or_default(),
            radios: self.blocking,
        }
    }
}

/// External view of a change awaiting radio confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagedChangeView {
    pub request_id: Uuid,
    pub requested_by: String,
    pub current: Option<Plmn>,
    pub target: Plmn,
    pub prepared_at: DateTime<Utc>,
}
