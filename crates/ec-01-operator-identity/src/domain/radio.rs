//! Radios (gNBs) known to the local registry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::value_objects::{Plmn, Tac};

/// Attachment request as received.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RadioRequest {
    pub name: String,
    pub mcc: String,
    pub mnc: String,
    pub tac: String,
}

/// A validated attachment request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioRegistration {
    pub name: String,
    pub plmn: Plmn,
    pub tac: Tac,
}

impl RadioRegistration {
    pub fn attach(self, at: DateTime<Utc>) -> AttachedRadio {
        AttachedRadio {
            name: self.name,
            plmn: self.plmn,
            tac: self.tac,
            attached_at: at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachedRadio {
    pub name: String,
    #[serde(flatten)]
    pub plmn: Plmn,
    pub tac: Tac,
    pub attached_at: DateTime<Utc>,
}
