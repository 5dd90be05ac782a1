//! Configuration sub-resources addressed by mutations and audit entries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A scoped part of the operator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubResource {
    Id,
    Slice,
    Tracking,
    Code,
    HomeNetwork,
    N3,
}

impl SubResource {
    pub const ALL: [SubResource; 6] = [
        SubResource::Id,
        SubResource::Slice,
        SubResource::Tracking,
        SubResource::Code,
        SubResource::HomeNetwork,
        SubResource::N3,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubResource::Id => "id",
            SubResource::Slice => "slice",
            SubResource::Tracking => "tracking",
            SubResource::Code => "code",
            SubResource::HomeNetwork => "home-network",
            SubResource::N3 => "n3",
        }
    }

    /// Audit action name for an update of this sub-resource.
    pub fn update_action(&self) -> &'static str {
        match self {
            SubResource::Id => "update_operator_id",
            SubResource::Slice => "update_operator_slice",
            SubResource::Tracking => "update_operator_tracking",
            SubResource::Code => "update_operator_code",
            SubResource::HomeNetwork => "update_operator_home_network",
            SubResource::N3 => "update_n3_interface",
        }
    }

    /// Whether the stored value is secret material.
    pub fn is_secret(&self) -> bool {
        matches!(self, SubResource::Code | SubResource::HomeNetwork)
    }
}

impl fmt::Display for SubResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
