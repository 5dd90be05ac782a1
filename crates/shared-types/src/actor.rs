//! # Actor Identity
//!
//! The authenticated caller of a configuration request. Authentication itself
//! happens at the HTTP edge; everything below it receives an `Actor`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use crate::errors::SharedError;

/// Role assigned to an API token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Admin,
    NetworkManager,
    #[serde(rename = "readonly")]
    ReadOnly,
    /// Internal actor used for bootstrap and background tasks.
    #[serde(skip_deserializing)]
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::NetworkManager => "network-manager",
            Role::ReadOnly => "readonly",
            Role::System => "system",
        }
    }

    /// Whether this role grants `permission`.
    pub fn allows(&self, permission: Permission) -> bool {
        match self {
            Role::Admin | Role::System => true,
            Role::NetworkManager => !matches!(permission, Permission::AuditUpdate),
            Role::ReadOnly => permission.is_read(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "network-manager" => Ok(Role::NetworkManager),
            "readonly" => Ok(Role::ReadOnly),
            other => Err(SharedError::UnknownRole {
                role: other.to_string(),
            }),
        }
    }
}

/// Fine-grained permission checked per route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    OperatorRead,
    OperatorUpdateId,
    OperatorUpdateSlice,
    OperatorUpdateTracking,
    OperatorUpdateCode,
    OperatorUpdateHomeNetwork,
    NetworkingRead,
    NetworkingUpdate,
    AuditRead,
    AuditUpdate,
    RadiosRead,
    RadiosManage,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::OperatorRead => "operator:read",
            Permission::OperatorUpdateId => "operator:update_id",
            Permission::OperatorUpdateSlice => "operator:update_slice",
            Permission::OperatorUpdateTracking => "operator:update_tracking",
            Permission::OperatorUpdateCode => "operator:update_code",
            Permission::OperatorUpdateHomeNetwork => "operator:update_home_network",
            Permission::NetworkingRead => "networking:read",
            Permission::NetworkingUpdate => "networking:update",
            Permission::AuditRead => "audit:read",
            Permission::AuditUpdate => "audit:update",
            Permission::RadiosRead => "radios:read",
            Permission::RadiosManage => "radios:manage",
        }
    }

    pub fn is_read(&self) -> bool {
        matches!(
            self,
            Permission::OperatorRead
                | Permission::NetworkingRead
                | Permission::AuditRead
                | Permission::RadiosRead
        )
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Token subject, usually an email address.
    pub subject: String,
    pub role: Role,
    /// Client address as seen by the gateway, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<IpAddr>,
}

impl Actor {
    pub fn new(subject: impl Into<String>, role: Role) -> Self {
        Self {
            subject: subject.into(),
            role,
            origin: None,
        }
    }

    /// The internal actor used by bootstrap and the retention reaper.
    pub fn system() -> Self {
        Self::new("system", Role::System)
    }

    pub fn with_origin(mut self, origin: IpAddr) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn can(&self, permission: Permission) -> bool {
        self.role.allows(permission)
    }

    /// Fails with `SharedError::Forbidden` when the role lacks `permission`.
    pub fn require(&self, permission: Permission) -> Result<(), SharedError> {
        if self.can(permission) {
            Ok(())
        } else {
            Err(SharedError::Forbidden {
                subject: self.subject.clone(),
                permission: permission.as_str(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readonly_only_reads() {
        assert!(Role::ReadOnly.allows(Permission::OperatorRead));
        assert!(Role::ReadOnly.allows(Permission::AuditRead));
        assert!(!Role::ReadOnly.allows(Permission::OperatorUpdateSlice));
        assert!(!Role::ReadOnly.allows(Permission::RadiosManage));
    }

    #[test]
    fn test_network_manager_cannot_change_retention() {
        assert!(Role::NetworkManager.allows(Permission::OperatorUpdateCode));
        assert!(Role::NetworkManager.allows(Permission::AuditRead));
        assert!(!Role::NetworkManager.allows(Permission::AuditUpdate));
    }

    #[test]
    fn test_require_reports_permission() {
        let actor = Actor::new("viewer@ella", Role::ReadOnly);
        let err = actor.require(Permission::OperatorUpdateId).unwrap_err();
        assert!(err.to_string().contains("operator:update_id"));
    }

    #[test]
    fn test_role_round_trip_names() {
        for role in [Role::Admin, Role::NetworkManager, Role::ReadOnly] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("root".parse::<Role>().is_err());
        assert!("system".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_names() {
        let json = serde_json::to_string(&Role::ReadOnly).unwrap();
        assert_eq!(json, "\"readonly\"");
        let role: Role = serde_json::from_str("\"network-manager\"").unwrap();
        assert_eq!(role, Role::NetworkManager);
    }
}
