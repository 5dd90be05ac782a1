//! Errors for the shared primitives.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SharedError {
    /// The actor's role does not grant the permission.
    #[error("{subject} is not allowed to perform {permission}")]
    Forbidden {
        subject: String,
        permission: &'static str,
    },

    #[error("unknown role: {role}")]
    UnknownRole { role: String },

    #[error("invalid page request: {reason}")]
    InvalidPage { reason: String },
}
