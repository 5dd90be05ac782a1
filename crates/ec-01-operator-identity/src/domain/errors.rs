//! # Domain Errors
//!
//! Error types for the operator configuration subsystem.
//!
//! - `ConflictError` - business-rule rejections, returned to the caller as-is
//! - `StoreError` - persistence failures, fatal for the request only
//! - `NotFoundError` - reads before initialization, unknown radios
//! - `OperatorError` - what the enforcer's API returns

use shared_types::{SharedError, SubResource};
use thiserror::Error;

use super::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConflictError {
    /// The slice was not replaced as requested. Overwrite semantics make this
    /// unreachable unless the record update itself is wrong.
    #[error("exactly one network slice is supported")]
    SliceAlreadyUnique,

    #[error("cannot change PLMN from {plmn}: radios attached: {}", .radios.join(", "))]
    ActiveRadiosPresent { plmn: String, radios: Vec<String> },

    #[error("{0}")]
    ValidationFailed(ValidationError),

    /// The radio registry did not confirm; the change is staged, not committed.
    #[error("PLMN change to {target} is staged pending radio confirmation: {reason}")]
    ConfirmationPending { target: String, reason: String },

    #[error("radio {radio} not admitted: {reason}")]
    RadioNotAdmitted { radio: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{resource} has not been initialized")]
    NotInitialized { resource: SubResource },

    #[error("persistence failure: {reason}")]
    IOFailure { reason: String },

    #[error("stored operator record is corrupted: {reason}")]
    Corrupted { reason: String },

    /// Another process holds the data directory.
    #[error("data directory is locked: {reason}")]
    Locked { reason: String },
}

impl StoreError {
    pub(crate) fn io(context: &str, err: impl std::fmt::Display) -> Self {
        StoreError::IOFailure {
            reason: format!("{}: {}", context, err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFoundError {
    #[error("{resource} has not been initialized")]
    NotInitialized { resource: SubResource },

    #[error("radio {name} is not attached")]
    Radio { name: String },

    #[error("no PLMN change is staged")]
    NoStagedChange,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("radio registry unavailable: {reason}")]
pub struct RegistryError {
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperatorError {
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Forbidden(#[from] SharedError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Admission did not finish within the pre-commit timeout. Nothing was applied.
    #[error("timed out waiting for {phase}")]
    PrecommitTimeout { phase: &'static str },
}

impl From<ValidationError> for OperatorError {
    fn from(err: ValidationError) -> Self {
        OperatorError::Conflict(ConflictError::ValidationFailed(err))
    }
}

pub type OperatorResult<T> = Result<T, OperatorError>;
