//! Error types for the change log.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChangeLogError {
    /// The entry could not be made durable.
    #[error("audit log I/O failure: {reason}")]
    Io { reason: String },

    /// A persisted line could not be decoded.
    #[error("audit log corrupted at line {line}: {reason}")]
    Corrupted { line: usize, reason: String },

    #[error("invalid retention policy: {reason}")]
    InvalidRetention { reason: String },
}

impl ChangeLogError {
    pub(crate) fn io(context: &str, err: impl std::fmt::Display) -> Self {
        ChangeLogError::Io {
            reason: format!("{}: {}", context, err),
        }
    }
}

/// Result type for change log operations
pub type ChangeLogResult<T> = Result<T, ChangeLogError>;
