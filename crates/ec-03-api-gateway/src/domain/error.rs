//! HTTP error envelope and the mapping from domain errors to status codes.
//!
//! Every failure is rendered as `{"error": "..."}`; validation failures add a
//! `"fields"` map naming each rejected input.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ec_01_operator_identity::{
    ConflictError, NotFoundError, OperatorError, StoreError, ValidationError,
};
use ec_02_change_log::ChangeLogError;
use serde_json::json;
use shared_types::SharedError;
use thiserror::Error;
use tracing::error;

/// A failed request as returned to the client.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub fields: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            fields: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    /// Details are logged, never sent to the client.
    pub fn internal(details: impl std::fmt::Display) -> Self {
        error!(error = %details, "Request failed with internal error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }

    pub fn validation(err: &ValidationError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: err.summary(),
            fields: serde_json::to_value(err).ok(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.fields {
            Some(fields) => json!({ "error": self.message, "fields": fields }),
            None => json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<OperatorError> for ApiError {
    fn from(err: OperatorError) -> Self {
        match err {
            OperatorError::Conflict(ConflictError::ValidationFailed(fields)) => {
                ApiError::validation(&fields)
            }
            OperatorError::Conflict(conflict) => ApiError::conflict(conflict.to_string()),
            OperatorError::NotFound(NotFoundError::NotInitialized { resource })
            | OperatorError::Store(StoreError::NotInitialized { resource }) => {
                ApiError::not_found(format!("{} has not been initialized", resource))
            }
            OperatorError::NotFound(not_found) => ApiError::not_found(not_found.to_string()),
            OperatorError::Forbidden(shared) => ApiError::from(shared),
            OperatorError::PrecommitTimeout { .. } | OperatorError::Registry(_) => {
                ApiError::unavailable(err.to_string())
            }
            OperatorError::Store(store) => ApiError::internal(store),
        }
    }
}

impl From<SharedError> for ApiError {
    fn from(err: SharedError) -> Self {
        match err {
            SharedError::Forbidden { .. } => ApiError::forbidden(err.to_string()),
            SharedError::InvalidPage { .. } | SharedError::UnknownRole { .. } => {
                ApiError::bad_request(err.to_string())
            }
        }
    }
}

impl From<ChangeLogError> for ApiError {
    fn from(err: ChangeLogError) -> Self {
        match err {
            ChangeLogError::InvalidRetention { reason } => Self {
                status: StatusCode::BAD_REQUEST,
                message: format!("days: {}", reason),
                fields: Some(json!({ "days": reason })),
            },
            other => ApiError::internal(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // 415 and 413 pass through; schema errors are plain 400s
        let status = match rejection.status() {
            StatusCode::UNPROCESSABLE_ENTITY => StatusCode::BAD_REQUEST,
            other => other,
        };
        ApiError::new(status, format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(format!("Invalid query: {}", rejection.body_text()))
    }
}

/// Gateway lifecycle errors
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Server(String),
}
