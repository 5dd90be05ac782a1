//! Route handlers.
//!
//! Success responses are `{"result": T}`. Each handler checks the permission
//! its route needs before reading the body, so a caller without the
//! permission gets 403 even for malformed input.

pub mod audit;
pub mod networking;
pub mod operator;
pub mod radios;
pub mod status;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ec_01_operator_identity::{ApplyReceipt, MutationRequest, OperatorConfigApi};
use ec_02_change_log::AuditSink;
use serde::Serialize;
use serde_json::json;
use shared_types::{Actor, Permission};
use std::sync::Arc;

use crate::domain::error::ApiError;

pub type ApiResult = Result<Response, ApiError>;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub operator: Arc<dyn OperatorConfigApi>,
    pub audit: Arc<dyn AuditSink>,
}

impl AppState {
    pub fn new(operator: Arc<dyn OperatorConfigApi>, audit: Arc<dyn AuditSink>) -> Self {
        Self { operator, audit }
    }
}

pub(crate) fn authorize(actor: &Actor, permission: Permission) -> Result<(), ApiError> {
    actor.require(permission).map_err(ApiError::from)
}

pub(crate) fn respond<T: Serialize>(status: StatusCode, result: T) -> Response {
    (status, Json(json!({ "result": result }))).into_response()
}

pub(crate) fn message(status: StatusCode, text: &str) -> Response {
    respond(status, json!({ "message": text }))
}

/// Run a mutation on its own task.
///
/// Dropping the request future (client disconnect, gateway timeout) does not
/// cancel the spawned task, so an admitted mutation always finishes.
pub(crate) async fn apply_detached(
    state: &AppState,
    actor: Actor,
    request: MutationRequest,
) -> Result<ApplyReceipt, ApiError> {
    let operator = Arc::clone(&state.operator);
    let receipt = tokio::spawn(async move { operator.apply(&actor, request).await })
        .await
        .map_err(ApiError::internal)??;
    Ok(receipt)
}
