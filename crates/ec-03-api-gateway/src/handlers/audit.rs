//! `/api/v1/logs/audit` routes.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use ec_02_change_log::RetentionPolicy;
use serde::Deserialize;
use shared_types::{Actor, PageRequest, Permission, DEFAULT_PER_PAGE};
use tracing::info;

use super::{authorize, message, respond, ApiResult, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct AuditListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRetentionParams {
    pub days: u32,
}

/// Newest entries first.
pub async fn list_audit_logs(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    query: Result<Query<AuditListQuery>, QueryRejection>,
) -> ApiResult {
    authorize(&actor, Permission::AuditRead)?;
    let Query(query) = query?;
    let request = PageRequest::new(
        query.page.unwrap_or(1),
        query.per_page.unwrap_or(DEFAULT_PER_PAGE),
    )?;
    Ok(respond(StatusCode::OK, state.audit.list(request)?))
}

pub async fn get_audit_retention(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult {
    authorize(&actor, Permission::AuditRead)?;
    Ok(respond(StatusCode::OK, state.audit.retention()?))
}

pub async fn update_audit_retention(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    payload: Result<Json<UpdateRetentionParams>, JsonRejection>,
) -> ApiResult {
    authorize(&actor, Permission::AuditUpdate)?;
    let Json(params) = payload?;
    let policy = RetentionPolicy::new(params.days)?;
    state.audit.set_retention(policy)?;
    info!(subject = %actor.subject, days = policy.days, "Audit log retention updated");
    Ok(message(
        StatusCode::OK,
        "Audit log retention policy updated successfully",
    ))
}
