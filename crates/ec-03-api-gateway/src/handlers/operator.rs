//! `/api/v1/operator` routes.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use ec_01_operator_identity::{MutationRequest, RawSecret, SdInput};
use serde::Deserialize;
use shared_types::{Actor, Permission, SubResource};
use tracing::info;

use super::{apply_detached, authorize, message, respond, ApiResult, AppState};
use crate::domain::ApiError;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateOperatorIdParams {
    pub mcc: String,
    pub mnc: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateOperatorSliceParams {
    pub sst: Option<i64>,
    pub sd: Option<SdInput>,
}

/// The TAC list is required; an explicit `[]` disables radio attachment.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOperatorTrackingParams {
    pub supported_tacs: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOperatorCodeParams {
    pub operator_code: RawSecret,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOperatorHomeNetworkParams {
    pub private_key: RawSecret,
}

pub async fn get_operator(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult {
    authorize(&actor, Permission::OperatorRead)?;
    Ok(respond(StatusCode::OK, state.operator.view()?))
}

fn read_subresource(state: &AppState, actor: &Actor, resource: SubResource) -> ApiResult {
    authorize(actor, Permission::OperatorRead)?;
    Ok(respond(
        StatusCode::OK,
        state.operator.read_subresource(resource)?,
    ))
}

pub async fn get_operator_id(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult {
    read_subresource(&state, &actor, SubResource::Id)
}

pub async fn get_operator_slice(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult {
    read_subresource(&state, &actor, SubResource::Slice)
}

pub async fn get_operator_tracking(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult {
    read_subresource(&state, &actor, SubResource::Tracking)
}

pub async fn get_operator_home_network(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult {
    read_subresource(&state, &actor, SubResource::HomeNetwork)
}

/// A PLMN change waiting on radio confirmation, or `null`.
pub async fn get_staged_identity_change(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult {
    authorize(&actor, Permission::OperatorRead)?;
    Ok(respond(
        StatusCode::OK,
        state.operator.staged_identity_change(),
    ))
}

/// Retry the staged PLMN change now that the registry may answer again.
pub async fn commit_staged_identity_change(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult {
    authorize(&actor, Permission::OperatorUpdateId)?;
    let operator = Arc::clone(&state.operator);
    let receipt =
        tokio::spawn(async move { operator.commit_staged_identity_change(&actor).await })
            .await
            .map_err(ApiError::internal)??;
    info!(
        request_id = %receipt.request_id,
        changed = receipt.changed,
        "Staged operator ID committed"
    );
    Ok(message(StatusCode::CREATED, "Operator ID updated successfully"))
}

pub async fn discard_staged_identity_change(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult {
    authorize(&actor, Permission::OperatorUpdateId)?;
    state.operator.discard_staged_identity_change(&actor)?;
    Ok(message(StatusCode::OK, "Staged operator ID discarded"))
}

pub async fn update_operator_id(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    payload: Result<Json<UpdateOperatorIdParams>, JsonRejection>,
) -> ApiResult {
    authorize(&actor, Permission::OperatorUpdateId)?;
    let Json(params) = payload?;
    let request = MutationRequest::SetIdentity {
        mcc: params.mcc,
        mnc: params.mnc,
    };
    let receipt = apply_detached(&state, actor, request).await?;
    info!(request_id = %receipt.request_id, changed = receipt.changed, "Operator ID updated");
    Ok(message(StatusCode::CREATED, "Operator ID updated successfully"))
}

pub async fn update_operator_slice(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    payload: Result<Json<UpdateOperatorSliceParams>, JsonRejection>,
) -> ApiResult {
    authorize(&actor, Permission::OperatorUpdateSlice)?;
    let Json(params) = payload?;
    let request = MutationRequest::SetSlice {
        sst: params.sst,
        sd: params.sd,
    };
    apply_detached(&state, actor, request).await?;
    Ok(message(StatusCode::CREATED, "Operator slice updated successfully"))
}

pub async fn update_operator_tracking(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    payload: Result<Json<UpdateOperatorTrackingParams>, JsonRejection>,
) -> ApiResult {
    authorize(&actor, Permission::OperatorUpdateTracking)?;
    let Json(params) = payload?;
    let request = MutationRequest::SetTracking {
        supported_tacs: params.supported_tacs,
    };
    apply_detached(&state, actor, request).await?;
    Ok(message(
        StatusCode::CREATED,
        "Operator tracking information updated successfully",
    ))
}

pub async fn update_operator_code(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    payload: Result<Json<UpdateOperatorCodeParams>, JsonRejection>,
) -> ApiResult {
    authorize(&actor, Permission::OperatorUpdateCode)?;
    let Json(params) = payload?;
    let request = MutationRequest::SetOperatorCode {
        operator_code: params.operator_code,
    };
    apply_detached(&state, actor, request).await?;
    Ok(message(StatusCode::CREATED, "Operator Code updated successfully"))
}

pub async fn update_operator_home_network(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    payload: Result<Json<UpdateOperatorHomeNetworkParams>, JsonRejection>,
) -> ApiResult {
    authorize(&actor, Permission::OperatorUpdateHomeNetwork)?;
    let Json(params) = payload?;
    let request = MutationRequest::SetHomeNetworkKey {
        private_key: params.private_key,
    };
    apply_detached(&state, actor, request).await?;
    Ok(message(
        StatusCode::CREATED,
        "Operator Home Network private key updated successfully",
    ))
}
