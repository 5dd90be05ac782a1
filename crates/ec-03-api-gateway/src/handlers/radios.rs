//! `/api/v1/radios` routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use ec_01_operator_identity::RadioRequest;
use shared_types::{Actor, Permission};

use super::{authorize, message, respond, ApiResult, AppState};

pub async fn list_radios(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult {
    authorize(&actor, Permission::RadiosRead)?;
    Ok(respond(
        StatusCode::OK,
        state.operator.attached_radios().await?,
    ))
}

/// 409 when the radio's PLMN or TAC is not served.
pub async fn attach_radio(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    payload: Result<Json<RadioRequest>, JsonRejection>,
) -> ApiResult {
    authorize(&actor, Permission::RadiosManage)?;
    let Json(request) = payload?;
    let attached = state.operator.admit_radio(&actor, request).await?;
    Ok(respond(StatusCode::CREATED, attached))
}

pub async fn detach_radio(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(name): Path<String>,
) -> ApiResult {
    authorize(&actor, Permission::RadiosManage)?;
    state.operator.release_radio(&actor, &name).await?;
    Ok(message(StatusCode::OK, "Radio detached successfully"))
}
