//! `/api/v1/networking/interfaces/n3`

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use ec_01_operator_identity::MutationRequest;
use serde::Deserialize;
use shared_types::{Actor, Permission};

use super::{apply_detached, authorize, message, respond, ApiResult, AppState};

/// An empty address clears the advertised N3 address.
#[derive(Debug, Deserialize)]
pub struct UpdateN3Params {
    pub external_address: String,
}

pub async fn get_n3_interface(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult {
    authorize(&actor, Permission::NetworkingRead)?;
    Ok(respond(StatusCode::OK, state.operator.n3()?))
}

pub async fn update_n3_interface(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    payload: Result<Json<UpdateN3Params>, JsonRejection>,
) -> ApiResult {
    authorize(&actor, Permission::NetworkingUpdate)?;
    let Json(params) = payload?;
    let request = MutationRequest::SetN3ExternalAddress {
        external_address: params.external_address,
    };
    apply_detached(&state, actor, request).await?;
    Ok(message(StatusCode::OK, "N3 interface updated"))
}
