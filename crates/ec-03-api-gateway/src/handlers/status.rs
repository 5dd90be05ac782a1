//! Unauthenticated status and metrics endpoints.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use serde::Serialize;

use super::{respond, ApiResult, AppState};
use crate::domain::error::ApiError;

#[derive(Debug, Serialize)]
pub struct StatusView {
    pub version: &'static str,
    /// Every operator sub-resource has been written at least once.
    pub initialized: bool,
}

pub async fn get_status(State(state): State<AppState>) -> ApiResult {
    Ok(respond(
        StatusCode::OK,
        StatusView {
            version: env!("CARGO_PKG_VERSION"),
            initialized: state.operator.is_initialized(),
        },
    ))
}

/// Prometheus text exposition.
pub async fn get_metrics() -> ApiResult {
    let body = ella_telemetry::gather_text().map_err(ApiError::internal)?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response())
}
