//! Configuration handlers

use crate::api::AppState;
use crate::config::ConfigUpdate;
use axum::{Json, extract::State, response::IntoResponse};

/// GET /config - Get current configuration
#[utoipa::path(
    get,
    path = "/config",
    tag = "config",
    responses(
        (status = 200, description = "Current configuration snapshot", body = crate::config::Config)
    )
)]
pub async fn get_config(State(state): State<AppState>) -> impl IntoResponse {
    Json((*state.gateway.config()).clone())
}

/// PATCH /config - Update configuration
///
/// Applies the present fields of the update and installs the result as the
/// new snapshot. In-flight requests keep the snapshot they started with;
/// the next request sees the new one.
#[utoipa::path(
    patch,
    path = "/config",
    tag = "config",
    request_body = ConfigUpdate,
    responses(
        (status = 200, description = "The configuration now in effect", body = crate::config::Config),
        (status = 400, description = "Invalid update", body = crate::error::ApiError)
    )
)]
pub async fn update_config(
    State(state): State<AppState>,
    Json(update): Json<ConfigUpdate>,
) -> impl IntoResponse {
    let next = state.gateway.update_config(&update);
    Json((*next).clone())
}
