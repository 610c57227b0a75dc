//! Settings management endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::entities::{Setting, SettingStore};
use crate::error::ServerError;
use crate::schemas::settings::{SettingResponse, UpdateSettingRequest};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(get_setting, update_setting),
    components(schemas(SettingResponse, UpdateSettingRequest))
)]
pub struct SettingsApi;

/// Register settings routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/settings/{key}", get(get_setting).put(update_setting))
}

fn to_setting_response(s: Setting) -> SettingResponse {
    SettingResponse {
        key: s.key,
        value: s.value,
    }
}

/// Look up a setting by key (`GET /api/settings/{key}`).
#[utoipa::path(
    get,
    path = "/api/settings/{key}",
    tag = "settings",
    params(("key" = String, Path, description = "Setting key")),
    responses(
        (status = 200, description = "Setting found", body = SettingResponse),
        (status = 404, description = "No such setting"),
    )
)]
pub async fn get_setting(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<SettingResponse>, ServerError> {
    let setting = state
        .store
        .get_setting(&key)
        .await?
        .ok_or_else(|| ServerError::NotFound("Setting not found".into()))?;
    Ok(Json(to_setting_response(setting)))
}

/// Create or update a setting (`PUT /api/settings/{key}`).
///
/// Upsert semantics: at most one row per key.
#[utoipa::path(
    put,
    path = "/api/settings/{key}",
    tag = "settings",
    params(("key" = String, Path, description = "Setting key")),
    request_body = UpdateSettingRequest,
    responses(
        (status = 200, description = "Setting stored", body = SettingResponse),
        (status = 400, description = "Empty value"),
    )
)]
pub async fn update_setting(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Json(body): Json<UpdateSettingRequest>,
) -> Result<Json<SettingResponse>, ServerError> {
    if body.value.trim().is_empty() {
        return Err(ServerError::Validation {
            message: "value must not be empty".into(),
            field: "value".into(),
        });
    }
    let setting = state.store.upsert_setting(&key, &body.value).await?;
    Ok(Json(to_setting_response(setting)))
}
