//! Admin handlers for system settings (`/admin/settings`).
//!
//! Values are coerced to their declared `value_type` before they are stored.
//! Settings are never deleted.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use jdl_core::error::CoreError;
use jdl_core::settings::{SettingType, SettingValue};
use jdl_core::validation::validate_setting_key;
use jdl_db::models::system_setting::{CreateSetting, SystemSetting, UpdateSetting};
use jdl_db::repositories::SystemSettingRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::not_found;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

fn parse_type(value: Option<&str>) -> AppResult<Option<SettingType>> {
    value
        .map(|t| t.parse::<SettingType>())
        .transpose()
        .map_err(|e| AppError::Core(CoreError::Validation(e)))
}

/// GET /api/v1/admin/settings
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<SystemSetting>>> {
    let settings = SystemSettingRepo::list(&state.pool).await?;
    Ok(Json(settings))
}

/// POST /api/v1/admin/settings
///
/// Without a `value_type` the type is inferred from the JSON value.
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateSetting>,
) -> AppResult<(StatusCode, Json<SystemSetting>)> {
    validate_setting_key(&input.key)?;
    let hint = parse_type(input.value_type.as_deref())?;
    let value = SettingValue::from_json(input.value, hint)?;

    let setting = SystemSettingRepo::create(
        &state.pool,
        &input.key,
        &value,
        input.description.as_deref(),
        &admin.user_id,
    )
    .await?;

    tracing::info!(key = %setting.key, user_id = %admin.user_id, "Setting created");
    Ok((StatusCode::CREATED, Json(setting)))
}

/// GET /api/v1/admin/settings/{key}
pub async fn get_by_key(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<Json<SystemSetting>> {
    let setting = SystemSettingRepo::find_by_key(&state.pool, &key)
        .await?
        .ok_or_else(|| not_found("SystemSetting", &key))?;
    Ok(Json(setting))
}

/// PUT /api/v1/admin/settings/{key}
///
/// A new value is coerced to the new `value_type` if given, else to the
/// stored type. Changing only `value_type` re-coerces the stored value.
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(input): Json<UpdateSetting>,
) -> AppResult<Json<SystemSetting>> {
    let existing = SystemSettingRepo::find_by_key(&state.pool, &key)
        .await?
        .ok_or_else(|| not_found("SystemSetting", &key))?;

    let requested_type = parse_type(input.value_type.as_deref())?;
    let stored_type = existing
        .value_type
        .parse::<SettingType>()
        .map_err(|e| AppError::InternalError(format!("Stored setting '{key}': {e}")))?;
    let target_type = requested_type.unwrap_or(stored_type);

    let value = match input.value {
        Some(raw) => Some(SettingValue::from_json(raw, Some(target_type))?),
        None if target_type != stored_type => Some(SettingValue::from_json(
            existing.value.clone(),
            Some(target_type),
        )?),
        None => None,
    };

    let setting = SystemSettingRepo::update(
        &state.pool,
        &key,
        value.as_ref(),
        input.description.as_deref(),
        &admin.user_id,
    )
    .await?
    .ok_or_else(|| not_found("SystemSetting", &key))?;

    tracing::info!(key = %key, user_id = %admin.user_id, "Setting updated");
    Ok(Json(setting))
}
