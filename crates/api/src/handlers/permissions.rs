//! Handlers for team permissions and their history.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use jdl_core::error::CoreError;
use jdl_core::permission::{PermissionAction, TeamRole};
use jdl_db::models::page::Page;
use jdl_db::models::team_permission::{
    AddPermission, PermissionHistory, PermissionHistoryQuery, RemovePermissionParams,
    TeamPermission, UpdatePermission,
};
use jdl_db::repositories::team_permission_repo::PermissionChange;
use jdl_db::repositories::{PermissionHistoryRepo, TeamPermissionRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::{check_range, ensure_team_exists, not_found};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

fn parse_role(value: &str) -> AppResult<TeamRole> {
    value
        .parse::<TeamRole>()
        .map_err(|e| AppError::Core(CoreError::Validation(e)))
}

/// GET /api/v1/teams/{id}/permissions
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> AppResult<Json<Vec<TeamPermission>>> {
    ensure_team_exists(&state.pool, &team_id).await?;
    let permissions = TeamPermissionRepo::list_for_team(&state.pool, &team_id).await?;
    Ok(Json(permissions))
}

/// POST /api/v1/teams/{id}/permissions
pub async fn add(
    user: AuthUser,
    State(state): State<AppState>,
    Path(team_id): Path<String>,
    Json(input): Json<AddPermission>,
) -> AppResult<(StatusCode, Json<TeamPermission>)> {
    let role = parse_role(&input.role)?;
    let change = PermissionChange {
        team_id: &team_id,
        user_id: &input.user_id,
        action: PermissionAction::Add,
        role: Some(role),
        reason: input.reason.as_deref(),
    };

    let permission = TeamPermissionRepo::apply(&state.pool, &user.actor(), &change)
        .await?
        .ok_or_else(|| AppError::InternalError("Permission was not created".into()))?;

    tracing::info!(
        team_id = %team_id,
        target_user_id = %input.user_id,
        role = %role,
        user_id = %user.user_id,
        "Team permission added"
    );
    Ok((StatusCode::CREATED, Json(permission)))
}

/// PUT /api/v1/teams/{id}/permissions/{user_id}
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path((team_id, target_user_id)): Path<(String, String)>,
    Json(input): Json<UpdatePermission>,
) -> AppResult<Json<TeamPermission>> {
    let role = parse_role(&input.role)?;
    let change = PermissionChange {
        team_id: &team_id,
        user_id: &target_user_id,
        action: PermissionAction::Update,
        role: Some(role),
        reason: input.reason.as_deref(),
    };

    let permission = TeamPermissionRepo::apply(&state.pool, &user.actor(), &change)
        .await?
        .ok_or_else(|| not_found("TeamPermission", &target_user_id))?;

    tracing::info!(
        team_id = %team_id,
        target_user_id = %target_user_id,
        role = %role,
        user_id = %user.user_id,
        "Team permission updated"
    );
    Ok(Json(permission))
}

/// DELETE /api/v1/teams/{id}/permissions/{user_id}
///
/// Accepts an optional `?reason=` recorded in history.
pub async fn remove(
    user: AuthUser,
    State(state): State<AppState>,
    Path((team_id, target_user_id)): Path<(String, String)>,
    Query(params): Query<RemovePermissionParams>,
) -> AppResult<StatusCode> {
    let change = PermissionChange {
        team_id: &team_id,
        user_id: &target_user_id,
        action: PermissionAction::Remove,
        role: None,
        reason: params.reason.as_deref(),
    };
    TeamPermissionRepo::apply(&state.pool, &user.actor(), &change).await?;

    tracing::info!(
        team_id = %team_id,
        target_user_id = %target_user_id,
        user_id = %user.user_id,
        "Team permission removed"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/teams/{id}/permission-history
///
/// Supports `user_id`, `action`, `from`, `to`, `sort` and paging.
pub async fn history(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(team_id): Path<String>,
    Query(mut params): Query<PermissionHistoryQuery>,
) -> AppResult<Json<Page<PermissionHistory>>> {
    check_range(params.from, params.to)?;
    ensure_team_exists(&state.pool, &team_id).await?;
    params.team_id = Some(team_id);

    let page = PermissionHistoryRepo::list(&state.pool, &params).await?;
    Ok(Json(page))
}
