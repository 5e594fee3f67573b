//! Handlers for the `/class-changes` resource.
//!
//! Requests start `pending` and are decided once by an admin; approval
//! updates the player's class in the same transaction.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use jdl_core::validation::{validate_class_change, ClassChangeDraft};
use jdl_db::models::class_change::{
    ClassChange, ClassChangeQuery, CreateClassChange, DecideClassChange,
};
use jdl_db::models::page::Page;
use jdl_db::repositories::class_change_repo::NewClassChange;
use jdl_db::repositories::{ClassChangeRepo, PlayerRepo};

use crate::error::AppResult;
use crate::handlers::{check_range, ensure_team_exists, not_found};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

/// GET /api/v1/class-changes
///
/// Supports `player_id`, `status`, `class`, `from`, `to`, `sort` and paging.
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<ClassChangeQuery>,
) -> AppResult<Json<Page<ClassChange>>> {
    check_range(params.from, params.to)?;
    let page = ClassChangeRepo::list(&state.pool, &params).await?;
    Ok(Json(page))
}

/// POST /api/v1/class-changes
///
/// Manager of the player's team, or admin. The old class is the player's
/// current class.
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateClassChange>,
) -> AppResult<(StatusCode, Json<ClassChange>)> {
    let actor = user.actor();
    let player = PlayerRepo::find_by_id(&state.pool, &input.player_id)
        .await?
        .ok_or_else(|| not_found("Player", &input.player_id))?;

    if !actor.is_admin {
        match player.team_id.as_deref() {
            Some(team_id) => {
                let team = ensure_team_exists(&state.pool, team_id).await?;
                actor.require_team_manager(&team.manager_id)?;
            }
            None => actor.require_admin()?,
        }
    }

    validate_class_change(&ClassChangeDraft {
        old_class: Some(&player.current_class),
        new_class: input.new_class.as_deref(),
        reason: input.reason.as_deref(),
    })?;

    let change = ClassChangeRepo::create_request(
        &state.pool,
        &NewClassChange {
            player_id: &player.id,
            old_class: &player.current_class,
            new_class: input.new_class.as_deref().unwrap_or_default(),
            reason: input.reason.as_deref().unwrap_or_default(),
            requested_by: &actor.user_id,
        },
    )
    .await?;

    tracing::info!(
        class_change_id = %change.id,
        player_id = %change.player_id,
        new_class = %change.new_class,
        user_id = %actor.user_id,
        "Class change requested"
    );
    Ok((StatusCode::CREATED, Json(change)))
}

/// GET /api/v1/class-changes/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ClassChange>> {
    let change = ClassChangeRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| not_found("ClassChange", &id))?;
    Ok(Json(change))
}

/// PUT /api/v1/class-changes/{id}/status
///
/// Approve or reject a pending request. Admin only (enforced by the
/// transition policy).
pub async fn decide(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<DecideClassChange>,
) -> AppResult<Json<ClassChange>> {
    let actor = user.actor();
    let change = ClassChangeRepo::decide(
        &state.pool,
        &id,
        &actor,
        &input.status,
        input.comment.as_deref(),
    )
    .await?
    .ok_or_else(|| not_found("ClassChange", &id))?;

    tracing::info!(
        class_change_id = %change.id,
        status = %change.status,
        user_id = %actor.user_id,
        "Class change decided"
    );
    Ok(Json(change))
}
