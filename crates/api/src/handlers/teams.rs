//! Handlers for the `/teams` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use jdl_core::status::{authorize_transition, TeamStatus};
use jdl_core::validation::{validate_team, TeamDraft};
use jdl_db::models::page::Page;
use jdl_db::models::team::{CreateTeam, Team, TeamListQuery, UpdateTeam};
use jdl_db::repositories::TeamRepo;

use crate::error::AppResult;
use crate::handlers::{ensure_team_exists, not_found};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

/// GET /api/v1/teams
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<TeamListQuery>,
) -> AppResult<Json<Page<Team>>> {
    let page = TeamRepo::list(&state.pool, &params).await?;
    Ok(Json(page))
}

/// POST /api/v1/teams
///
/// The caller becomes the team's manager.
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTeam>,
) -> AppResult<(StatusCode, Json<Team>)> {
    validate_team(&TeamDraft {
        name: input.name.as_deref(),
        description: input.description.as_deref(),
    })?;

    let team = TeamRepo::create(&state.pool, &input, &user.user_id).await?;
    tracing::info!(team_id = %team.id, manager_id = %team.manager_id, "Team created");
    Ok((StatusCode::CREATED, Json(team)))
}

/// GET /api/v1/teams/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Team>> {
    let team = ensure_team_exists(&state.pool, &id).await?;
    Ok(Json(team))
}

/// PUT /api/v1/teams/{id}
///
/// Team manager or admin. A status change follows the team lifecycle; a new
/// `manager_id` reassigns the team.
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateTeam>,
) -> AppResult<Json<Team>> {
    let actor = user.actor();
    let existing = ensure_team_exists(&state.pool, &id).await?;
    actor.require_team_manager(&existing.manager_id)?;

    validate_team(&TeamDraft {
        name: Some(input.name.as_deref().unwrap_or(&existing.name)),
        description: input
            .description
            .as_deref()
            .or(existing.description.as_deref()),
    })?;

    if let Some(status) = input.status.as_deref().filter(|s| *s != existing.status) {
        authorize_transition::<TeamStatus>(
            &actor,
            &existing.status,
            status,
            Some(&existing.manager_id),
        )?;
    }

    let team = TeamRepo::update(&state.pool, &id, &input, &actor.user_id)
        .await?
        .ok_or_else(|| not_found("Team", &id))?;

    tracing::info!(team_id = %team.id, user_id = %actor.user_id, "Team updated");
    Ok(Json(team))
}
