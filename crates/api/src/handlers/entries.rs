//! Handlers for tournament entries (`/tournaments/{id}/entries`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use jdl_db::models::entry::{CreateEntry, TournamentEntry};
use jdl_db::models::tournament::UpdateStatus;
use jdl_db::repositories::{EntryRepo, TournamentRepo};

use crate::error::AppResult;
use crate::handlers::not_found;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

/// GET /api/v1/tournaments/{id}/entries
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(tournament_id): Path<String>,
) -> AppResult<Json<Vec<TournamentEntry>>> {
    if TournamentRepo::find_by_id(&state.pool, &tournament_id)
        .await?
        .is_none()
    {
        return Err(not_found("Tournament", &tournament_id));
    }
    let entries = EntryRepo::list_for_tournament(&state.pool, &tournament_id).await?;
    Ok(Json(entries))
}

/// POST /api/v1/tournaments/{id}/entries
///
/// Manager of the entering team, or admin. Eligibility and capacity are
/// checked while the tournament row is locked.
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Path(tournament_id): Path<String>,
    Json(input): Json<CreateEntry>,
) -> AppResult<(StatusCode, Json<TournamentEntry>)> {
    let actor = user.actor();
    let entry = EntryRepo::create(
        &state.pool,
        &tournament_id,
        &input,
        &actor,
        chrono::Utc::now(),
    )
    .await?;

    tracing::info!(
        entry_id = %entry.id,
        tournament_id = %tournament_id,
        player_id = %entry.player_id,
        team_id = %entry.team_id,
        "Tournament entry created"
    );
    Ok((StatusCode::CREATED, Json(entry)))
}

/// PUT /api/v1/tournaments/{id}/entries/{entry_id}/status
///
/// Admins approve or reject; the team's manager may also cancel.
pub async fn update_status(
    user: AuthUser,
    State(state): State<AppState>,
    Path((tournament_id, entry_id)): Path<(String, String)>,
    Json(input): Json<UpdateStatus>,
) -> AppResult<Json<TournamentEntry>> {
    let actor = user.actor();
    let entry = EntryRepo::set_status(&state.pool, &tournament_id, &entry_id, &actor, &input.status)
        .await?
        .ok_or_else(|| not_found("TournamentEntry", &entry_id))?;

    tracing::info!(
        entry_id = %entry.id,
        status = %entry.status,
        user_id = %actor.user_id,
        "Tournament entry status changed"
    );
    Ok(Json(entry))
}
