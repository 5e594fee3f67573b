//! Handlers for the `/tournaments` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use jdl_core::entry::EntryRestriction;
use jdl_core::status::{parse_status, TournamentStatus};
use jdl_core::validation::{validate_tournament, TournamentDraft};
use jdl_db::models::page::Page;
use jdl_db::models::tournament::{
    CreateTournament, NewTournament, Tournament, TournamentDetail, TournamentListQuery,
    UpdateStatus, UpdateTournament,
};
use jdl_db::new_id;
use jdl_db::repositories::TournamentRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::{default_entry_fee, not_found};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::state::AppState;

/// Resolve a validated create request into the values to insert.
fn resolve_new(
    input: CreateTournament,
    entry_fee: i32,
    status: TournamentStatus,
) -> AppResult<NewTournament> {
    let missing = || AppError::InternalError("Validated tournament is missing a field".into());
    Ok(NewTournament {
        id: input.id.unwrap_or_else(new_id),
        name: input.name.ok_or_else(missing)?,
        description: input.description,
        venue: input.venue.ok_or_else(missing)?,
        entry_fee,
        start_date: input.start_date.ok_or_else(missing)?,
        end_date: input.end_date.ok_or_else(missing)?,
        entry_start_date: input.entry_start_date.ok_or_else(missing)?,
        entry_end_date: input.entry_end_date.ok_or_else(missing)?,
        status: status.as_str().to_string(),
        entry_restriction: input.entry_restriction.unwrap_or_default(),
    })
}

/// GET /api/v1/tournaments
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<TournamentListQuery>,
) -> AppResult<Json<Page<Tournament>>> {
    let page = TournamentRepo::list(&state.pool, &params).await?;
    Ok(Json(page))
}

/// POST /api/v1/tournaments
///
/// Admin only. A missing entry fee falls back to the `default_entry_fee`
/// setting; a missing status defaults to `draft`.
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateTournament>,
) -> AppResult<(StatusCode, Json<Tournament>)> {
    let status = match input.status.as_deref() {
        Some(s) => parse_status::<TournamentStatus>(s)?,
        None => TournamentStatus::Draft,
    };
    let entry_fee = match input.entry_fee {
        Some(fee) => fee,
        None => default_entry_fee(&state.pool).await?,
    };
    let default_restriction = EntryRestriction::default();

    validate_tournament(&TournamentDraft {
        name: input.name.as_deref(),
        venue: input.venue.as_deref(),
        entry_fee: Some(entry_fee),
        start_date: input.start_date,
        end_date: input.end_date,
        entry_start_date: input.entry_start_date,
        entry_end_date: input.entry_end_date,
        entry_restriction: Some(
            input
                .entry_restriction
                .as_ref()
                .unwrap_or(&default_restriction),
        ),
    })?;

    let new = resolve_new(input, entry_fee, status)?;
    let tournament = TournamentRepo::create(&state.pool, &new).await?;

    tracing::info!(
        tournament_id = %tournament.id,
        status = %tournament.status,
        user_id = %admin.user_id,
        "Tournament created"
    );
    Ok((StatusCode::CREATED, Json(tournament)))
}

/// GET /api/v1/tournaments/{id}
///
/// Includes the tournament's entries.
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<TournamentDetail>> {
    let detail = TournamentRepo::find_detail(&state.pool, &id)
        .await?
        .ok_or_else(|| not_found("Tournament", &id))?;
    Ok(Json(detail))
}

/// PUT /api/v1/tournaments/{id}
///
/// Admin only. The tournament as it would be after the update is validated
/// as a whole; an invalid result is rejected and nothing is written. A
/// `status` in the body is applied together with the other fields, under
/// the transition policy.
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateTournament>,
) -> AppResult<Json<Tournament>> {
    let existing = TournamentRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| not_found("Tournament", &id))?;

    validate_tournament(&TournamentDraft {
        name: Some(input.name.as_deref().unwrap_or(&existing.name)),
        venue: Some(input.venue.as_deref().unwrap_or(&existing.venue)),
        entry_fee: Some(input.entry_fee.unwrap_or(existing.entry_fee)),
        start_date: Some(input.start_date.unwrap_or(existing.start_date)),
        end_date: Some(input.end_date.unwrap_or(existing.end_date)),
        entry_start_date: Some(input.entry_start_date.unwrap_or(existing.entry_start_date)),
        entry_end_date: Some(input.entry_end_date.unwrap_or(existing.entry_end_date)),
        entry_restriction: Some(
            input
                .entry_restriction
                .as_ref()
                .unwrap_or(&existing.entry_restriction.0),
        ),
    })?;

    let actor = admin.actor();
    let tournament = TournamentRepo::update(&state.pool, &id, &actor, &input, &existing.status)
        .await?
        .ok_or_else(|| not_found("Tournament", &id))?;

    tracing::info!(tournament_id = %id, user_id = %actor.user_id, "Tournament updated");
    Ok(Json(tournament))
}

/// PUT /api/v1/tournaments/{id}/status
///
/// Admin only. Moves the tournament along its lifecycle.
pub async fn update_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateStatus>,
) -> AppResult<Json<Tournament>> {
    let actor = admin.actor();
    let tournament = TournamentRepo::set_status(&state.pool, &id, &actor, &input.status)
        .await?
        .ok_or_else(|| not_found("Tournament", &id))?;

    tracing::info!(
        tournament_id = %id,
        status = %tournament.status,
        user_id = %actor.user_id,
        "Tournament status changed"
    );
    Ok(Json(tournament))
}
