//! Handlers for the `/players` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use jdl_core::actor::Actor;
use jdl_core::error::CoreError;
use jdl_core::status::{authorize_transition, PlayerStatus};
use jdl_core::validation::{validate_player, PlayerDraft};
use jdl_db::models::class_change::ClassChange;
use jdl_db::models::page::Page;
use jdl_db::models::player::{
    CreatePlayer, ManualClassChange, Player, PlayerDetail, PlayerListQuery, UpdatePlayer,
};
use jdl_db::repositories::{ClassChangeRepo, PlayerRepo};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::handlers::{ensure_team_exists, max_team_members, not_found};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

/// Reason recorded for a direct class edit made without one.
const MANUAL_CLASS_REASON: &str = "Manual update";

/// Require the actor to manage `team_id`, or be an admin. Players without a
/// team are admin-managed. Returns the team's manager when it was looked up.
async fn require_team_authority(
    pool: &PgPool,
    actor: &Actor,
    team_id: Option<&str>,
) -> AppResult<Option<String>> {
    if actor.is_admin {
        return Ok(None);
    }
    match team_id {
        Some(team_id) => {
            let team = ensure_team_exists(pool, team_id).await?;
            actor.require_team_manager(&team.manager_id)?;
            Ok(Some(team.manager_id))
        }
        None => {
            actor.require_admin()?;
            Ok(None)
        }
    }
}

/// GET /api/v1/players
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<PlayerListQuery>,
) -> AppResult<Json<Page<Player>>> {
    let page = PlayerRepo::list(&state.pool, &params).await?;
    Ok(Json(page))
}

/// POST /api/v1/players
///
/// Admin, or the manager of the team the player joins.
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreatePlayer>,
) -> AppResult<(StatusCode, Json<Player>)> {
    validate_player(&PlayerDraft {
        name: input.name.as_deref(),
        external_id: input.external_id.as_deref(),
        current_class: input.current_class.as_deref(),
        participation_count: input.participation_count,
    })?;

    let actor = user.actor();
    if let Some(team_id) = input.team_id.as_deref() {
        ensure_team_exists(&state.pool, team_id).await?;
    }
    require_team_authority(&state.pool, &actor, input.team_id.as_deref()).await?;

    let cap = max_team_members(&state.pool).await?;
    let player = PlayerRepo::create(&state.pool, &input, cap).await?;

    tracing::info!(
        player_id = %player.id,
        external_id = %player.external_id,
        user_id = %actor.user_id,
        "Player created"
    );
    Ok((StatusCode::CREATED, Json(player)))
}

/// GET /api/v1/players/{id}
///
/// Includes the team name and the player's class history.
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<PlayerDetail>> {
    let detail = PlayerRepo::find_detail(&state.pool, &id)
        .await?
        .ok_or_else(|| not_found("Player", &id))?;
    Ok(Json(detail))
}

/// PUT /api/v1/players/{id}
///
/// Manager of the player's team (and of the destination team when moving),
/// or admin. Editing `current_class` directly is admin-only and is recorded
/// as an approved class change.
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdatePlayer>,
) -> AppResult<Json<Player>> {
    let actor = user.actor();
    let existing = PlayerRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| not_found("Player", &id))?;

    let manager_id =
        require_team_authority(&state.pool, &actor, existing.team_id.as_deref()).await?;
    if let Some(Some(new_team)) = &input.team_id {
        if existing.team_id.as_deref() != Some(new_team.as_str()) {
            ensure_team_exists(&state.pool, new_team).await?;
            require_team_authority(&state.pool, &actor, Some(new_team.as_str())).await?;
        }
    }

    validate_player(&PlayerDraft {
        name: Some(input.name.as_deref().unwrap_or(&existing.name)),
        external_id: Some(
            input
                .external_id
                .as_deref()
                .unwrap_or(&existing.external_id),
        ),
        current_class: Some(
            input
                .current_class
                .as_deref()
                .unwrap_or(&existing.current_class),
        ),
        participation_count: input
            .participation_count
            .or(Some(existing.participation_count)),
    })?;

    if let Some(status) = input.status.as_deref().filter(|s| *s != existing.status) {
        authorize_transition::<PlayerStatus>(
            &actor,
            &existing.status,
            status,
            manager_id.as_deref(),
        )?;
    }

    let class_change = match input.current_class.as_deref() {
        Some(class) if class != existing.current_class => {
            if !actor.is_admin {
                return Err(AppError::Core(CoreError::Forbidden(
                    "Only admins may edit a class directly; submit a class change request".into(),
                )));
            }
            Some(ManualClassChange {
                new_class: class.to_string(),
                reason: input
                    .class_change_reason
                    .clone()
                    .filter(|r| !r.trim().is_empty())
                    .unwrap_or_else(|| MANUAL_CLASS_REASON.to_string()),
                actor_id: actor.user_id.clone(),
            })
        }
        _ => None,
    };

    let cap = max_team_members(&state.pool).await?;
    let player = PlayerRepo::update(&state.pool, &id, &input, class_change.as_ref(), cap)
        .await?
        .ok_or_else(|| not_found("Player", &id))?;

    tracing::info!(player_id = %player.id, user_id = %actor.user_id, "Player updated");
    Ok(Json(player))
}

/// GET /api/v1/players/{id}/class-changes
pub async fn class_history(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<ClassChange>>> {
    if PlayerRepo::find_by_id(&state.pool, &id).await?.is_none() {
        return Err(not_found("Player", &id));
    }
    let history = ClassChangeRepo::list_for_player(&state.pool, &id).await?;
    Ok(Json(history))
}
