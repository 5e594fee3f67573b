//! Repository for the `tournament_entries` table.

use jdl_core::actor::Actor;
use jdl_core::entry::{check_entry_eligibility, EntryCandidate, EntryRestriction};
use jdl_core::error::CoreError;
use jdl_core::status::{authorize_transition, EntryStatus, TeamStatus};
use jdl_core::types::Timestamp;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::error::RepoResult;
use crate::models::entry::{CreateEntry, TournamentEntry};
use crate::new_id;

const COLUMNS: &str =
    "id, tournament_id, player_id, team_id, entry_date, status, created_at, updated_at";

/// Statuses that occupy a tournament slot.
const ACTIVE_STATUSES: &str = "('pending', 'approved')";

/// Provides entry creation and status operations.
pub struct EntryRepo;

impl EntryRepo {
    /// Enter a player for a team.
    ///
    /// The tournament row is locked while eligibility and capacity are
    /// checked, so concurrent entries cannot overfill it.
    pub async fn create(
        pool: &PgPool,
        tournament_id: &str,
        input: &CreateEntry,
        actor: &Actor,
        now: Timestamp,
    ) -> RepoResult<TournamentEntry> {
        let mut tx = pool.begin().await?;

        let tournament: Option<(String, Timestamp, Timestamp, Json<EntryRestriction>)> =
            sqlx::query_as(
                "SELECT status, entry_start_date, entry_end_date, entry_restriction \
                 FROM tournaments WHERE id = $1 FOR UPDATE",
            )
            .bind(tournament_id)
            .fetch_optional(&mut *tx)
            .await?;
        let (status, entry_start_date, entry_end_date, Json(restriction)) =
            tournament.ok_or_else(|| CoreError::NotFound {
                entity: "Tournament",
                id: tournament_id.to_string(),
            })?;

        let team: Option<(String, String)> =
            sqlx::query_as("SELECT manager_id, status FROM teams WHERE id = $1")
                .bind(&input.team_id)
                .fetch_optional(&mut *tx)
                .await?;
        let (manager_id, team_status) = team.ok_or_else(|| CoreError::NotFound {
            entity: "Team",
            id: input.team_id.clone(),
        })?;
        actor.require_team_manager(&manager_id)?;
        if team_status != TeamStatus::Active.as_str() {
            return Err(
                CoreError::Validation("Archived teams cannot enter tournaments".into()).into(),
            );
        }

        let player: Option<(Option<String>, String, String, i32)> = sqlx::query_as(
            "SELECT team_id, status, current_class, participation_count \
             FROM players WHERE id = $1",
        )
        .bind(&input.player_id)
        .fetch_optional(&mut *tx)
        .await?;
        let (player_team_id, player_status, player_class, participation_count) = player
            .ok_or_else(|| CoreError::NotFound {
                entity: "Player",
                id: input.player_id.clone(),
            })?;

        let (active_entries, team_active_entries): (i64, i64) = sqlx::query_as(&format!(
            "SELECT COUNT(*)::BIGINT, \
                    COUNT(*) FILTER (WHERE team_id = $2)::BIGINT \
             FROM tournament_entries \
             WHERE tournament_id = $1 AND status IN {ACTIVE_STATUSES}"
        ))
        .bind(tournament_id)
        .bind(&input.team_id)
        .fetch_one(&mut *tx)
        .await?;

        check_entry_eligibility(&EntryCandidate {
            tournament_status: &status,
            entry_start_date,
            entry_end_date,
            restriction: &restriction,
            active_entries,
            team_active_entries,
            entering_team_id: &input.team_id,
            player_team_id: player_team_id.as_deref(),
            player_status: &player_status,
            player_class: &player_class,
            participation_count,
            now,
        })?;

        let query = format!(
            "INSERT INTO tournament_entries (id, tournament_id, player_id, team_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        let entry = sqlx::query_as::<_, TournamentEntry>(&query)
            .bind(new_id())
            .bind(tournament_id)
            .bind(&input.player_id)
            .bind(&input.team_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(entry)
    }

    /// All entries of a tournament in entry order.
    pub async fn list_for_tournament(
        pool: &PgPool,
        tournament_id: &str,
    ) -> Result<Vec<TournamentEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tournament_entries WHERE tournament_id = $1 \
             ORDER BY entry_date ASC, id ASC"
        );
        sqlx::query_as::<_, TournamentEntry>(&query)
            .bind(tournament_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        tournament_id: &str,
        id: &str,
    ) -> Result<Option<TournamentEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tournament_entries WHERE id = $1 AND tournament_id = $2"
        );
        sqlx::query_as::<_, TournamentEntry>(&query)
            .bind(id)
            .bind(tournament_id)
            .fetch_optional(pool)
            .await
    }

    /// Move an entry to `status` under the transition policy. The entering
    /// team's manager may cancel; decisions need an admin.
    ///
    /// Returns `None` if the entry does not exist in the given tournament.
    pub async fn set_status(
        pool: &PgPool,
        tournament_id: &str,
        id: &str,
        actor: &Actor,
        status: &str,
    ) -> RepoResult<Option<TournamentEntry>> {
        let mut tx = pool.begin().await?;

        let row: Option<(String, Option<String>)> = sqlx::query_as(
            "SELECT e.status, t.manager_id \
             FROM tournament_entries e LEFT JOIN teams t ON t.id = e.team_id \
             WHERE e.id = $1 AND e.tournament_id = $2 \
             FOR UPDATE OF e",
        )
        .bind(id)
        .bind(tournament_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((current, manager_id)) = row else {
            return Ok(None);
        };

        let (_, next) =
            authorize_transition::<EntryStatus>(actor, &current, status, manager_id.as_deref())?;

        let query = format!(
            "UPDATE tournament_entries SET status = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        let entry = sqlx::query_as::<_, TournamentEntry>(&query)
            .bind(id)
            .bind(next.as_str())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(entry))
    }
}
