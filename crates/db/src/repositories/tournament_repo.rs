//! Repository for the `tournaments` table.

use jdl_core::actor::Actor;
use jdl_core::error::CoreError;
use jdl_core::pagination::resolve_window;
use jdl_core::status::{authorize_transition, TournamentStatus};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::error::RepoResult;
use crate::models::page::Page;
use crate::models::tournament::{
    NewTournament, Tournament, TournamentDetail, TournamentListQuery, UpdateTournament,
};
use crate::repositories::entry_repo::EntryRepo;
use crate::repositories::filter::Filter;

/// Column list with the derived active-entry count. Expects `tournaments tr`.
const COLUMNS: &str = "tr.id, tr.name, tr.description, tr.venue, tr.entry_fee, \
    tr.start_date, tr.end_date, tr.entry_start_date, tr.entry_end_date, tr.status, \
    tr.entry_restriction, \
    (SELECT COUNT(*) FROM tournament_entries e \
        WHERE e.tournament_id = tr.id AND e.status IN ('pending', 'approved')) \
        AS current_entries, \
    tr.created_at, tr.updated_at";

/// Provides CRUD and status operations for tournaments.
pub struct TournamentRepo;

impl TournamentRepo {
    /// Insert a fully-resolved tournament.
    pub async fn create(pool: &PgPool, input: &NewTournament) -> Result<Tournament, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query(
            "INSERT INTO tournaments \
                (id, name, description, venue, entry_fee, start_date, end_date, \
                 entry_start_date, entry_end_date, status, entry_restriction) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(&input.id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.venue)
        .bind(input.entry_fee)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.entry_start_date)
        .bind(input.entry_end_date)
        .bind(&input.status)
        .bind(Json(&input.entry_restriction))
        .execute(&mut *tx)
        .await?;

        let tournament = Self::find_inner(&mut tx, &input.id).await?;
        tx.commit().await?;
        Ok(tournament)
    }

    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Tournament>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tournaments tr WHERE tr.id = $1");
        sqlx::query_as::<_, Tournament>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A tournament with all of its entries.
    pub async fn find_detail(
        pool: &PgPool,
        id: &str,
    ) -> Result<Option<TournamentDetail>, sqlx::Error> {
        let Some(tournament) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let entries = EntryRepo::list_for_tournament(pool, id).await?;
        Ok(Some(TournamentDetail {
            tournament,
            entries,
        }))
    }

    async fn find_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: &str,
    ) -> Result<Tournament, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tournaments tr WHERE tr.id = $1");
        sqlx::query_as::<_, Tournament>(&query)
            .bind(id)
            .fetch_one(&mut **tx)
            .await
    }

    /// Filtered, paginated tournaments, newest first.
    pub async fn list(
        pool: &PgPool,
        params: &TournamentListQuery,
    ) -> Result<Page<Tournament>, sqlx::Error> {
        let mut filter = Filter::new();
        filter.eq_text("tr.status", params.status.as_deref());

        let where_clause = filter.where_clause();
        let (limit, offset) =
            resolve_window(params.limit, params.offset, params.page, params.page_size);
        let idx = filter.next_index();

        let query = format!(
            "SELECT {COLUMNS} FROM tournaments tr {where_clause} \
             ORDER BY tr.created_at DESC, tr.id DESC \
             LIMIT ${idx} OFFSET ${}",
            idx + 1
        );
        let items = filter
            .bind_as(sqlx::query_as::<_, Tournament>(&query))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*)::BIGINT FROM tournaments tr {where_clause}");
        let total = filter
            .bind_scalar(sqlx::query_scalar::<_, i64>(&count_query))
            .fetch_one(pool)
            .await?;

        Ok(Page { items, total })
    }

    /// Update a tournament's details and, when `input.status` differs from
    /// the stored one, move it along its lifecycle in the same transaction.
    /// Only non-`None` fields are applied.
    ///
    /// `expected_status` is the status the caller validated against; a
    /// concurrent status change makes the update fail with a conflict and
    /// nothing is written. Returns `None` if no tournament with the given
    /// `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        actor: &Actor,
        input: &UpdateTournament,
        expected_status: &str,
    ) -> RepoResult<Option<Tournament>> {
        let mut tx = pool.begin().await?;

        let Some(current) = Self::lock_status_inner(&mut tx, id).await? else {
            return Ok(None);
        };
        if current != expected_status {
            return Err(CoreError::Conflict(format!(
                "Tournament status changed to '{current}' concurrently; reload and retry"
            ))
            .into());
        }

        let next_status = match input.status.as_deref().filter(|s| *s != current) {
            Some(status) => {
                let (_, next) =
                    authorize_transition::<TournamentStatus>(actor, &current, status, None)?;
                Some(next)
            }
            None => None,
        };

        sqlx::query(
            "UPDATE tournaments SET \
                name = COALESCE($2, name), \
                description = COALESCE($3, description), \
                venue = COALESCE($4, venue), \
                entry_fee = COALESCE($5, entry_fee), \
                start_date = COALESCE($6, start_date), \
                end_date = COALESCE($7, end_date), \
                entry_start_date = COALESCE($8, entry_start_date), \
                entry_end_date = COALESCE($9, entry_end_date), \
                entry_restriction = COALESCE($10, entry_restriction), \
                status = COALESCE($11, status) \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.venue)
        .bind(input.entry_fee)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.entry_start_date)
        .bind(input.entry_end_date)
        .bind(input.entry_restriction.as_ref().map(Json))
        .bind(next_status.map(|s| s.as_str()))
        .execute(&mut *tx)
        .await?;

        let tournament = Self::find_inner(&mut tx, id).await?;
        tx.commit().await?;
        if let Some(next) = next_status {
            tracing::debug!(tournament_id = id, from = %current, to = %next, "Tournament status changed");
        }
        Ok(Some(tournament))
    }

    /// Move a tournament to `status` under the transition policy.
    ///
    /// Returns `None` if no tournament with the given `id` exists.
    pub async fn set_status(
        pool: &PgPool,
        id: &str,
        actor: &Actor,
        status: &str,
    ) -> RepoResult<Option<Tournament>> {
        let mut tx = pool.begin().await?;

        let Some(current) = Self::lock_status_inner(&mut tx, id).await? else {
            return Ok(None);
        };
        let (_, next) = authorize_transition::<TournamentStatus>(actor, &current, status, None)?;

        sqlx::query("UPDATE tournaments SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(next.as_str())
            .execute(&mut *tx)
            .await?;

        let tournament = Self::find_inner(&mut tx, id).await?;
        tx.commit().await?;
        tracing::debug!(tournament_id = id, from = %current, to = %next, "Tournament status changed");
        Ok(Some(tournament))
    }

    async fn lock_status_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: &str,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT status FROM tournaments WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }
}
