//! Repository for the `players` table.

use jdl_core::error::CoreError;
use jdl_core::import::{is_newer_than, MasterRecord};
use jdl_core::pagination::resolve_window;
use jdl_core::status::{PlayerStatus, TeamStatus};
use jdl_core::types::Timestamp;
use sqlx::PgPool;

use crate::error::RepoResult;
use crate::models::page::Page;
use crate::models::player::{
    CreatePlayer, ManualClassChange, Player, PlayerDetail, PlayerListQuery, UpdatePlayer,
};
use crate::new_id;
use crate::repositories::class_change_repo::ClassChangeRepo;
use crate::repositories::filter::Filter;

/// Column list joined with the team name. Expects `players p LEFT JOIN teams t`.
const COLUMNS: &str = "p.id, p.name, p.external_id, p.team_id, t.name AS team_name, \
    p.current_class, p.participation_count, p.status, p.last_synced_at, \
    p.created_at, p.updated_at";

const FROM: &str = "players p LEFT JOIN teams t ON t.id = p.team_id";

/// Reason recorded for class changes applied by the master-data import.
pub const MASTER_SYNC_REASON: &str = "Master data sync";

/// Provides CRUD and sync operations for players.
pub struct PlayerRepo;

impl PlayerRepo {
    /// Insert a player, enforcing the team-size cap when a team is given.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePlayer,
        max_team_members: i64,
    ) -> RepoResult<Player> {
        let id = input.id.clone().unwrap_or_else(new_id);
        let mut tx = pool.begin().await?;

        if let Some(team_id) = input.team_id.as_deref() {
            Self::ensure_team_accepts_inner(&mut tx, team_id, max_team_members).await?;
        }

        sqlx::query(
            "INSERT INTO players (id, name, external_id, team_id, current_class, participation_count) \
             VALUES ($1, $2, $3, $4, COALESCE($5, 'E'), COALESCE($6, 0))",
        )
        .bind(&id)
        .bind(&input.name)
        .bind(&input.external_id)
        .bind(&input.team_id)
        .bind(&input.current_class)
        .bind(input.participation_count)
        .execute(&mut *tx)
        .await?;

        let player = Self::find_inner(&mut tx, &id).await?;
        tx.commit().await?;
        Ok(player)
    }

    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Player>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE p.id = $1");
        sqlx::query_as::<_, Player>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A player with its full class history.
    pub async fn find_detail(pool: &PgPool, id: &str) -> Result<Option<PlayerDetail>, sqlx::Error> {
        let Some(player) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let class_history = ClassChangeRepo::list_for_player(pool, id).await?;
        Ok(Some(PlayerDetail {
            player,
            class_history,
        }))
    }

    async fn find_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: &str,
    ) -> Result<Player, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE p.id = $1");
        sqlx::query_as::<_, Player>(&query)
            .bind(id)
            .fetch_one(&mut **tx)
            .await
    }

    /// Filtered, paginated players, newest first.
    pub async fn list(
        pool: &PgPool,
        params: &PlayerListQuery,
    ) -> Result<Page<Player>, sqlx::Error> {
        let mut filter = Filter::new();
        filter.eq_text("p.team_id", params.team_id.as_deref());
        filter.eq_text("p.current_class", params.current_class.as_deref());
        filter.eq_text("p.status", params.status.as_deref());
        filter.search(&["p.name", "p.external_id"], params.search.as_deref());

        let where_clause = filter.where_clause();
        let (limit, offset) =
            resolve_window(params.limit, params.offset, params.page, params.page_size);
        let idx = filter.next_index();

        let query = format!(
            "SELECT {COLUMNS} FROM {FROM} {where_clause} \
             ORDER BY p.created_at DESC, p.id DESC \
             LIMIT ${idx} OFFSET ${}",
            idx + 1
        );
        let items = filter
            .bind_as(sqlx::query_as::<_, Player>(&query))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*)::BIGINT FROM players p {where_clause}");
        let total = filter
            .bind_scalar(sqlx::query_scalar::<_, i64>(&count_query))
            .fetch_one(pool)
            .await?;

        Ok(Page { items, total })
    }

    /// Active players currently on a team.
    pub async fn count_active_in_team<'e, E>(executor: E, team_id: &str) -> Result<i64, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        sqlx::query_scalar(
            "SELECT COUNT(*)::BIGINT FROM players WHERE team_id = $1 AND status = 'active'",
        )
        .bind(team_id)
        .fetch_one(executor)
        .await
    }

    /// Update a player. Only non-`None` fields in `input` are applied.
    ///
    /// `class_change`, when given, sets the class and appends an approved
    /// history row in the same transaction; `input.current_class` is ignored.
    /// Returns `None` if no player with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &UpdatePlayer,
        class_change: Option<&ManualClassChange>,
        max_team_members: i64,
    ) -> RepoResult<Option<Player>> {
        let mut tx = pool.begin().await?;

        let row: Option<(String, Option<String>, String)> = sqlx::query_as(
            "SELECT current_class, team_id, status FROM players WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((current_class, current_team, current_status)) = row else {
            return Ok(None);
        };

        // A player joining a team or coming back to active takes a seat.
        let target_team = match &input.team_id {
            Some(team) => team.as_deref(),
            None => current_team.as_deref(),
        };
        let joining = target_team != current_team.as_deref();
        let reactivating = input.status.as_deref() == Some(PlayerStatus::Active.as_str())
            && current_status != PlayerStatus::Active.as_str();
        if let Some(team_id) = target_team.filter(|_| joining || reactivating) {
            Self::ensure_team_accepts_inner(&mut tx, team_id, max_team_members).await?;
        }

        let new_class = match class_change {
            Some(change) if change.new_class != current_class => {
                ClassChangeRepo::insert_approved_inner(
                    &mut tx,
                    id,
                    &current_class,
                    &change.new_class,
                    &change.reason,
                    &change.actor_id,
                )
                .await?;
                Some(change.new_class.as_str())
            }
            _ => None,
        };

        sqlx::query(
            "UPDATE players SET \
                name = COALESCE($2, name), \
                external_id = COALESCE($3, external_id), \
                team_id = CASE WHEN $4 THEN $5 ELSE team_id END, \
                current_class = COALESCE($6, current_class), \
                participation_count = COALESCE($7, participation_count), \
                status = COALESCE($8, status) \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.external_id)
        .bind(input.team_id.is_some())
        .bind(input.team_id.clone().flatten())
        .bind(new_class)
        .bind(input.participation_count)
        .bind(&input.status)
        .execute(&mut *tx)
        .await?;

        let player = Self::find_inner(&mut tx, id).await?;
        tx.commit().await?;
        Ok(Some(player))
    }

    /// Apply one master-data record to the player with its external id.
    ///
    /// Returns `false` when no such player exists or the record is not newer
    /// than the player's last sync. A class difference is recorded as an
    /// approved change attributed to `actor_id`.
    pub async fn apply_master_record(
        pool: &PgPool,
        record: &MasterRecord,
        actor_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let row: Option<(String, String, Option<Timestamp>)> = sqlx::query_as(
            "SELECT id, current_class, last_synced_at FROM players \
             WHERE external_id = $1 FOR UPDATE",
        )
        .bind(&record.external_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((id, current_class, last_synced_at)) = row else {
            return Ok(false);
        };
        if !is_newer_than(record, last_synced_at) {
            return Ok(false);
        }

        let new_class = record.current_class.as_str();
        if new_class != current_class {
            ClassChangeRepo::insert_approved_inner(
                &mut tx,
                &id,
                &current_class,
                new_class,
                MASTER_SYNC_REASON,
                actor_id,
            )
            .await?;
        }

        sqlx::query(
            "UPDATE players SET \
                name = $2, participation_count = $3, current_class = $4, last_synced_at = $5 \
             WHERE id = $1",
        )
        .bind(&id)
        .bind(&record.name)
        .bind(record.participation_count)
        .bind(new_class)
        .bind(record.last_updated)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Lock the team and check it can take one more active player.
    async fn ensure_team_accepts_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        team_id: &str,
        max_team_members: i64,
    ) -> RepoResult<()> {
        let status: Option<String> =
            sqlx::query_scalar("SELECT status FROM teams WHERE id = $1 FOR UPDATE")
                .bind(team_id)
                .fetch_optional(&mut **tx)
                .await?;
        let status = status.ok_or_else(|| CoreError::NotFound {
            entity: "Team",
            id: team_id.to_string(),
        })?;
        if status != TeamStatus::Active.as_str() {
            return Err(CoreError::Validation("Cannot add players to an archived team".into()).into());
        }

        let members = Self::count_active_in_team(&mut **tx, team_id).await?;
        if members >= max_team_members {
            return Err(CoreError::Conflict(format!(
                "Team already has the maximum of {max_team_members} members"
            ))
            .into());
        }
        Ok(())
    }
}
