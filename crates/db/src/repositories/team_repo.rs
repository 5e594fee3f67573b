//! Repository for the `teams` table.

use jdl_core::pagination::resolve_window;
use jdl_core::permission::{PermissionAction, TeamRole};
use sqlx::PgPool;

use crate::error::RepoResult;
use crate::models::page::Page;
use crate::models::team::{CreateTeam, Team, TeamListQuery, UpdateTeam};
use crate::models::team_permission::NewPermissionHistory;
use crate::new_id;
use crate::repositories::filter::Filter;
use crate::repositories::permission_history_repo::PermissionHistoryRepo;
use crate::repositories::team_permission_repo::TeamPermissionRepo;

/// Column list with the derived active-member count. Expects `teams t`.
const COLUMNS: &str = "t.id, t.name, t.description, t.logo_url, t.manager_id, t.status, \
    (SELECT COUNT(*) FROM players p WHERE p.team_id = t.id AND p.status = 'active') \
        AS member_count, \
    t.created_at, t.updated_at";

/// Provides CRUD operations for teams.
pub struct TeamRepo;

impl TeamRepo {
    /// Insert a team managed by `manager_id`.
    ///
    /// The manager's permission row and its `add` history entry are written
    /// in the same transaction.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTeam,
        manager_id: &str,
    ) -> Result<Team, sqlx::Error> {
        let id = input.id.clone().unwrap_or_else(new_id);
        let mut tx = pool.begin().await?;

        sqlx::query(
            "INSERT INTO teams (id, name, description, logo_url, manager_id) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.logo_url)
        .bind(manager_id)
        .execute(&mut *tx)
        .await?;

        TeamPermissionRepo::insert_inner(&mut tx, &id, manager_id, TeamRole::Manager).await?;
        PermissionHistoryRepo::append_inner(
            &mut tx,
            &NewPermissionHistory {
                team_id: &id,
                user_id: manager_id,
                role: TeamRole::Manager.as_str(),
                action: PermissionAction::Add.as_str(),
                changed_by: manager_id,
                reason: Some("Team created"),
            },
        )
        .await?;

        let team = Self::find_inner(&mut tx, &id).await?;
        tx.commit().await?;
        Ok(team)
    }

    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Team>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM teams t WHERE t.id = $1");
        sqlx::query_as::<_, Team>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    async fn find_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: &str,
    ) -> Result<Team, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM teams t WHERE t.id = $1");
        sqlx::query_as::<_, Team>(&query)
            .bind(id)
            .fetch_one(&mut **tx)
            .await
    }

    /// Filtered, paginated teams, newest first.
    pub async fn list(pool: &PgPool, params: &TeamListQuery) -> Result<Page<Team>, sqlx::Error> {
        let mut filter = Filter::new();
        filter.eq_text("t.status", params.status.as_deref());
        filter.eq_text("t.manager_id", params.manager_id.as_deref());
        filter.search(&["t.name"], params.search.as_deref());

        let where_clause = filter.where_clause();
        let (limit, offset) =
            resolve_window(params.limit, params.offset, params.page, params.page_size);
        let idx = filter.next_index();

        let query = format!(
            "SELECT {COLUMNS} FROM teams t {where_clause} \
             ORDER BY t.created_at DESC, t.id DESC \
             LIMIT ${idx} OFFSET ${}",
            idx + 1
        );
        let items = filter
            .bind_as(sqlx::query_as::<_, Team>(&query))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*)::BIGINT FROM teams t {where_clause}");
        let total = filter
            .bind_scalar(sqlx::query_scalar::<_, i64>(&count_query))
            .fetch_one(pool)
            .await?;

        Ok(Page { items, total })
    }

    /// Update a team. Only non-`None` fields in `input` are applied.
    ///
    /// A new `manager_id` moves the manager role and records the change in
    /// permission history on behalf of `changed_by`. Returns `None` if no
    /// team with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &UpdateTeam,
        changed_by: &str,
    ) -> RepoResult<Option<Team>> {
        let mut tx = pool.begin().await?;

        let current_manager: Option<String> =
            sqlx::query_scalar("SELECT manager_id FROM teams WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(current_manager) = current_manager else {
            return Ok(None);
        };

        if let Some(new_manager) = input
            .manager_id
            .as_deref()
            .filter(|m| *m != current_manager)
        {
            Self::reassign_manager_inner(&mut tx, id, &current_manager, new_manager, changed_by)
                .await?;
        }

        sqlx::query(
            "UPDATE teams SET \
                name = COALESCE($2, name), \
                description = COALESCE($3, description), \
                logo_url = COALESCE($4, logo_url), \
                manager_id = COALESCE($5, manager_id), \
                status = COALESCE($6, status) \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.logo_url)
        .bind(&input.manager_id)
        .bind(&input.status)
        .execute(&mut *tx)
        .await?;

        let team = Self::find_inner(&mut tx, id).await?;
        tx.commit().await?;
        Ok(Some(team))
    }

    /// Move the manager role from `old` to `new`, with history for both users.
    async fn reassign_manager_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        team_id: &str,
        old: &str,
        new: &str,
        changed_by: &str,
    ) -> RepoResult<()> {
        let reason = Some("Manager reassigned");

        if TeamPermissionRepo::delete_inner(tx, team_id, old).await? {
            PermissionHistoryRepo::append_inner(
                tx,
                &NewPermissionHistory {
                    team_id,
                    user_id: old,
                    role: TeamRole::Manager.as_str(),
                    action: PermissionAction::Remove.as_str(),
                    changed_by,
                    reason,
                },
            )
            .await?;
        }

        let action = match TeamPermissionRepo::current_role_inner(tx, team_id, new).await? {
            Some(TeamRole::Manager) => None,
            Some(TeamRole::Member) => {
                TeamPermissionRepo::set_role_inner(tx, team_id, new, TeamRole::Manager).await?;
                Some(PermissionAction::Update)
            }
            None => {
                TeamPermissionRepo::insert_inner(tx, team_id, new, TeamRole::Manager).await?;
                Some(PermissionAction::Add)
            }
        };

        if let Some(action) = action {
            PermissionHistoryRepo::append_inner(
                tx,
                &NewPermissionHistory {
                    team_id,
                    user_id: new,
                    role: TeamRole::Manager.as_str(),
                    action: action.as_str(),
                    changed_by,
                    reason,
                },
            )
            .await?;
        }

        tracing::debug!(team_id, old_manager = old, new_manager = new, "Team manager reassigned");
        Ok(())
    }
}
