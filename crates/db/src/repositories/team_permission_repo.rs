//! Repository for the `team_permissions` table.
//!
//! Every change goes through [`TeamPermissionRepo::apply`] or the crate-level
//! helpers, which write the matching history row in the same transaction.

use jdl_core::actor::Actor;
use jdl_core::error::CoreError;
use jdl_core::permission::{check_permission_action, PermissionAction, TeamRole};
use sqlx::PgPool;

use crate::error::RepoResult;
use crate::models::team_permission::{NewPermissionHistory, TeamPermission};
use crate::new_id;
use crate::repositories::permission_history_repo::PermissionHistoryRepo;

const COLUMNS: &str = "id, team_id, user_id, role, created_at, updated_at";

/// A requested change to one user's role on a team.
#[derive(Debug, Clone)]
pub struct PermissionChange<'a> {
    pub team_id: &'a str,
    pub user_id: &'a str,
    pub action: PermissionAction,
    /// Required for `add` and `update`.
    pub role: Option<TeamRole>,
    pub reason: Option<&'a str>,
}

/// Reads and changes team roles.
pub struct TeamPermissionRepo;

impl TeamPermissionRepo {
    /// Current roles on a team, oldest first.
    pub async fn list_for_team(
        pool: &PgPool,
        team_id: &str,
    ) -> Result<Vec<TeamPermission>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM team_permissions WHERE team_id = $1 \
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, TeamPermission>(&query)
            .bind(team_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find(
        pool: &PgPool,
        team_id: &str,
        user_id: &str,
    ) -> Result<Option<TeamPermission>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM team_permissions WHERE team_id = $1 AND user_id = $2");
        sqlx::query_as::<_, TeamPermission>(&query)
            .bind(team_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Apply an add, update or remove and record it in history.
    ///
    /// The team row is locked for the duration, so concurrent changes to the
    /// same team are serialized. Returns the resulting permission, or `None`
    /// after a removal.
    pub async fn apply(
        pool: &PgPool,
        actor: &Actor,
        change: &PermissionChange<'_>,
    ) -> RepoResult<Option<TeamPermission>> {
        let mut tx = pool.begin().await?;

        let manager_id: Option<String> =
            sqlx::query_scalar("SELECT manager_id FROM teams WHERE id = $1 FOR UPDATE")
                .bind(change.team_id)
                .fetch_optional(&mut *tx)
                .await?;
        let manager_id = manager_id.ok_or_else(|| CoreError::NotFound {
            entity: "Team",
            id: change.team_id.to_string(),
        })?;
        actor.require_team_manager(&manager_id)?;

        let current = Self::current_role_inner(&mut tx, change.team_id, change.user_id).await?;
        check_permission_action(
            change.action,
            current,
            change.role,
            change.user_id == manager_id,
        )?;

        let (result, recorded_role) = match (change.action, change.role, current) {
            (PermissionAction::Add, Some(role), _) => {
                let perm =
                    Self::insert_inner(&mut tx, change.team_id, change.user_id, role).await?;
                (Some(perm), role)
            }
            (PermissionAction::Update, Some(role), _) => {
                let perm =
                    Self::set_role_inner(&mut tx, change.team_id, change.user_id, role).await?;
                (Some(perm), role)
            }
            (PermissionAction::Remove, _, Some(existing)) => {
                Self::delete_inner(&mut tx, change.team_id, change.user_id).await?;
                (None, existing)
            }
            _ => {
                return Err(CoreError::Internal("Unchecked permission change".into()).into());
            }
        };

        PermissionHistoryRepo::append_inner(
            &mut tx,
            &NewPermissionHistory {
                team_id: change.team_id,
                user_id: change.user_id,
                role: recorded_role.as_str(),
                action: change.action.as_str(),
                changed_by: &actor.user_id,
                reason: change.reason,
            },
        )
        .await?;

        tx.commit().await?;
        tracing::debug!(
            team_id = change.team_id,
            user_id = change.user_id,
            action = %change.action,
            "Team permission changed"
        );
        Ok(result)
    }

    /// The user's current role, locking the row when it exists.
    pub(crate) async fn current_role_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        team_id: &str,
        user_id: &str,
    ) -> RepoResult<Option<TeamRole>> {
        let role: Option<String> = sqlx::query_scalar(
            "SELECT role FROM team_permissions WHERE team_id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await?;
        role.map(|r| r.parse::<TeamRole>().map_err(CoreError::Internal))
            .transpose()
            .map_err(Into::into)
    }

    pub(crate) async fn insert_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        team_id: &str,
        user_id: &str,
        role: TeamRole,
    ) -> Result<TeamPermission, sqlx::Error> {
        let query = format!(
            "INSERT INTO team_permissions (id, team_id, user_id, role) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TeamPermission>(&query)
            .bind(new_id())
            .bind(team_id)
            .bind(user_id)
            .bind(role.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_role_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        team_id: &str,
        user_id: &str,
        role: TeamRole,
    ) -> Result<TeamPermission, sqlx::Error> {
        let query = format!(
            "UPDATE team_permissions SET role = $3 \
             WHERE team_id = $1 AND user_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TeamPermission>(&query)
            .bind(team_id)
            .bind(user_id)
            .bind(role.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        team_id: &str,
        user_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM team_permissions WHERE team_id = $1 AND user_id = $2")
                .bind(team_id)
                .bind(user_id)
                .execute(&mut **tx)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
