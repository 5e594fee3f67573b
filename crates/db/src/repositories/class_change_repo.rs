//! Repository for the `class_change_history` table.
//!
//! Requests are created `pending` and decided once; approval updates the
//! player's class in the same transaction. Admins are notified of new
//! requests and requesters of decisions, also in the same transaction.

use jdl_core::actor::Actor;
use jdl_core::error::CoreError;
use jdl_core::notification::{self, NotificationKind};
use jdl_core::pagination::resolve_window;
use jdl_core::status::{authorize_transition, ClassChangeStatus};
use sqlx::PgPool;

use crate::error::RepoResult;
use crate::models::class_change::{ClassChange, ClassChangeQuery};
use crate::models::page::Page;
use crate::new_id;
use crate::repositories::filter::{BindValue, Filter};
use crate::repositories::notification_repo::NotificationRepo;

const COLUMNS: &str = "id, player_id, old_class, new_class, reason, status, requested_by, \
    approved_by, comment, changed_at, decided_at, created_at, updated_at";

/// Values for a new pending request.
#[derive(Debug, Clone)]
pub struct NewClassChange<'a> {
    pub player_id: &'a str,
    /// The class the requester saw; must still be the player's class.
    pub old_class: &'a str,
    pub new_class: &'a str,
    pub reason: &'a str,
    pub requested_by: &'a str,
}

/// Provides class-change request and decision operations.
pub struct ClassChangeRepo;

impl ClassChangeRepo {
    /// Record a pending request.
    ///
    /// Fails with a conflict if the player's class moved since `old_class`
    /// was read. A second pending request for the same player violates
    /// `uq_class_change_pending_player`.
    pub async fn create_request(
        pool: &PgPool,
        input: &NewClassChange<'_>,
    ) -> RepoResult<ClassChange> {
        let mut tx = pool.begin().await?;

        let player: Option<(String, String)> =
            sqlx::query_as("SELECT current_class, name FROM players WHERE id = $1 FOR UPDATE")
                .bind(input.player_id)
                .fetch_optional(&mut *tx)
                .await?;
        let (current, player_name) = player.ok_or_else(|| CoreError::NotFound {
            entity: "Player",
            id: input.player_id.to_string(),
        })?;
        if current != input.old_class {
            return Err(CoreError::Conflict(format!(
                "Player class is now '{current}'; reload and retry"
            ))
            .into());
        }

        let query = format!(
            "INSERT INTO class_change_history \
                (id, player_id, old_class, new_class, reason, requested_by) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        let change = sqlx::query_as::<_, ClassChange>(&query)
            .bind(new_id())
            .bind(input.player_id)
            .bind(input.old_class)
            .bind(input.new_class)
            .bind(input.reason)
            .bind(input.requested_by)
            .fetch_one(&mut *tx)
            .await?;

        let text =
            notification::class_change_requested(&player_name, input.old_class, input.new_class);
        let notified = NotificationRepo::notify_admins_inner(
            &mut tx,
            NotificationKind::ClassChangeRequested,
            &text,
            Some(change.id.as_str()),
            input.requested_by,
        )
        .await?;

        tx.commit().await?;
        tracing::debug!(class_change_id = %change.id, admins = notified, "Class change requested");
        Ok(change)
    }

    /// Append an already-approved change, e.g. for a direct admin edit or a
    /// master-data sync. The caller updates the player row.
    pub(crate) async fn insert_approved_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        player_id: &str,
        old_class: &str,
        new_class: &str,
        reason: &str,
        actor_id: &str,
    ) -> Result<ClassChange, sqlx::Error> {
        let query = format!(
            "INSERT INTO class_change_history \
                (id, player_id, old_class, new_class, reason, status, \
                 requested_by, approved_by, decided_at) \
             VALUES ($1, $2, $3, $4, $5, 'approved', $6, $6, clock_timestamp()) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClassChange>(&query)
            .bind(new_id())
            .bind(player_id)
            .bind(old_class)
            .bind(new_class)
            .bind(reason)
            .bind(actor_id)
            .fetch_one(&mut **tx)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<ClassChange>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM class_change_history WHERE id = $1");
        sqlx::query_as::<_, ClassChange>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A player's class history, newest first.
    pub async fn list_for_player(
        pool: &PgPool,
        player_id: &str,
    ) -> Result<Vec<ClassChange>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM class_change_history WHERE player_id = $1 \
             ORDER BY changed_at DESC, id DESC"
        );
        sqlx::query_as::<_, ClassChange>(&query)
            .bind(player_id)
            .fetch_all(pool)
            .await
    }

    /// Filtered, paginated class changes with the total matching count.
    pub async fn list(
        pool: &PgPool,
        params: &ClassChangeQuery,
    ) -> Result<Page<ClassChange>, sqlx::Error> {
        let mut filter = Filter::new();
        filter.eq_text("player_id", params.player_id.as_deref());
        filter.eq_text("status", params.status.as_deref());
        if let Some(class) = params.class.as_deref() {
            filter.push(
                "(old_class = {} OR new_class = {})",
                BindValue::Text(class.to_string()),
            );
        }
        filter.range("changed_at", params.from, params.to);

        let where_clause = filter.where_clause();
        let (limit, offset) =
            resolve_window(params.limit, params.offset, params.page, params.page_size);
        let direction = params.sort.as_sql();
        let idx = filter.next_index();

        let query = format!(
            "SELECT {COLUMNS} FROM class_change_history {where_clause} \
             ORDER BY changed_at {direction}, id {direction} \
             LIMIT ${idx} OFFSET ${}",
            idx + 1
        );
        let items = filter
            .bind_as(sqlx::query_as::<_, ClassChange>(&query))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let count_query =
            format!("SELECT COUNT(*)::BIGINT FROM class_change_history {where_clause}");
        let total = filter
            .bind_scalar(sqlx::query_scalar::<_, i64>(&count_query))
            .fetch_one(pool)
            .await?;

        Ok(Page { items, total })
    }

    /// Approve or reject a pending request.
    ///
    /// The request and its player are locked; approval fails with a conflict
    /// if the player's class no longer equals the request's `old_class`.
    /// Returns `None` if no request with the given `id` exists.
    pub async fn decide(
        pool: &PgPool,
        id: &str,
        actor: &Actor,
        status: &str,
        comment: Option<&str>,
    ) -> RepoResult<Option<ClassChange>> {
        let mut tx = pool.begin().await?;

        let row: Option<(String, String, String, String, String)> = sqlx::query_as(
            "SELECT status, player_id, old_class, new_class, requested_by \
             FROM class_change_history WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((current, player_id, old_class, new_class, requested_by)) = row else {
            return Ok(None);
        };

        let (_, next) = authorize_transition::<ClassChangeStatus>(actor, &current, status, None)?;

        let (player_class, player_name): (String, String) =
            sqlx::query_as("SELECT current_class, name FROM players WHERE id = $1 FOR UPDATE")
                .bind(&player_id)
                .fetch_one(&mut *tx)
                .await?;

        if next == ClassChangeStatus::Approved {
            if player_class != old_class {
                return Err(CoreError::Conflict(format!(
                    "Player class changed to '{player_class}' after this request was made"
                ))
                .into());
            }
            sqlx::query("UPDATE players SET current_class = $2 WHERE id = $1")
                .bind(&player_id)
                .bind(&new_class)
                .execute(&mut *tx)
                .await?;
        }

        let query = format!(
            "UPDATE class_change_history SET \
                status = $2, approved_by = $3, comment = $4, decided_at = clock_timestamp() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let change = sqlx::query_as::<_, ClassChange>(&query)
            .bind(id)
            .bind(next.as_str())
            .bind(&actor.user_id)
            .bind(comment)
            .fetch_one(&mut *tx)
            .await?;

        if requested_by != actor.user_id {
            let text = notification::class_change_decided(&player_name, &new_class, next);
            NotificationRepo::insert_inner(
                &mut tx,
                &requested_by,
                NotificationKind::ClassChangeDecided,
                &text,
                Some(id),
            )
            .await?;
        }

        tx.commit().await?;
        tracing::debug!(class_change_id = id, status = next.as_str(), "Class change decided");
        Ok(Some(change))
    }
}
