//! Repository for the `notifications` table.
//!
//! Notifications are written inside the transaction of the change they
//! describe, so a rolled-back change never notifies anyone.

use jdl_core::notification::{NotificationKind, NotificationText};
use jdl_core::pagination::resolve_window;
use sqlx::PgPool;

use crate::models::notification::{Notification, NotificationQuery};
use crate::models::page::Page;
use crate::new_id;

const COLUMNS: &str =
    "id, user_id, kind, title, message, reference_id, is_read, read_at, created_at, updated_at";

/// Provides notification delivery and inbox operations.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Store one notification for `user_id`.
    pub(crate) async fn insert_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: &str,
        kind: NotificationKind,
        text: &NotificationText,
        reference_id: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO notifications (id, user_id, kind, title, message, reference_id) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(new_id())
        .bind(user_id)
        .bind(kind.as_str())
        .bind(&text.title)
        .bind(&text.message)
        .bind(reference_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Notify every unlocked admin except `skip_user_id`. Returns the number
    /// of notifications written.
    pub(crate) async fn notify_admins_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        kind: NotificationKind,
        text: &NotificationText,
        reference_id: Option<&str>,
        skip_user_id: &str,
    ) -> Result<usize, sqlx::Error> {
        let admins: Vec<String> = sqlx::query_scalar(
            "SELECT id FROM users WHERE is_admin AND NOT is_locked AND id <> $1 ORDER BY id",
        )
        .bind(skip_user_id)
        .fetch_all(&mut **tx)
        .await?;

        for admin_id in &admins {
            Self::insert_inner(tx, admin_id, kind, text, reference_id).await?;
        }
        Ok(admins.len())
    }

    /// The user's notifications, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: &str,
        params: &NotificationQuery,
    ) -> Result<Page<Notification>, sqlx::Error> {
        let unread = if params.unread_only {
            "AND NOT is_read"
        } else {
            ""
        };
        let (limit, offset) =
            resolve_window(params.limit, params.offset, params.page, params.page_size);

        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE user_id = $1 {unread} \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        let items = sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*)::BIGINT FROM notifications WHERE user_id = $1 {unread}"
        ))
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(Page { items, total })
    }

    /// Mark one of the user's notifications read.
    ///
    /// Returns `None` when the notification does not exist or belongs to
    /// someone else. Marking an already-read notification is a no-op.
    pub async fn mark_read(
        pool: &PgPool,
        id: &str,
        user_id: &str,
    ) -> Result<Option<Notification>, sqlx::Error> {
        let query = format!(
            "UPDATE notifications \
             SET is_read = TRUE, read_at = COALESCE(read_at, NOW()) \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Mark all of the user's unread notifications read. Returns how many
    /// changed.
    pub async fn mark_all_read(pool: &PgPool, user_id: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, read_at = NOW() \
             WHERE user_id = $1 AND NOT is_read",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
