//! Repository for the append-only `team_permission_history` table.

use jdl_core::pagination::resolve_window;
use sqlx::PgPool;

use crate::models::page::Page;
use crate::models::team_permission::{
    NewPermissionHistory, PermissionHistory, PermissionHistoryQuery,
};
use crate::new_id;
use crate::repositories::filter::{BindValue, Filter};

const COLUMNS: &str =
    "id, team_id, user_id, role, action, changed_by, reason, changed_at, created_at, updated_at";

/// Appends and queries permission history. Rows are never updated.
pub struct PermissionHistoryRepo;

impl PermissionHistoryRepo {
    /// Append a history row inside the caller's transaction.
    pub(crate) async fn append_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        entry: &NewPermissionHistory<'_>,
    ) -> Result<PermissionHistory, sqlx::Error> {
        let query = format!(
            "INSERT INTO team_permission_history \
                (id, team_id, user_id, role, action, changed_by, reason) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PermissionHistory>(&query)
            .bind(new_id())
            .bind(entry.team_id)
            .bind(entry.user_id)
            .bind(entry.role)
            .bind(entry.action)
            .bind(entry.changed_by)
            .bind(entry.reason)
            .fetch_one(&mut **tx)
            .await
    }

    /// Filtered, paginated history with the total matching count.
    ///
    /// Ordered by `changed_at` in the requested direction, ties broken by id.
    pub async fn list(
        pool: &PgPool,
        params: &PermissionHistoryQuery,
    ) -> Result<Page<PermissionHistory>, sqlx::Error> {
        let filter = build_history_filter(params);
        let where_clause = filter.where_clause();
        let (limit, offset) =
            resolve_window(params.limit, params.offset, params.page, params.page_size);
        let direction = params.sort.as_sql();
        let idx = filter.next_index();

        let query = format!(
            "SELECT {COLUMNS} FROM team_permission_history {where_clause} \
             ORDER BY changed_at {direction}, id {direction} \
             LIMIT ${idx} OFFSET ${}",
            idx + 1
        );
        let items = filter
            .bind_as(sqlx::query_as::<_, PermissionHistory>(&query))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let count_query =
            format!("SELECT COUNT(*)::BIGINT FROM team_permission_history {where_clause}");
        let total = filter
            .bind_scalar(sqlx::query_scalar::<_, i64>(&count_query))
            .fetch_one(pool)
            .await?;

        Ok(Page { items, total })
    }
}

fn build_history_filter(params: &PermissionHistoryQuery) -> Filter {
    let mut filter = Filter::new();
    filter.eq_text("team_id", params.team_id.as_deref());
    filter.eq_text("user_id", params.user_id.as_deref());
    if let Some(action) = params.action.as_deref() {
        filter.push("action = {}", BindValue::Text(action.to_string()));
    }
    filter.range("changed_at", params.from, params.to);
    filter
}
