//! Repository for the `users` table.

use jdl_core::pagination::resolve_window;
use sqlx::PgPool;

use crate::models::page::Page;
use crate::models::user::{SyncUser, UpdateUser, User, UserListQuery};
use crate::repositories::filter::{BindValue, Filter};

const COLUMNS: &str = "id, name, email, is_admin, is_locked, created_at, updated_at";

/// Provides user sync and admin management.
pub struct UserRepo;

impl UserRepo {
    /// Create or refresh a user from a verified credential.
    ///
    /// Blank profile fields never overwrite stored ones, and a credential
    /// never revokes a stored admin flag.
    pub async fn sync_from_credential(pool: &PgPool, input: &SyncUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (id, name, email, is_admin) \
             VALUES ($1, COALESCE($2, ''), $3, $4) \
             ON CONFLICT (id) DO UPDATE SET \
                name = CASE WHEN EXCLUDED.name <> '' THEN EXCLUDED.name ELSE users.name END, \
                email = COALESCE(EXCLUDED.email, users.email), \
                is_admin = users.is_admin OR EXCLUDED.is_admin \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(input.is_admin)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Filtered, paginated users, newest first.
    pub async fn list(pool: &PgPool, params: &UserListQuery) -> Result<Page<User>, sqlx::Error> {
        let mut filter = Filter::new();
        filter.search(&["name", "email"], params.search.as_deref());
        if let Some(is_admin) = params.is_admin {
            filter.push("is_admin = {}", BindValue::Bool(is_admin));
        }

        let where_clause = filter.where_clause();
        let (limit, offset) =
            resolve_window(params.limit, params.offset, params.page, params.page_size);
        let idx = filter.next_index();

        let query = format!(
            "SELECT {COLUMNS} FROM users {where_clause} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${idx} OFFSET ${}",
            idx + 1
        );
        let items = filter
            .bind_as(sqlx::query_as::<_, User>(&query))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*)::BIGINT FROM users {where_clause}");
        let total = filter
            .bind_scalar(sqlx::query_scalar::<_, i64>(&count_query))
            .fetch_one(pool)
            .await?;

        Ok(Page { items, total })
    }

    /// Update a user. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no user with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET \
                name = COALESCE($2, name), \
                email = COALESCE($3, email), \
                is_admin = COALESCE($4, is_admin), \
                is_locked = COALESCE($5, is_locked) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(input.is_admin)
            .bind(input.is_locked)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_admin(
        pool: &PgPool,
        id: &str,
        is_admin: bool,
    ) -> Result<Option<User>, sqlx::Error> {
        Self::update(
            pool,
            id,
            &UpdateUser {
                is_admin: Some(is_admin),
                ..UpdateUser::default()
            },
        )
        .await
    }

    pub async fn set_locked(
        pool: &PgPool,
        id: &str,
        is_locked: bool,
    ) -> Result<Option<User>, sqlx::Error> {
        Self::update(
            pool,
            id,
            &UpdateUser {
                is_locked: Some(is_locked),
                ..UpdateUser::default()
            },
        )
        .await
    }
}
