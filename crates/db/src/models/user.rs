//! User model and DTOs.

use jdl_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: EntityId,
    pub name: String,
    pub email: Option<String>,
    pub is_admin: bool,
    pub is_locked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Profile fields taken from a verified credential.
#[derive(Debug, Clone)]
pub struct SyncUser {
    pub id: EntityId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub is_admin: bool,
}

/// DTO for an admin update of a user. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub is_admin: Option<bool>,
    pub is_locked: Option<bool>,
}

/// Filters for listing users.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListQuery {
    /// Case-insensitive match on name or email.
    pub search: Option<String>,
    pub is_admin: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}
