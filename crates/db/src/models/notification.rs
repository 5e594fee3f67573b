//! Notification model and DTOs.

use jdl_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: EntityId,
    pub user_id: EntityId,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub reference_id: Option<EntityId>,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Query parameters for listing the caller's notifications.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationQuery {
    /// Only unread notifications when `true`.
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}
