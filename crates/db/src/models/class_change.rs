//! Class-change history model and DTOs.

use jdl_core::history::SortOrder;
use jdl_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from `class_change_history`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClassChange {
    pub id: EntityId,
    pub player_id: EntityId,
    pub old_class: String,
    pub new_class: String,
    pub reason: String,
    pub status: String,
    pub requested_by: EntityId,
    pub approved_by: Option<EntityId>,
    pub comment: Option<String>,
    pub changed_at: Timestamp,
    pub decided_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for requesting a class change. The old class is the player's current one.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClassChange {
    pub player_id: EntityId,
    pub new_class: Option<String>,
    pub reason: Option<String>,
}

/// DTO for deciding a pending request.
#[derive(Debug, Clone, Deserialize)]
pub struct DecideClassChange {
    pub status: String,
    pub comment: Option<String>,
}

/// Filters for the class-change history.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassChangeQuery {
    pub player_id: Option<EntityId>,
    pub status: Option<String>,
    /// Matches either the old or the new class.
    pub class: Option<String>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    #[serde(default)]
    pub sort: SortOrder,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}
