//! Player model and DTOs.

use jdl_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::class_change::ClassChange;

/// A player row joined with its team's name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Player {
    pub id: EntityId,
    pub name: String,
    pub external_id: String,
    pub team_id: Option<EntityId>,
    pub team_name: Option<String>,
    pub current_class: String,
    pub participation_count: i32,
    pub status: String,
    pub last_synced_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A player with its class history, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerDetail {
    #[serde(flatten)]
    pub player: Player,
    pub class_history: Vec<ClassChange>,
}

/// DTO for registering a player.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlayer {
    pub id: Option<EntityId>,
    pub name: Option<String>,
    pub external_id: Option<String>,
    pub team_id: Option<EntityId>,
    /// Defaults to `E`.
    pub current_class: Option<String>,
    pub participation_count: Option<i32>,
}

/// DTO for updating a player. All fields are optional.
///
/// `team_id: null` removes the player from its team.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePlayer {
    pub name: Option<String>,
    pub external_id: Option<String>,
    #[serde(default, deserialize_with = "crate::models::deserialize_some")]
    pub team_id: Option<Option<EntityId>>,
    /// Direct class edit (admin only). Recorded as an approved class change.
    pub current_class: Option<String>,
    /// Reason stored with a direct class edit.
    pub class_change_reason: Option<String>,
    pub participation_count: Option<i32>,
    pub status: Option<String>,
}

/// A direct class edit to record alongside a player update.
#[derive(Debug, Clone)]
pub struct ManualClassChange {
    pub new_class: String,
    pub reason: String,
    pub actor_id: EntityId,
}

/// Filters for listing players.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerListQuery {
    pub team_id: Option<EntityId>,
    pub current_class: Option<String>,
    pub status: Option<String>,
    /// Case-insensitive match on name or external id.
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}
