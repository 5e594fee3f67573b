//! Tournament entry model and DTOs.

use jdl_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from `tournament_entries`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TournamentEntry {
    pub id: EntityId,
    pub tournament_id: EntityId,
    pub player_id: EntityId,
    pub team_id: EntityId,
    pub entry_date: Timestamp,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for entering a player into a tournament.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEntry {
    pub player_id: EntityId,
    pub team_id: EntityId,
}
