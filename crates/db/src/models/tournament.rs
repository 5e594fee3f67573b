//! Tournament model and DTOs.

use jdl_core::entry::EntryRestriction;
use jdl_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::models::entry::TournamentEntry;

/// A tournament row with its derived active-entry count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tournament {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub venue: String,
    pub entry_fee: i32,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub entry_start_date: Timestamp,
    pub entry_end_date: Timestamp,
    pub status: String,
    pub entry_restriction: Json<EntryRestriction>,
    /// Entries that are neither rejected nor cancelled.
    pub current_entries: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A tournament with its entries.
#[derive(Debug, Clone, Serialize)]
pub struct TournamentDetail {
    #[serde(flatten)]
    pub tournament: Tournament,
    pub entries: Vec<TournamentEntry>,
}

/// DTO for creating a tournament. Required fields are optional here so that
/// missing values surface as field errors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTournament {
    pub id: Option<EntityId>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub venue: Option<String>,
    /// Falls back to the `default_entry_fee` setting.
    pub entry_fee: Option<i32>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub entry_start_date: Option<Timestamp>,
    pub entry_end_date: Option<Timestamp>,
    /// Defaults to `draft`.
    pub status: Option<String>,
    pub entry_restriction: Option<EntryRestriction>,
}

/// Fully-resolved values written on create.
#[derive(Debug, Clone)]
pub struct NewTournament {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub venue: String,
    pub entry_fee: i32,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub entry_start_date: Timestamp,
    pub entry_end_date: Timestamp,
    pub status: String,
    pub entry_restriction: EntryRestriction,
}

/// DTO for updating a tournament. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTournament {
    pub name: Option<String>,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub entry_fee: Option<i32>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub entry_start_date: Option<Timestamp>,
    pub entry_end_date: Option<Timestamp>,
    /// Subject to the tournament transition policy.
    pub status: Option<String>,
    pub entry_restriction: Option<EntryRestriction>,
}

/// DTO for an explicit status transition.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatus {
    pub status: String,
}

/// Filters for listing tournaments.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TournamentListQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}
