//! Team model and DTOs.

use jdl_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A team row with its derived active-member count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Team {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub manager_id: EntityId,
    pub status: String,
    pub member_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a team. The creator becomes its manager.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTeam {
    /// Explicit id; generated when omitted.
    pub id: Option<EntityId>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
}

/// DTO for updating a team. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTeam {
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    /// Reassigns the team; recorded in permission history.
    pub manager_id: Option<EntityId>,
    pub status: Option<String>,
}

/// Filters for listing teams.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamListQuery {
    pub status: Option<String>,
    pub manager_id: Option<EntityId>,
    /// Case-insensitive match on name.
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}
