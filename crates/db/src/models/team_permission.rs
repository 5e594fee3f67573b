//! Team permission and permission-history models and DTOs.

use jdl_core::history::SortOrder;
use jdl_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user's current role on a team.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TeamPermission {
    pub id: EntityId,
    pub team_id: EntityId,
    pub user_id: EntityId,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from `team_permission_history`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PermissionHistory {
    pub id: EntityId,
    pub team_id: EntityId,
    pub user_id: EntityId,
    pub role: String,
    pub action: String,
    pub changed_by: EntityId,
    pub reason: Option<String>,
    pub changed_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Values for one appended history row.
#[derive(Debug, Clone)]
pub struct NewPermissionHistory<'a> {
    pub team_id: &'a str,
    pub user_id: &'a str,
    pub role: &'a str,
    pub action: &'a str,
    pub changed_by: &'a str,
    pub reason: Option<&'a str>,
}

/// DTO for granting a role.
#[derive(Debug, Clone, Deserialize)]
pub struct AddPermission {
    pub user_id: EntityId,
    pub role: String,
    pub reason: Option<String>,
}

/// DTO for changing a role.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePermission {
    pub role: String,
    pub reason: Option<String>,
}

/// Optional reason for a removal, passed as a query parameter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemovePermissionParams {
    pub reason: Option<String>,
}

/// Filters for the permission history.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PermissionHistoryQuery {
    pub team_id: Option<EntityId>,
    pub user_id: Option<EntityId>,
    pub action: Option<String>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    #[serde(default)]
    pub sort: SortOrder,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}
