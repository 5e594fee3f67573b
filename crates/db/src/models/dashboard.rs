//! Admin dashboard summary.

use serde::Serialize;
use sqlx::FromRow;

/// Entity counts shown on the admin dashboard.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DashboardSummary {
    pub total_users: i64,
    pub total_teams: i64,
    pub active_teams: i64,
    pub total_players: i64,
    pub total_tournaments: i64,
    pub open_tournaments: i64,
    pub pending_class_changes: i64,
}
