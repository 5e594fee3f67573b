//! Aggregate counts for the admin dashboard.

use sqlx::PgPool;

use crate::models::dashboard::DashboardSummary;

/// Read-only dashboard queries.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Entity counts in a single round trip.
    pub async fn summary(pool: &PgPool) -> Result<DashboardSummary, sqlx::Error> {
        sqlx::query_as::<_, DashboardSummary>(
            "SELECT \
                (SELECT COUNT(*) FROM users)::BIGINT AS total_users, \
                (SELECT COUNT(*) FROM teams)::BIGINT AS total_teams, \
                (SELECT COUNT(*) FROM teams WHERE status = 'active')::BIGINT AS active_teams, \
                (SELECT COUNT(*) FROM players)::BIGINT AS total_players, \
                (SELECT COUNT(*) FROM tournaments)::BIGINT AS total_tournaments, \
                (SELECT COUNT(*) FROM tournaments WHERE status = 'entry_open')::BIGINT \
                    AS open_tournaments, \
                (SELECT COUNT(*) FROM class_change_history WHERE status = 'pending')::BIGINT \
                    AS pending_class_changes",
        )
        .fetch_one(pool)
        .await
    }
}
