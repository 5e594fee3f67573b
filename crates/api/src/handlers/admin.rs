//! Admin-only reporting: dashboard counts, integrity checks and the
//! cross-team permission history.

use axum::extract::{Query, State};
use axum::Json;
use jdl_core::integrity::{build_report, IntegrityReport};
use jdl_db::models::dashboard::DashboardSummary;
use jdl_db::models::page::Page;
use jdl_db::models::team_permission::{PermissionHistory, PermissionHistoryQuery};
use jdl_db::repositories::{DashboardRepo, IntegrityRepo, PermissionHistoryRepo};

use crate::error::AppResult;
use crate::handlers::check_range;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// GET /api/v1/admin/dashboard/summary
pub async fn dashboard_summary(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DashboardSummary>> {
    let summary = DashboardRepo::summary(&state.pool).await?;
    Ok(Json(summary))
}

/// GET /api/v1/admin/integrity
///
/// Runs every integrity check and grades the findings.
pub async fn integrity_report(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<IntegrityReport>> {
    let issues = IntegrityRepo::find_issues(&state.pool).await?;
    let report = build_report(issues, chrono::Utc::now());

    tracing::info!(
        status = report.status,
        issue_count = report.issue_count,
        user_id = %admin.user_id,
        "Integrity check completed"
    );
    Ok(Json(report))
}

/// GET /api/v1/admin/permission-history
///
/// Supports `team_id`, `user_id`, `action`, `from`, `to`, `sort` and paging.
pub async fn permission_history(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PermissionHistoryQuery>,
) -> AppResult<Json<Page<PermissionHistory>>> {
    check_range(params.from, params.to)?;
    let page = PermissionHistoryRepo::list(&state.pool, &params).await?;
    Ok(Json(page))
}
