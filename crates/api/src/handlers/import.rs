//! Master-data CSV import (`/admin/players/import`).

use axum::extract::State;
use axum::Json;
use jdl_core::import::{parse_master_csv, ImportError, ImportReport};
use jdl_db::repositories::PlayerRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Request body for a master-data import.
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub csv_data: String,
}

/// POST /api/v1/admin/players/import
///
/// Reconcile players with the federation master file. Each row is applied in
/// its own transaction: a bad row is reported and the rest still apply.
/// Unknown external ids and rows not newer than the last sync are skipped.
pub async fn import_players(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<ImportRequest>,
) -> AppResult<Json<ImportReport>> {
    let parsed = parse_master_csv(&input.csv_data)?;

    let mut report = ImportReport {
        errors: parsed.errors,
        ..ImportReport::default()
    };

    for record in &parsed.records {
        match PlayerRepo::apply_master_record(&state.pool, record, &admin.user_id).await {
            Ok(true) => report.updated += 1,
            Ok(false) => report.skipped += 1,
            Err(e) => {
                tracing::error!(line = record.line, error = %e, "Failed to apply master record");
                report.errors.push(ImportError {
                    line: record.line,
                    message: "Failed to apply row".into(),
                });
            }
        }
    }
    report.errors.sort_by_key(|e| e.line);

    tracing::info!(
        updated = report.updated,
        skipped = report.skipped,
        errors = report.errors.len(),
        user_id = %admin.user_id,
        "Master data import completed"
    );
    Ok(Json(report))
}
