//! HTTP-level integration tests for admin endpoints: settings, reporting
//! and the master-data import.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json_auth, put_json_auth};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Values are coerced to the declared type on create and update.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_setting_values_are_coerced(pool: PgPool) {
    let admin = common::register(&pool, "admin-1", true).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/settings",
        serde_json::json!({
            "key": "season_rounds",
            "value": " 12 ",
            "value_type": "number",
            "description": "Rounds per season",
        }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["value"], 12);
    assert_eq!(json["value_type"], "number");
    assert_eq!(json["updated_by"], "admin-1");

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/settings/season_rounds",
        serde_json::json!({ "value": "lots" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/settings/season_rounds",
        serde_json::json!({ "value_type": "string" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["value"], "12");
    assert_eq!(json["value_type"], "string");
    assert_eq!(json["description"], "Rounds per season");

    // Two seeded settings plus the new one.
    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/admin/settings",
        &admin,
    )
    .await;
    let keys: Vec<String> = body_json(response)
        .await
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["key"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(keys.len(), 3);
    assert!(keys.iter().any(|k| k == "season_rounds"));
}

/// Setting keys are unique, including the seeded ones.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_setting_key_returns_409(pool: PgPool) {
    let admin = common::register(&pool, "admin-1", true).await;

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/admin/settings",
        serde_json::json!({ "key": "default_entry_fee", "value": 100 }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Null is never a valid setting value, and unknown keys are 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_null_setting_value_rejected(pool: PgPool) {
    let admin = common::register(&pool, "admin-1", true).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/settings",
        serde_json::json!({ "key": "season", "value": null }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/admin/settings/season",
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// The team size setting caps active players on a team.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_team_member_cap_from_setting(pool: PgPool) {
    let admin = common::register(&pool, "admin-1", true).await;
    let manager = common::register(&pool, "manager-1", false).await;
    let team = common::create_team(&pool, &manager, "Sky Hawks").await;
    let team_id = team["id"].as_str().unwrap();

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/settings/max_team_members",
        serde_json::json!({ "value": 1 }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    common::create_player(&pool, &manager, "JDL000101", Some(team_id), "C").await;

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/players",
        serde_json::json!({
            "name": "Second",
            "external_id": "JDL000102",
            "team_id": team_id,
            "current_class": "C",
        }),
        &manager,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Reporting
// ---------------------------------------------------------------------------

/// Dashboard counts reflect the seeded data.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_dashboard_summary(pool: PgPool) {
    let admin = common::register(&pool, "admin-1", true).await;
    let manager = common::register(&pool, "manager-1", false).await;
    let team = common::create_team(&pool, &manager, "Sky Hawks").await;
    common::create_player(&pool, &manager, "JDL000101", team["id"].as_str(), "C").await;

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/admin/dashboard/summary",
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["total_users"], 2);
    assert_eq!(json["total_teams"], 1);
    assert_eq!(json["active_teams"], 1);
    assert_eq!(json["total_players"], 1);
    assert_eq!(json["total_tournaments"], 0);
    assert_eq!(json["pending_class_changes"], 0);
}

/// A clean database is healthy; a player pointing at a missing team is
/// critical.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_integrity_report(pool: PgPool) {
    let admin = common::register(&pool, "admin-1", true).await;

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/integrity",
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["issue_count"], 0);

    sqlx::query(
        "INSERT INTO players (id, name, external_id, team_id, current_class) \
         VALUES ('orphan', 'Orphan', 'JDL000777', 'missing-team', 'D')",
    )
    .execute(&pool)
    .await
    .unwrap();

    let response = get_auth(common::build_test_app(pool), "/api/v1/admin/integrity", &admin).await;
    let json = body_json(response).await;
    assert_eq!(json["status"], "critical");
    assert_eq!(json["issues"][0]["kind"], "broken_team_reference");
}

/// The cross-team permission history rejects an inverted range.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_permission_history_range(pool: PgPool) {
    let admin = common::register(&pool, "admin-1", true).await;
    let manager = common::register(&pool, "manager-1", false).await;
    common::create_team(&pool, &manager, "Sky Hawks").await;
    common::create_team(&pool, &manager, "Storm Riders").await;

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/permission-history",
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["total"], 2);

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/admin/permission-history?from=2026-06-01T00:00:00Z&to=2026-05-01T00:00:00Z",
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Master-data import
// ---------------------------------------------------------------------------

/// Known players are updated, unknown ids skipped and bad rows reported by
/// line.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_import_players_report(pool: PgPool) {
    let admin = common::register(&pool, "admin-1", true).await;
    let player = common::create_player(&pool, &admin, "JDL000101", None, "C").await;
    let player_id = player["id"].as_str().unwrap();

    let csv = "player_name,jdl_id,participation_count,current_class,last_updated\n\
               Sora Tanaka,JDL000101,12,B,2026-05-01T10:00:00Z\n\
               Unknown Pilot,JDL000555,1,E,2026-05-01T10:00:00Z\n\
               Broken,JDL000102,1,Z,2026-05-01T10:00:00Z\n";

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/players/import",
        serde_json::json!({ "csv_data": csv }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let report = body_json(response).await;
    assert_eq!(report["updated"], 1);
    assert_eq!(report["skipped"], 1);
    assert_eq!(report["errors"].as_array().unwrap().len(), 1);
    assert_eq!(report["errors"][0]["line"], 4);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/players/{player_id}"),
        &admin,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["name"], "Sora Tanaka");
    assert_eq!(json["current_class"], "B");
    assert_eq!(json["participation_count"], 12);
    assert_eq!(json["class_history"][0]["status"], "approved");

    // Re-importing the same file is a no-op for already-synced rows.
    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/admin/players/import",
        serde_json::json!({ "csv_data": csv }),
        &admin,
    )
    .await;
    let report = body_json(response).await;
    assert_eq!(report["updated"], 0);
    assert_eq!(report["skipped"], 2);
}

/// A file missing a required column is rejected as a whole.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_import_missing_column_returns_400(pool: PgPool) {
    let admin = common::register(&pool, "admin-1", true).await;

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/admin/players/import",
        serde_json::json!({ "csv_data": "player_name,jdl_id\nA,JDL000001\n" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
