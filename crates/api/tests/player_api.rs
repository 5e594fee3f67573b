//! HTTP-level integration tests for players and class-change requests.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json_auth, put_json_auth};
use sqlx::PgPool;

/// Register a manager with a team and one class C player on it.
/// Returns `(manager_token, team_id, player_id)`.
async fn seed_team_player(pool: &PgPool) -> (String, String, String) {
    let manager = common::register(pool, "manager-1", false).await;
    let team = common::create_team(pool, &manager, "Sky Hawks").await;
    let team_id = team["id"].as_str().unwrap().to_string();
    let player = common::create_player(pool, &manager, "JDL000101", Some(&team_id), "C").await;
    let player_id = player["id"].as_str().unwrap().to_string();
    (manager, team_id, player_id)
}

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

/// A team manager can add a player to their team; the detail view carries
/// the team name.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_player_returns_201(pool: PgPool) {
    let (manager, team_id, player_id) = seed_team_player(&pool).await;

    let response = get_auth(
        common::build_test_app(pool),
        &format!("/api/v1/players/{player_id}"),
        &manager,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["team_id"], team_id.as_str());
    assert_eq!(json["team_name"], "Sky Hawks");
    assert_eq!(json["current_class"], "C");
    assert_eq!(json["status"], "active");
    assert!(json["class_history"].as_array().unwrap().is_empty());
}

/// Every invalid field is reported at once.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_player_reports_each_invalid_field(pool: PgPool) {
    let admin = common::register(&pool, "admin-1", true).await;

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/players",
        serde_json::json!({
            "name": "Pilot",
            "external_id": "X1",
            "current_class": "Z",
            "participation_count": -1,
        }),
        &admin,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let fields = &body_json(response).await["fields"];
    assert!(fields["external_id"].is_string());
    assert!(fields["current_class"].is_string());
    assert!(fields["participation_count"].is_string());
}

/// External ids are unique across players.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_external_id_returns_409(pool: PgPool) {
    let admin = common::register(&pool, "admin-1", true).await;
    common::create_player(&pool, &admin, "JDL000101", None, "C").await;

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/players",
        serde_json::json!({
            "name": "Copy",
            "external_id": "JDL000101",
            "current_class": "C",
        }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Players can only be added to a team the caller manages.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_outsider_cannot_add_player_to_team(pool: PgPool) {
    let (_manager, team_id, _player_id) = seed_team_player(&pool).await;
    let outsider = common::register(&pool, "outsider", false).await;

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/players",
        serde_json::json!({
            "name": "Intruder",
            "external_id": "JDL000999",
            "team_id": team_id,
            "current_class": "C",
        }),
        &outsider,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// A direct class edit is admin-only and is recorded as an approved change.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_direct_class_edit_is_admin_only(pool: PgPool) {
    let (manager, _team_id, player_id) = seed_team_player(&pool).await;
    let admin = common::register(&pool, "admin-1", true).await;
    let uri = format!("/api/v1/players/{player_id}");

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        serde_json::json!({ "current_class": "A" }),
        &manager,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        serde_json::json!({ "current_class": "A" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["current_class"], "A");

    let response = get_auth(
        common::build_test_app(pool),
        &format!("{uri}/class-changes"),
        &manager,
    )
    .await;
    let history = body_json(response).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["status"], "approved");
    assert_eq!(history[0]["old_class"], "C");
    assert_eq!(history[0]["new_class"], "A");
    assert_eq!(history[0]["reason"], "Manual update");
}

/// The manager may rename a player without touching the class.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_manager_updates_player(pool: PgPool) {
    let (manager, _team_id, player_id) = seed_team_player(&pool).await;

    let response = put_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/players/{player_id}"),
        serde_json::json!({ "name": "Renamed Pilot", "status": "inactive" }),
        &manager,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Renamed Pilot");
    assert_eq!(json["status"], "inactive");
    assert_eq!(json["current_class"], "C");
}

// ---------------------------------------------------------------------------
// Class changes
// ---------------------------------------------------------------------------

/// Request, approve, then refuse to re-open a decided request.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_class_change_request_and_approval(pool: PgPool) {
    let (manager, _team_id, player_id) = seed_team_player(&pool).await;
    let admin = common::register(&pool, "admin-1", true).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/class-changes",
        serde_json::json!({
            "player_id": player_id,
            "new_class": "B",
            "reason": "Podium at regional cup",
        }),
        &manager,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let change = body_json(response).await;
    assert_eq!(change["status"], "pending");
    assert_eq!(change["old_class"], "C");
    assert_eq!(change["requested_by"], "manager-1");
    let status_uri = format!(
        "/api/v1/class-changes/{}/status",
        change["id"].as_str().unwrap()
    );

    // Deciding is reserved for admins.
    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &status_uri,
        serde_json::json!({ "status": "approved" }),
        &manager,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &status_uri,
        serde_json::json!({ "status": "approved", "comment": "Confirmed" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let decided = body_json(response).await;
    assert_eq!(decided["status"], "approved");
    assert_eq!(decided["approved_by"], "admin-1");
    assert!(decided["decided_at"].is_string());

    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/players/{player_id}"),
        &manager,
    )
    .await;
    assert_eq!(body_json(response).await["current_class"], "B");

    let response = put_json_auth(
        common::build_test_app(pool),
        &status_uri,
        serde_json::json!({ "status": "pending" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "INVALID_TRANSITION");
}

/// A player can have at most one pending request.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_second_pending_request_returns_409(pool: PgPool) {
    let (manager, _team_id, player_id) = seed_team_player(&pool).await;
    let body = serde_json::json!({
        "player_id": player_id,
        "new_class": "B",
        "reason": "Promotion",
    });

    let first = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/class-changes",
        body.clone(),
        &manager,
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/class-changes",
        body,
        &manager,
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

/// Requesting the class the player already has is a field error.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_same_class_request_returns_400(pool: PgPool) {
    let (manager, _team_id, player_id) = seed_team_player(&pool).await;

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/class-changes",
        serde_json::json!({ "player_id": player_id, "new_class": "C", "reason": "No-op" }),
        &manager,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["fields"]["new_class"].is_string());
}

/// Rejected requests leave the player's class untouched and can be
/// filtered by status.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_rejected_request_keeps_class(pool: PgPool) {
    let (manager, _team_id, player_id) = seed_team_player(&pool).await;
    let admin = common::register(&pool, "admin-1", true).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/class-changes",
        serde_json::json!({ "player_id": player_id, "new_class": "A", "reason": "Ambitious" }),
        &manager,
    )
    .await;
    let id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/class-changes/{id}/status"),
        serde_json::json!({ "status": "rejected", "comment": "Not enough results" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/players/{player_id}"),
        &manager,
    )
    .await;
    assert_eq!(body_json(response).await["current_class"], "C");

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/class-changes?status=rejected",
        &manager,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["items"][0]["comment"], "Not enough results");
}
