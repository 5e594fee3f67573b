//! HTTP-level integration tests for teams and team permissions.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json_auth, put_json_auth};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

/// Creating a team returns 201, makes the caller its manager and keeps a
/// Japanese name intact.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_team_returns_201(pool: PgPool) {
    let token = common::register(&pool, "manager-1", false).await;
    let team = common::create_team(&pool, &token, "ドローン・レーサーズ").await;

    assert_eq!(team["name"], "ドローン・レーサーズ");
    assert_eq!(team["manager_id"], "manager-1");
    assert_eq!(team["status"], "active");

    let id = team["id"].as_str().unwrap();
    let response = get_auth(
        common::build_test_app(pool),
        &format!("/api/v1/teams/{id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "ドローン・レーサーズ");
}

/// A blank team name is rejected with a per-field error.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_team_validation_error(pool: PgPool) {
    let token = common::register(&pool, "manager-1", false).await;
    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/teams",
        serde_json::json!({ "name": "   " }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["fields"]["name"].is_string());
}

/// Team names are unique.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_team_name_returns_409(pool: PgPool) {
    let token = common::register(&pool, "manager-1", false).await;
    common::create_team(&pool, &token, "Sky Hawks").await;

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/teams",
        serde_json::json!({ "name": "Sky Hawks" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Only the manager (or an admin) may update a team.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_team_requires_manager(pool: PgPool) {
    let manager = common::register(&pool, "manager-1", false).await;
    let outsider = common::register(&pool, "outsider", false).await;
    let team = common::create_team(&pool, &manager, "Sky Hawks").await;
    let uri = format!("/api/v1/teams/{}", team["id"].as_str().unwrap());

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        serde_json::json!({ "description": "hijacked" }),
        &outsider,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_json_auth(
        common::build_test_app(pool),
        &uri,
        serde_json::json!({ "description": "Kanto league", "status": "archived" }),
        &manager,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["description"], "Kanto league");
    assert_eq!(json["status"], "archived");
}

/// Unknown team ids return 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_nonexistent_team_returns_404(pool: PgPool) {
    let token = common::register(&pool, "manager-1", false).await;
    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/teams/no-such-team",
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Permissions
// ---------------------------------------------------------------------------

/// Add, update and remove a member; each change lands in the history,
/// newest first.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_permission_lifecycle_is_recorded(pool: PgPool) {
    let manager = common::register(&pool, "manager-1", false).await;
    let team = common::create_team(&pool, &manager, "Sky Hawks").await;
    let base = format!("/api/v1/teams/{}", team["id"].as_str().unwrap());

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("{base}/permissions"),
        serde_json::json!({ "user_id": "pilot-1", "role": "member", "reason": "joined" }),
        &manager,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["role"], "member");

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("{base}/permissions/pilot-1"),
        serde_json::json!({ "role": "manager" }),
        &manager,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["role"], "manager");

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("{base}/permissions/pilot-1?reason=left"),
        &manager,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("{base}/permission-history?user_id=pilot-1"),
        &manager,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total"], 3);
    let actions: Vec<&str> = json["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["remove", "update", "add"]);
    assert_eq!(json["items"][0]["reason"], "left");

    let response = get_auth(
        common::build_test_app(pool),
        &format!("{base}/permissions"),
        &manager,
    )
    .await;
    let permissions = body_json(response).await;
    assert_eq!(permissions.as_array().unwrap().len(), 1);
}

/// Adding a role the user already holds conflicts.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_permission_returns_409(pool: PgPool) {
    let manager = common::register(&pool, "manager-1", false).await;
    let team = common::create_team(&pool, &manager, "Sky Hawks").await;
    let uri = format!("/api/v1/teams/{}/permissions", team["id"].as_str().unwrap());
    let body = serde_json::json!({ "user_id": "pilot-1", "role": "member" });

    let first = post_json_auth(common::build_test_app(pool.clone()), &uri, body.clone(), &manager).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json_auth(common::build_test_app(pool), &uri, body, &manager).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

/// The registered manager's permission cannot be removed.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_removing_team_manager_returns_409(pool: PgPool) {
    let manager = common::register(&pool, "manager-1", false).await;
    let team = common::create_team(&pool, &manager, "Sky Hawks").await;

    let response = delete_auth(
        common::build_test_app(pool),
        &format!(
            "/api/v1/teams/{}/permissions/manager-1",
            team["id"].as_str().unwrap()
        ),
        &manager,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// An unknown role is a validation error.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_unknown_role_returns_400(pool: PgPool) {
    let manager = common::register(&pool, "manager-1", false).await;
    let team = common::create_team(&pool, &manager, "Sky Hawks").await;

    let response = post_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/teams/{}/permissions", team["id"].as_str().unwrap()),
        serde_json::json!({ "user_id": "pilot-1", "role": "owner" }),
        &manager,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Non-managers cannot grant permissions.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_outsider_cannot_add_permission(pool: PgPool) {
    let manager = common::register(&pool, "manager-1", false).await;
    let outsider = common::register(&pool, "outsider", false).await;
    let team = common::create_team(&pool, &manager, "Sky Hawks").await;

    let response = post_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/teams/{}/permissions", team["id"].as_str().unwrap()),
        serde_json::json!({ "user_id": "outsider", "role": "manager" }),
        &outsider,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
