#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use jdl_api::auth::jwt::{issue_token, AuthConfig, TokenSubject};
use jdl_api::config::ServerConfig;
use jdl_api::router::build_app_router;
use jdl_api::state::AppState;

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        secret: "integration-test-secret-with-enough-length".to_string(),
        issuer: None,
        audience: None,
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        auth: test_auth_config(),
    }
}

/// Build the full application router, with the production middleware stack,
/// over the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Issue a credential for `user_id`.
pub fn token_for(user_id: &str, admin: bool) -> String {
    let subject = TokenSubject {
        user_id,
        name: Some(user_id),
        email: None,
        admin,
    };
    issue_token(&subject, 900, &test_auth_config()).expect("token issue should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Register `user_id` via `POST /me` and return their credential.
pub async fn register(pool: &PgPool, user_id: &str, admin: bool) -> String {
    let token = token_for(user_id, admin);
    let response = post_auth(build_test_app(pool.clone()), "/api/v1/me", &token).await;
    assert!(
        response.status().is_success(),
        "registering {user_id} failed with {}",
        response.status()
    );
    token
}

/// Create a team managed by the holder of `token` and return its JSON.
pub async fn create_team(pool: &PgPool, token: &str, name: &str) -> serde_json::Value {
    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/teams",
        serde_json::json!({ "name": name, "description": "test team" }),
        token,
    )
    .await;
    assert_eq!(response.status(), 201, "team creation failed");
    body_json(response).await
}

/// Create a player and return its JSON.
pub async fn create_player(
    pool: &PgPool,
    token: &str,
    external_id: &str,
    team_id: Option<&str>,
    class: &str,
) -> serde_json::Value {
    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/players",
        serde_json::json!({
            "name": format!("Pilot {external_id}"),
            "external_id": external_id,
            "team_id": team_id,
            "current_class": class,
            "participation_count": 3,
        }),
        token,
    )
    .await;
    assert_eq!(response.status(), 201, "player creation failed");
    body_json(response).await
}

/// A valid tournament body with its entry window open now.
pub fn open_tournament_body(name: &str) -> serde_json::Value {
    let now = chrono::Utc::now();
    serde_json::json!({
        "name": name,
        "venue": "Makuhari Messe",
        "entry_fee": 500,
        "entry_start_date": now - chrono::Duration::days(1),
        "entry_end_date": now + chrono::Duration::days(5),
        "start_date": now + chrono::Duration::days(10),
        "end_date": now + chrono::Duration::days(11),
    })
}
