//! Handlers for the current user (`/me`).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use jdl_core::validation::{validate_user, UserDraft};
use jdl_db::models::user::{SyncUser, User};
use jdl_db::repositories::UserRepo;

use crate::error::AppResult;
use crate::handlers::not_found;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/me
///
/// The caller's stored user record. 404 until they register via `POST /me`.
pub async fn get_me(user: AuthUser) -> AppResult<Json<User>> {
    let record = user.record.ok_or_else(|| not_found("User", &user.user_id))?;
    Ok(Json(record))
}

/// POST /api/v1/me
///
/// Create or refresh the caller's user record from their credential.
/// Returns 201 on first registration, 200 afterwards.
pub async fn sync_me(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<User>)> {
    validate_user(&UserDraft {
        name: user.name.as_deref(),
        email: user.email.as_deref(),
    })?;

    let input = SyncUser {
        id: user.user_id.clone(),
        name: user.name.clone(),
        email: user.email.clone(),
        is_admin: user.claims_admin,
    };
    let synced = UserRepo::sync_from_credential(&state.pool, &input).await?;

    let status = if user.record.is_none() {
        tracing::info!(user_id = %synced.id, "User registered");
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(synced)))
}
