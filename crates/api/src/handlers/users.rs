//! Admin handlers for user accounts (`/admin/users`).
//!
//! Users are never deleted; access is revoked by locking the account.

use axum::extract::{Path, Query, State};
use axum::Json;
use jdl_core::error::CoreError;
use jdl_core::validation::{validate_user, UserDraft};
use jdl_db::models::page::Page;
use jdl_db::models::user::{UpdateUser, User, UserListQuery};
use jdl_db::repositories::UserRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::not_found;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `PUT /admin/users/{id}/admin`.
#[derive(Debug, Deserialize)]
pub struct SetAdminRequest {
    pub is_admin: bool,
}

/// Request body for `PUT /admin/users/{id}/lock`.
#[derive(Debug, Deserialize)]
pub struct SetLockRequest {
    pub is_locked: bool,
}

/// An admin may not remove their own admin flag or lock themselves out.
fn guard_self_change(admin: &AuthUser, target_id: &str, input: &UpdateUser) -> AppResult<()> {
    if admin.user_id != target_id {
        return Ok(());
    }
    if input.is_admin == Some(false) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Admins cannot remove their own admin flag".into(),
        )));
    }
    if input.is_locked == Some(true) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Admins cannot lock their own account".into(),
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/users
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<UserListQuery>,
) -> AppResult<Json<Page<User>>> {
    let page = UserRepo::list(&state.pool, &params).await?;
    Ok(Json(page))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_by_id(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    let user = UserRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| not_found("User", &id))?;
    Ok(Json(user))
}

/// PUT /api/v1/admin/users/{id}
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<User>> {
    validate_user(&UserDraft {
        name: input.name.as_deref(),
        email: input.email.as_deref(),
    })?;
    guard_self_change(&admin, &id, &input)?;

    let user = UserRepo::update(&state.pool, &id, &input)
        .await?
        .ok_or_else(|| not_found("User", &id))?;

    tracing::info!(target_user_id = %id, user_id = %admin.user_id, "User updated");
    Ok(Json(user))
}

/// PUT /api/v1/admin/users/{id}/admin
pub async fn set_admin(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<SetAdminRequest>,
) -> AppResult<Json<User>> {
    guard_self_change(
        &admin,
        &id,
        &UpdateUser {
            is_admin: Some(input.is_admin),
            ..UpdateUser::default()
        },
    )?;

    let user = UserRepo::set_admin(&state.pool, &id, input.is_admin)
        .await?
        .ok_or_else(|| not_found("User", &id))?;

    tracing::info!(
        target_user_id = %id,
        is_admin = input.is_admin,
        user_id = %admin.user_id,
        "User admin flag changed"
    );
    Ok(Json(user))
}

/// PUT /api/v1/admin/users/{id}/lock
pub async fn set_locked(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<SetLockRequest>,
) -> AppResult<Json<User>> {
    guard_self_change(
        &admin,
        &id,
        &UpdateUser {
            is_locked: Some(input.is_locked),
            ..UpdateUser::default()
        },
    )?;

    let user = UserRepo::set_locked(&state.pool, &id, input.is_locked)
        .await?
        .ok_or_else(|| not_found("User", &id))?;

    tracing::info!(
        target_user_id = %id,
        is_locked = input.is_locked,
        user_id = %admin.user_id,
        "User lock changed"
    );
    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn admin(id: &str) -> AuthUser {
        AuthUser {
            user_id: id.into(),
            is_admin: true,
            claims_admin: true,
            name: None,
            email: None,
            record: None,
        }
    }

    #[test]
    fn admin_cannot_demote_self() {
        let input = UpdateUser {
            is_admin: Some(false),
            ..UpdateUser::default()
        };
        assert_matches!(
            guard_self_change(&admin("a1"), "a1", &input),
            Err(AppError::Core(CoreError::Forbidden(_)))
        );
    }

    #[test]
    fn admin_cannot_lock_self() {
        let input = UpdateUser {
            is_locked: Some(true),
            ..UpdateUser::default()
        };
        assert!(guard_self_change(&admin("a1"), "a1", &input).is_err());
    }

    #[test]
    fn admin_may_change_others() {
        let input = UpdateUser {
            is_admin: Some(false),
            is_locked: Some(true),
            ..UpdateUser::default()
        };
        assert!(guard_self_change(&admin("a1"), "u2", &input).is_ok());
    }
}
