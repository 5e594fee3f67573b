//! Handlers for the caller's inbox (`/me/notifications`).
//!
//! Notifications are only ever visible to their recipient; another user's
//! id answers 404.

use axum::extract::{Path, Query, State};
use axum::Json;
use jdl_db::models::notification::{Notification, NotificationQuery};
use jdl_db::models::page::Page;
use jdl_db::repositories::NotificationRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::handlers::not_found;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub marked_read: u64,
}

/// GET /api/v1/me/notifications
///
/// Newest first. `unread_only=true` hides read notifications.
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<NotificationQuery>,
) -> AppResult<Json<Page<Notification>>> {
    let page = NotificationRepo::list_for_user(&state.pool, &user.user_id, &params).await?;
    Ok(Json(page))
}

/// POST /api/v1/me/notifications/{id}/read
pub async fn mark_read(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Notification>> {
    let notification = NotificationRepo::mark_read(&state.pool, &id, &user.user_id)
        .await?
        .ok_or_else(|| not_found("Notification", &id))?;
    Ok(Json(notification))
}

/// POST /api/v1/me/notifications/read-all
pub async fn mark_all_read(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<MarkedRead>> {
    let marked_read = NotificationRepo::mark_all_read(&state.pool, &user.user_id).await?;
    tracing::debug!(user_id = %user.user_id, marked_read, "Notifications marked read");
    Ok(Json(MarkedRead { marked_read }))
}
