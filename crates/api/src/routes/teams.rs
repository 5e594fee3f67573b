//! Route definitions for the `/teams` resource, including team permissions.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{permissions, teams};
use crate::state::AppState;

/// Routes mounted at `/teams`.
///
/// ```text
/// GET    /                                 -> list
/// POST   /                                 -> create
/// GET    /{id}                             -> get_by_id
/// PUT    /{id}                             -> update
///
/// GET    /{id}/permissions                 -> permissions::list
/// POST   /{id}/permissions                 -> permissions::add
/// PUT    /{id}/permissions/{user_id}       -> permissions::update
/// DELETE /{id}/permissions/{user_id}       -> permissions::remove
/// GET    /{id}/permission-history          -> permissions::history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(teams::list).post(teams::create))
        .route("/{id}", get(teams::get_by_id).put(teams::update))
        .route(
            "/{id}/permissions",
            get(permissions::list).post(permissions::add),
        )
        .route(
            "/{id}/permissions/{user_id}",
            put(permissions::update).delete(permissions::remove),
        )
        .route("/{id}/permission-history", get(permissions::history))
}
