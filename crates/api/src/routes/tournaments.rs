//! Route definitions for the `/tournaments` resource.
//!
//! Entries are nested under `/tournaments/{id}/entries`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{entries, tournaments};
use crate::state::AppState;

/// Routes mounted at `/tournaments`.
///
/// ```text
/// GET    /                                   -> list
/// POST   /                                   -> create
/// GET    /{id}                               -> get_by_id
/// PUT    /{id}                               -> update
/// PUT    /{id}/status                        -> update_status
///
/// GET    /{id}/entries                       -> entries::list
/// POST   /{id}/entries                       -> entries::create
/// PUT    /{id}/entries/{entry_id}/status     -> entries::update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tournaments::list).post(tournaments::create))
        .route("/{id}", get(tournaments::get_by_id).put(tournaments::update))
        .route("/{id}/status", put(tournaments::update_status))
        .route("/{id}/entries", get(entries::list).post(entries::create))
        .route(
            "/{id}/entries/{entry_id}/status",
            put(entries::update_status),
        )
}
