use axum::routing::{get, put};
use axum::Router;

use crate::handlers::class_changes;
use crate::state::AppState;

/// Routes mounted at `/class-changes`.
///
/// ```text
/// GET    /                -> list
/// POST   /                -> create
/// GET    /{id}            -> get_by_id
/// PUT    /{id}/status     -> decide
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(class_changes::list).post(class_changes::create))
        .route("/{id}", get(class_changes::get_by_id))
        .route("/{id}/status", put(class_changes::decide))
}
