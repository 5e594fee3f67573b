use axum::routing::get;
use axum::Router;

use crate::handlers::players;
use crate::state::AppState;

/// Routes mounted at `/players`.
///
/// ```text
/// GET    /                      -> list
/// POST   /                      -> create
/// GET    /{id}                  -> get_by_id
/// PUT    /{id}                  -> update
/// GET    /{id}/class-changes    -> class_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(players::list).post(players::create))
        .route("/{id}", get(players::get_by_id).put(players::update))
        .route("/{id}/class-changes", get(players::class_history))
}
