use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{me, notifications};
use crate::state::AppState;

/// Routes mounted at `/me`.
///
/// ```text
/// GET    /                          -> get_me
/// POST   /                          -> sync_me
/// GET    /notifications             -> notifications::list
/// POST   /notifications/read-all    -> notifications::mark_all_read
/// POST   /notifications/{id}/read   -> notifications::mark_read
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(me::get_me).post(me::sync_me))
        .route("/notifications", get(notifications::list))
        .route("/notifications/read-all", post(notifications::mark_all_read))
        .route("/notifications/{id}/read", post(notifications::mark_read))
}
