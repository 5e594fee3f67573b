//! Route definitions for `/admin`. Every handler requires an admin.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{admin, import, settings, users};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /users                     -> users::list
/// GET    /users/{id}                -> users::get_by_id
/// PUT    /users/{id}                -> users::update
/// PUT    /users/{id}/admin          -> users::set_admin
/// PUT    /users/{id}/lock           -> users::set_locked
///
/// GET    /settings                  -> settings::list
/// POST   /settings                  -> settings::create
/// GET    /settings/{key}            -> settings::get_by_key
/// PUT    /settings/{key}            -> settings::update
///
/// GET    /permission-history        -> admin::permission_history
/// GET    /dashboard/summary         -> admin::dashboard_summary
/// GET    /integrity                 -> admin::integrity_report
/// POST   /players/import            -> import::import_players
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list))
        .route("/users/{id}", get(users::get_by_id).put(users::update))
        .route("/users/{id}/admin", put(users::set_admin))
        .route("/users/{id}/lock", put(users::set_locked))
        .route("/settings", get(settings::list).post(settings::create))
        .route(
            "/settings/{key}",
            get(settings::get_by_key).put(settings::update),
        )
        .route("/permission-history", get(admin::permission_history))
        .route("/dashboard/summary", get(admin::dashboard_summary))
        .route("/integrity", get(admin::integrity_report))
        .route("/players/import", post(import::import_players))
}
