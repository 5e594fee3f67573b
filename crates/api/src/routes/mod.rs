pub mod admin;
pub mod class_changes;
pub mod health;
pub mod me;
pub mod players;
pub mod teams;
pub mod tournaments;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree. Every route requires a Bearer credential.
///
/// Route hierarchy:
///
/// ```text
/// /me                                              get, register/sync
///
/// /teams                                           list, create
/// /teams/{id}                                      get, update
/// /teams/{id}/permissions                          list, add
/// /teams/{id}/permissions/{user_id}                update role, remove
/// /teams/{id}/permission-history                   history
///
/// /players                                         list, create
/// /players/{id}                                    get, update
/// /players/{id}/class-changes                      class history
///
/// /class-changes                                   list, request
/// /class-changes/{id}                              get
/// /class-changes/{id}/status                       decide (admin)
///
/// /tournaments                                     list, create (admin)
/// /tournaments/{id}                                get, update (admin)
/// /tournaments/{id}/status                         transition (admin)
/// /tournaments/{id}/entries                        list, enter
/// /tournaments/{id}/entries/{entry_id}/status      entry transition
///
/// /admin/users                                     list (admin only)
/// /admin/users/{id}                                get, update
/// /admin/users/{id}/admin                          set admin flag
/// /admin/users/{id}/lock                           set locked flag
/// /admin/settings                                  list, create
/// /admin/settings/{key}                            get, update
/// /admin/permission-history                        history across teams
/// /admin/dashboard/summary                         entity counts
/// /admin/integrity                                 integrity report
/// /admin/players/import                            master-data import
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/me", me::router())
        .nest("/teams", teams::router())
        .nest("/players", players::router())
        .nest("/class-changes", class_changes::router())
        .nest("/tournaments", tournaments::router())
        .nest("/admin", admin::router())
}
