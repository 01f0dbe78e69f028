pub mod admin;
pub mod auth;
pub mod firm;
pub mod health;
pub mod module;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                  login (public)
/// /auth/refresh                                refresh (public)
/// /auth/logout                                 logout (requires auth)
///
/// /admin/users                                 list, create (admin only)
/// /admin/users/{id}                            get, update, deactivate
/// /admin/users/{id}/reset-password             reset password
///
/// /admin/modules                               list, create (admin only)
/// /admin/modules/{id}                          get, update, delete
///
/// /modules                                     catalogue listing (auth)
///
/// /firms                                       list, create
/// /firms/{id}                                  get, update, deactivate
/// /firms/{id}/modules                          enablement state (GET)
/// /firms/{id}/modules/{slug}/enable            enable module (POST)
/// /firms/{id}/modules/{slug}/disable           disable module (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (login, refresh, logout).
        .nest("/auth", auth::router())
        // Admin routes (user management).
        .nest("/admin/users", admin::router())
        // Admin module catalogue management.
        .nest("/admin/modules", module::admin_router())
        // Read-only catalogue for authenticated clients.
        .nest("/modules", module::catalogue_router())
        // Firms and their module enablement state.
        .nest("/firms", firm::router())
}
