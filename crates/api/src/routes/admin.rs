//! Route definitions for admin user management.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin/users`. All require the `admin` role.
///
/// ```text
/// GET    /                       -> list_users
/// POST   /                       -> create_user
/// GET    /{id}                   -> get_user
/// PUT    /{id}                   -> update_user
/// DELETE /{id}                   -> deactivate_user
/// POST   /{id}/reset-password    -> reset_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::list_users).post(admin::create_user))
        .route(
            "/{id}",
            get(admin::get_user)
                .put(admin::update_user)
                .delete(admin::deactivate_user),
        )
        .route("/{id}/reset-password", post(admin::reset_password))
}
