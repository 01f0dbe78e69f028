//! Route definitions for the module catalogue.

use axum::routing::get;
use axum::Router;

use crate::handlers::module;
use crate::state::AppState;

/// Routes mounted at `/admin/modules`. All require the `admin` role.
///
/// ```text
/// GET    /        -> list_modules
/// POST   /        -> create_module
/// GET    /{id}    -> get_module
/// PUT    /{id}    -> update_module
/// DELETE /{id}    -> delete_module
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(module::list_modules).post(module::create_module))
        .route(
            "/{id}",
            get(module::get_module)
                .put(module::update_module)
                .delete(module::delete_module),
        )
}

/// Routes mounted at `/modules` for any authenticated user.
///
/// ```text
/// GET /    -> list_catalogue
/// ```
pub fn catalogue_router() -> Router<AppState> {
    Router::new().route("/", get(module::list_catalogue))
}
