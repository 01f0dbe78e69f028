//! Route definitions for firms and their module enablement state.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{firm, firm_module};
use crate::state::AppState;

/// Routes mounted at `/firms`.
///
/// ```text
/// GET    /                                 -> list
/// POST   /                                 -> create (manager)
/// GET    /{id}                             -> get_by_id
/// PUT    /{id}                             -> update (manager)
/// DELETE /{id}                             -> deactivate (admin)
/// GET    /{id}/modules                     -> firm_module::list
/// POST   /{id}/modules/{slug}/enable       -> firm_module::enable (manager)
/// POST   /{id}/modules/{slug}/disable      -> firm_module::disable (manager)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(firm::list).post(firm::create))
        .route(
            "/{id}",
            get(firm::get_by_id)
                .put(firm::update)
                .delete(firm::deactivate),
        )
        .route("/{id}/modules", get(firm_module::list))
        .route("/{id}/modules/{slug}/enable", post(firm_module::enable))
        .route("/{id}/modules/{slug}/disable", post(firm_module::disable))
}
