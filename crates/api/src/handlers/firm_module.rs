//! Handlers for a firm's module enablement state.
//!
//! The enable workflow runs the core enablement validator against the
//! firm's currently persisted module set; the disable workflow runs the
//! reverse-dependency scan. Both reject with the validator's messages
//! and never leave partial state behind.

use std::collections::HashSet;

use axum::extract::{Path, State};
use axum::Json;
use firmdesk_core::error::CoreError;
use firmdesk_core::modules::{find_dependents, validate_enablement, ModuleSettings};
use firmdesk_core::types::DbId;
use firmdesk_db::models::firm_module::FirmModuleState;
use firmdesk_db::models::module::Module;
use firmdesk_db::repositories::{FirmModuleRepo, FirmRepo, ModuleRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Optional body for `POST /firms/{id}/modules/{slug}/enable`.
#[derive(Debug, Deserialize)]
pub struct EnableModuleRequest {
    /// Per-firm settings override. Absent means: keep existing settings,
    /// or fall back to the module's defaults on first enablement.
    pub settings: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/firms/{id}/modules
///
/// The firm's enablement state joined with catalogue fields.
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(firm_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<FirmModuleState>>>> {
    ensure_firm_exists(&state, firm_id).await?;

    let modules = FirmModuleRepo::list_for_firm(&state.pool, firm_id).await?;
    Ok(Json(DataResponse { data: modules }))
}

/// POST /api/v1/firms/{id}/modules/{slug}/enable
///
/// Enable a module for a firm. Rejected with 409 when dependencies are
/// missing or conflicting modules are enabled.
pub async fn enable(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path((firm_id, slug)): Path<(DbId, String)>,
    body: Option<Json<EnableModuleRequest>>,
) -> AppResult<Json<DataResponse<FirmModuleState>>> {
    ensure_firm_exists(&state, firm_id).await?;
    let module = find_module(&state, &slug).await?;

    let enabled = enabled_set(&state, firm_id).await?;

    let outcome = validate_enablement(&module.to_spec(), &enabled);
    if !outcome.valid {
        return Err(AppError::Core(CoreError::Conflict(
            outcome.errors.join("; "),
        )));
    }

    // Parse an explicit settings override against the module's typed
    // schema before persisting the raw document.
    let settings = match body.and_then(|Json(b)| b.settings) {
        Some(value) => {
            ModuleSettings::parse(&module.slug, value.clone())?;
            Some(value)
        }
        None => module.default_settings.clone(),
    };

    FirmModuleRepo::enable(
        &state.pool,
        firm_id,
        module.id,
        settings.as_ref(),
        Some(user.user_id),
    )
    .await?;

    tracing::info!(
        firm_id,
        module = %module.slug,
        user_id = user.user_id,
        "Module enabled",
    );

    state_for(&state, firm_id, module.id).await
}

/// POST /api/v1/firms/{id}/modules/{slug}/disable
///
/// Disable a module for a firm. Core modules refuse with 400; modules
/// that other enabled modules depend on refuse with 409.
pub async fn disable(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path((firm_id, slug)): Path<(DbId, String)>,
) -> AppResult<Json<DataResponse<FirmModuleState>>> {
    ensure_firm_exists(&state, firm_id).await?;
    let module = find_module(&state, &slug).await?;

    if module.is_core {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Core module '{}' cannot be disabled",
            module.slug
        ))));
    }

    let enabled = enabled_set(&state, firm_id).await?;
    if !enabled.contains(module.slug.as_str()) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Module '{}' is not enabled for this firm",
            module.slug
        ))));
    }

    let catalogue = ModuleRepo::list(&state.pool).await?;
    let specs: Vec<_> = catalogue.iter().map(|m| m.to_spec()).collect();

    let dependents = find_dependents(&module.slug, &specs, &enabled);
    if !dependents.is_empty() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Cannot disable module '{}': still required by {}",
            module.slug,
            dependents.join(", ")
        ))));
    }

    FirmModuleRepo::disable(&state.pool, firm_id, module.id).await?;

    tracing::info!(
        firm_id,
        module = %module.slug,
        user_id = user.user_id,
        "Module disabled",
    );

    state_for(&state, firm_id, module.id).await
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

async fn ensure_firm_exists(state: &AppState, firm_id: DbId) -> AppResult<()> {
    FirmRepo::find_by_id(&state.pool, firm_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Firm",
            id: firm_id,
        }))?;
    Ok(())
}

async fn find_module(state: &AppState, slug: &str) -> AppResult<Module> {
    ModuleRepo::find_by_slug(&state.pool, slug)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundNamed {
                entity: "Module",
                name: slug.to_string(),
            })
        })
}

/// The firm's currently enabled slugs as the validator's input set.
async fn enabled_set(state: &AppState, firm_id: DbId) -> AppResult<HashSet<String>> {
    let slugs = FirmModuleRepo::enabled_slugs(&state.pool, firm_id).await?;
    Ok(slugs.into_iter().collect())
}

/// Fetch the joined enablement state row for one module after a toggle.
async fn state_for(
    state: &AppState,
    firm_id: DbId,
    module_id: DbId,
) -> AppResult<Json<DataResponse<FirmModuleState>>> {
    let row = FirmModuleRepo::list_for_firm(&state.pool, firm_id)
        .await?
        .into_iter()
        .find(|s| s.module_id == module_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "FirmModule",
            id: module_id,
        }))?;
    Ok(Json(DataResponse { data: row }))
}
