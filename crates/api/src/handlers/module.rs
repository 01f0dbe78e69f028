//! Handlers for the module catalogue.
//!
//! Catalogue management (`/admin/modules`) is admin-only; the read-only
//! catalogue listing (`/modules`) is available to any authenticated user.
//! Create and update run the definition-time checks from
//! `firmdesk_core::modules` before anything is persisted.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use firmdesk_core::error::CoreError;
use firmdesk_core::modules::{validate_definition, ModuleSettings, ModuleSpec};
use firmdesk_core::types::DbId;
use firmdesk_db::models::module::{CreateModule, Module, UpdateModule};
use firmdesk_db::repositories::{FirmModuleRepo, ModuleRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Catalogue listing (any authenticated user)
// ---------------------------------------------------------------------------

/// GET /api/v1/modules
///
/// The full catalogue in display order.
pub async fn list_catalogue(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Module>>>> {
    let modules = ModuleRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: modules }))
}

// ---------------------------------------------------------------------------
// Admin management
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/modules
pub async fn list_modules(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Module>>>> {
    let modules = ModuleRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: modules }))
}

/// POST /api/v1/admin/modules
///
/// Create a catalogue entry. The definition is validated (slug shape,
/// self-references, requires/conflicts overlap) and the default settings
/// document is parsed against the module's typed schema before insert.
pub async fn create_module(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateModule>,
) -> AppResult<(StatusCode, Json<DataResponse<Module>>)> {
    let spec = ModuleSpec {
        slug: input.slug.clone(),
        display_name: input.display_name.clone(),
        is_core: input.is_core,
        requires_modules: input.requires_modules.clone(),
        conflicts_with: input.conflicts_with.clone(),
    };
    validate_definition(&spec)?;
    validate_referenced_slugs(&state, &spec).await?;

    if let Some(settings) = &input.default_settings {
        ModuleSettings::parse(&input.slug, settings.clone())?;
    }

    let module = ModuleRepo::create(&state.pool, &input).await?;

    tracing::info!(
        module_id = module.id,
        slug = %module.slug,
        user_id = admin.user_id,
        "Module created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: module })))
}

/// GET /api/v1/admin/modules/{id}
pub async fn get_module(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Module>>> {
    let module = ModuleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Module",
            id,
        }))?;
    Ok(Json(DataResponse { data: module }))
}

/// PUT /api/v1/admin/modules/{id}
///
/// Partially update a catalogue entry. The merged result is re-validated
/// as a definition before anything is written.
pub async fn update_module(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateModule>,
) -> AppResult<Json<DataResponse<Module>>> {
    let existing = ModuleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Module",
            id,
        }))?;

    // Merge the patch over the stored record and validate the result.
    let merged = ModuleSpec {
        slug: existing.slug.clone(),
        display_name: input
            .display_name
            .clone()
            .unwrap_or_else(|| existing.display_name.clone()),
        is_core: input.is_core.unwrap_or(existing.is_core),
        requires_modules: input
            .requires_modules
            .clone()
            .unwrap_or_else(|| existing.requires_modules.clone()),
        conflicts_with: input
            .conflicts_with
            .clone()
            .unwrap_or_else(|| existing.conflicts_with.clone()),
    };
    validate_definition(&merged)?;
    validate_referenced_slugs(&state, &merged).await?;

    if let Some(settings) = &input.default_settings {
        ModuleSettings::parse(&existing.slug, settings.clone())?;
    }

    let module = ModuleRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Module",
            id,
        }))?;

    tracing::info!(
        module_id = id,
        slug = %module.slug,
        user_id = admin.user_id,
        "Module updated",
    );

    Ok(Json(DataResponse { data: module }))
}

/// DELETE /api/v1/admin/modules/{id}
///
/// Remove a catalogue entry. Core modules and modules still enabled for
/// any firm refuse deletion.
pub async fn delete_module(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let module = ModuleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Module",
            id,
        }))?;

    if module.is_core {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Core module '{}' cannot be deleted",
            module.slug
        ))));
    }

    let in_use = FirmModuleRepo::count_enabled_for_module(&state.pool, id).await?;
    if in_use > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Module '{}' is still enabled for {in_use} firm(s)",
            module.slug
        ))));
    }

    let deleted = ModuleRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Module",
            id,
        }));
    }

    tracing::info!(
        module_id = id,
        slug = %module.slug,
        user_id = admin.user_id,
        "Module deleted",
    );

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Ensure every slug named in the definition's dependency lists exists in
/// the catalogue (the record under validation itself excepted -- it may
/// not be persisted yet).
async fn validate_referenced_slugs(state: &AppState, spec: &ModuleSpec) -> AppResult<()> {
    let catalogue = ModuleRepo::list(&state.pool).await?;

    for slug in spec.requires_modules.iter().chain(&spec.conflicts_with) {
        let known = catalogue.iter().any(|m| &m.slug == slug);
        if !known {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Module '{}' references unknown module '{slug}'",
                spec.slug
            ))));
        }
    }

    Ok(())
}
