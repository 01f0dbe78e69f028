//! Handlers for the `/firms` resource.
//!
//! Firm creation takes a batch module selection: the whole selection is
//! validated against itself (each module sees the union of the other
//! selected slugs) and rejected atomically on the first failure, so no
//! partially-configured firm is ever persisted.

use std::collections::HashSet;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use firmdesk_core::error::CoreError;
use firmdesk_core::modules::validate_selection;
use firmdesk_core::types::DbId;
use firmdesk_db::models::firm::{CreateFirm, Firm, UpdateFirm};
use firmdesk_db::models::module::Module;
use firmdesk_db::repositories::{FirmRepo, ModuleRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth, RequireManager};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /firms`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFirmRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub registration_number: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    /// Module slugs to enable at creation. Core modules are always
    /// included, whether listed or not.
    #[serde(default)]
    pub modules: Vec<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/firms
///
/// Create a firm with an initial module selection. The selection is
/// validated as a batch before anything is written; on failure the
/// request is rejected with the first failing module's message.
pub async fn create(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreateFirmRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Firm>>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let catalogue = ModuleRepo::list(&state.pool).await?;
    let selection = resolve_selection(&catalogue, &input.modules)?;

    let specs: Vec<_> = selection.iter().map(|m| m.to_spec()).collect();
    validate_selection(&specs)?;

    let enablements: Vec<_> = selection
        .iter()
        .map(|m| (m.id, m.default_settings.clone()))
        .collect();

    let create_dto = CreateFirm {
        name: input.name,
        registration_number: input.registration_number,
        contact_email: input.contact_email,
        address: input.address,
        city: input.city,
        country: input.country,
        created_by: Some(user.user_id),
    };

    let firm = FirmRepo::create_with_modules(&state.pool, &create_dto, &enablements).await?;

    tracing::info!(
        firm_id = firm.id,
        firm_name = %firm.name,
        modules = selection.len(),
        user_id = user.user_id,
        "Firm created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: firm })))
}

/// GET /api/v1/firms
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Firm>>>> {
    let firms = FirmRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: firms }))
}

/// GET /api/v1/firms/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Firm>>> {
    let firm = FirmRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Firm", id }))?;
    Ok(Json(DataResponse { data: firm }))
}

/// PUT /api/v1/firms/{id}
pub async fn update(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateFirm>,
) -> AppResult<Json<DataResponse<Firm>>> {
    let firm = FirmRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Firm", id }))?;
    Ok(Json(DataResponse { data: firm }))
}

/// DELETE /api/v1/firms/{id}
///
/// Soft-deactivate a firm. Its module state is retained for reactivation.
pub async fn deactivate(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deactivated = FirmRepo::deactivate(&state.pool, id).await?;
    if !deactivated {
        return Err(AppError::Core(CoreError::NotFound { entity: "Firm", id }));
    }

    tracing::info!(firm_id = id, user_id = admin.user_id, "Firm deactivated");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Resolve requested slugs against the catalogue and union in the core
/// modules, preserving catalogue order and dropping duplicates.
fn resolve_selection<'a>(
    catalogue: &'a [Module],
    requested: &[String],
) -> Result<Vec<&'a Module>, AppError> {
    for slug in requested {
        if !catalogue.iter().any(|m| &m.slug == slug) {
            return Err(AppError::Core(CoreError::NotFoundNamed {
                entity: "Module",
                name: slug.clone(),
            }));
        }
    }

    let wanted: HashSet<&str> = requested.iter().map(String::as_str).collect();

    Ok(catalogue
        .iter()
        .filter(|m| m.is_core || wanted.contains(m.slug.as_str()))
        .collect())
}
