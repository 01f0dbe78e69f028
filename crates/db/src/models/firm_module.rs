//! Firm-module enablement model and DTOs.

use firmdesk_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `firm_modules` table: one firm's enablement state for
/// one catalogue entry.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FirmModule {
    pub id: DbId,
    pub firm_id: DbId,
    pub module_id: DbId,
    pub is_enabled: bool,
    /// Per-firm settings override; `None` means the module's defaults apply.
    pub settings: Option<serde_json::Value>,
    pub enabled_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Enablement state joined with catalogue fields, as returned to clients
/// listing a firm's modules.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FirmModuleState {
    pub module_id: DbId,
    pub slug: String,
    pub display_name: String,
    pub is_core: bool,
    pub is_enabled: bool,
    pub settings: Option<serde_json::Value>,
    pub updated_at: Timestamp,
}
