//! Repository for the `firm_modules` table (per-firm enablement state).

use firmdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::firm_module::{FirmModule, FirmModuleState};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, firm_id, module_id, is_enabled, settings, enabled_by, created_at, updated_at";

/// Provides operations on a firm's enablement state.
pub struct FirmModuleRepo;

impl FirmModuleRepo {
    /// List a firm's enablement state joined with catalogue fields,
    /// ordered by the catalogue's `sort_order`.
    ///
    /// Only modules the firm has an enablement row for are returned;
    /// catalogue entries the firm never touched are absent.
    pub async fn list_for_firm(
        pool: &PgPool,
        firm_id: DbId,
    ) -> Result<Vec<FirmModuleState>, sqlx::Error> {
        sqlx::query_as::<_, FirmModuleState>(
            "SELECT m.id AS module_id, m.slug, m.display_name, m.is_core,
                    fm.is_enabled, fm.settings, fm.updated_at
             FROM firm_modules fm
             JOIN modules m ON m.id = fm.module_id
             WHERE fm.firm_id = $1
             ORDER BY m.sort_order, m.slug",
        )
        .bind(firm_id)
        .fetch_all(pool)
        .await
    }

    /// The set of module slugs currently enabled for a firm.
    ///
    /// This is the validator's `enabled` input; recomputed from storage
    /// on every validation call.
    pub async fn enabled_slugs(pool: &PgPool, firm_id: DbId) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT m.slug
             FROM firm_modules fm
             JOIN modules m ON m.id = fm.module_id
             WHERE fm.firm_id = $1 AND fm.is_enabled = true
             ORDER BY m.sort_order, m.slug",
        )
        .bind(firm_id)
        .fetch_all(pool)
        .await
    }

    /// Find one enablement row by firm and module.
    pub async fn find(
        pool: &PgPool,
        firm_id: DbId,
        module_id: DbId,
    ) -> Result<Option<FirmModule>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM firm_modules WHERE firm_id = $1 AND module_id = $2");
        sqlx::query_as::<_, FirmModule>(&query)
            .bind(firm_id)
            .bind(module_id)
            .fetch_optional(pool)
            .await
    }

    /// Enable a module for a firm, creating the enablement row if it does
    /// not exist yet.
    ///
    /// Uses `ON CONFLICT (firm_id, module_id) DO UPDATE` so re-enabling a
    /// previously disabled module is an idempotent upsert. A `None`
    /// settings value keeps whatever settings the row already holds.
    pub async fn enable(
        pool: &PgPool,
        firm_id: DbId,
        module_id: DbId,
        settings: Option<&serde_json::Value>,
        enabled_by: Option<DbId>,
    ) -> Result<FirmModule, sqlx::Error> {
        let query = format!(
            "INSERT INTO firm_modules (firm_id, module_id, is_enabled, settings, enabled_by)
             VALUES ($1, $2, true, $3, $4)
             ON CONFLICT (firm_id, module_id) DO UPDATE SET
                 is_enabled = true,
                 settings = COALESCE(EXCLUDED.settings, firm_modules.settings),
                 enabled_by = EXCLUDED.enabled_by
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FirmModule>(&query)
            .bind(firm_id)
            .bind(module_id)
            .bind(settings)
            .bind(enabled_by)
            .fetch_one(pool)
            .await
    }

    /// Disable a module for a firm.
    ///
    /// Returns the updated row, or `None` if the firm had no enabled row
    /// for this module.
    pub async fn disable(
        pool: &PgPool,
        firm_id: DbId,
        module_id: DbId,
    ) -> Result<Option<FirmModule>, sqlx::Error> {
        let query = format!(
            "UPDATE firm_modules SET is_enabled = false
             WHERE firm_id = $1 AND module_id = $2 AND is_enabled = true
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FirmModule>(&query)
            .bind(firm_id)
            .bind(module_id)
            .fetch_optional(pool)
            .await
    }

    /// Count firms that currently have the given module enabled.
    ///
    /// Used before catalogue deletion: an in-use module must not be
    /// removed.
    pub async fn count_enabled_for_module(
        pool: &PgPool,
        module_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM firm_modules WHERE module_id = $1 AND is_enabled = true",
        )
        .bind(module_id)
        .fetch_one(pool)
        .await
    }
}
