//! Repository for the `modules` table (the catalogue).

use firmdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::module::{CreateModule, Module, UpdateModule};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, slug, display_name, description, is_core, requires_modules, \
                        conflicts_with, default_settings, sort_order, created_at, updated_at";

/// Provides CRUD operations for the module catalogue.
pub struct ModuleRepo;

impl ModuleRepo {
    /// Insert a new catalogue entry, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateModule) -> Result<Module, sqlx::Error> {
        let query = format!(
            "INSERT INTO modules
                 (slug, display_name, description, is_core, requires_modules,
                  conflicts_with, default_settings, sort_order)
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Module>(&query)
            .bind(&input.slug)
            .bind(&input.display_name)
            .bind(&input.description)
            .bind(input.is_core)
            .bind(&input.requires_modules)
            .bind(&input.conflicts_with)
            .bind(&input.default_settings)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    /// Find a catalogue entry by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Module>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM modules WHERE id = $1");
        sqlx::query_as::<_, Module>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a catalogue entry by its slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Module>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM modules WHERE slug = $1");
        sqlx::query_as::<_, Module>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List the full catalogue ordered by `sort_order`, then slug.
    pub async fn list(pool: &PgPool) -> Result<Vec<Module>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM modules ORDER BY sort_order, slug");
        sqlx::query_as::<_, Module>(&query).fetch_all(pool).await
    }

    /// List only core modules (mandatory for every firm).
    pub async fn list_core(pool: &PgPool) -> Result<Vec<Module>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM modules WHERE is_core = true ORDER BY sort_order, slug");
        sqlx::query_as::<_, Module>(&query).fetch_all(pool).await
    }

    /// Partially update a catalogue entry. The slug is immutable.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateModule,
    ) -> Result<Option<Module>, sqlx::Error> {
        let query = format!(
            "UPDATE modules SET
                display_name = COALESCE($2, display_name),
                description = COALESCE($3, description),
                is_core = COALESCE($4, is_core),
                requires_modules = COALESCE($5, requires_modules),
                conflicts_with = COALESCE($6, conflicts_with),
                default_settings = COALESCE($7, default_settings),
                sort_order = COALESCE($8, sort_order)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Module>(&query)
            .bind(id)
            .bind(&input.display_name)
            .bind(&input.description)
            .bind(input.is_core)
            .bind(&input.requires_modules)
            .bind(&input.conflicts_with)
            .bind(&input.default_settings)
            .bind(input.sort_order)
            .fetch_optional(pool)
            .await
    }

    /// Delete a catalogue entry by ID. Returns `true` if a row was deleted.
    ///
    /// Callers must ensure no firm still has the module enabled; the
    /// `firm_modules` foreign key is `ON DELETE RESTRICT`.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM modules WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
