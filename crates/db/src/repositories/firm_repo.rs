//! Repository for the `firms` table.

use firmdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::firm::{CreateFirm, Firm, UpdateFirm};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, registration_number, contact_email, address, city, country, \
                        is_active, created_by, created_at, updated_at";

/// Initial enablement for one module at firm creation:
/// `(module_id, settings)`.
pub type ModuleEnablement = (DbId, Option<serde_json::Value>);

/// Provides CRUD operations for firms.
pub struct FirmRepo;

impl FirmRepo {
    /// Create a firm together with its initial module enablements in a
    /// single transaction.
    ///
    /// Either the firm row and every `firm_modules` row commit together,
    /// or nothing is persisted. Callers validate the module selection
    /// before calling this.
    pub async fn create_with_modules(
        pool: &PgPool,
        input: &CreateFirm,
        enablements: &[ModuleEnablement],
    ) -> Result<Firm, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO firms
                 (name, registration_number, contact_email, address, city, country, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let firm = sqlx::query_as::<_, Firm>(&query)
            .bind(&input.name)
            .bind(&input.registration_number)
            .bind(&input.contact_email)
            .bind(&input.address)
            .bind(&input.city)
            .bind(&input.country)
            .bind(input.created_by)
            .fetch_one(&mut *tx)
            .await?;

        for (module_id, settings) in enablements {
            sqlx::query(
                "INSERT INTO firm_modules (firm_id, module_id, is_enabled, settings, enabled_by)
                 VALUES ($1, $2, true, $3, $4)",
            )
            .bind(firm.id)
            .bind(module_id)
            .bind(settings)
            .bind(input.created_by)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(firm)
    }

    /// Find a firm by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Firm>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM firms WHERE id = $1");
        sqlx::query_as::<_, Firm>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all firms ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Firm>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM firms ORDER BY name");
        sqlx::query_as::<_, Firm>(&query).fetch_all(pool).await
    }

    /// Partially update a firm. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateFirm,
    ) -> Result<Option<Firm>, sqlx::Error> {
        let query = format!(
            "UPDATE firms SET
                name = COALESCE($2, name),
                registration_number = COALESCE($3, registration_number),
                contact_email = COALESCE($4, contact_email),
                address = COALESCE($5, address),
                city = COALESCE($6, city),
                country = COALESCE($7, country)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Firm>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.registration_number)
            .bind(&input.contact_email)
            .bind(&input.address)
            .bind(&input.city)
            .bind(&input.country)
            .fetch_optional(pool)
            .await
    }

    /// Soft-deactivate a firm by setting `is_active = false`.
    ///
    /// Returns `true` if the row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE firms SET is_active = false WHERE id = $1 AND is_active = true")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
