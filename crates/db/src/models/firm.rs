//! Firm (tenant) entity model and DTOs.

use firmdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A firm row from the `firms` table.
///
/// A firm is an isolated customer organization; its enabled-module set
/// lives in `firm_modules`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Firm {
    pub id: DbId,
    pub name: String,
    pub registration_number: Option<String>,
    pub contact_email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub is_active: bool,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new firm.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFirm {
    pub name: String,
    pub registration_number: Option<String>,
    pub contact_email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub created_by: Option<DbId>,
}

/// DTO for partially updating a firm. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateFirm {
    pub name: Option<String>,
    pub registration_number: Option<String>,
    pub contact_email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}
