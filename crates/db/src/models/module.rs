//! Module catalogue entity model and DTOs.
//!
//! `requires_modules` and `conflicts_with` are Postgres `TEXT[]` columns
//! holding slugs of other catalogue entries.

use firmdesk_core::modules::ModuleSpec;
use firmdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A module row from the `modules` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Module {
    pub id: DbId,
    pub slug: String,
    pub display_name: String,
    pub description: Option<String>,
    pub is_core: bool,
    pub requires_modules: Vec<String>,
    pub conflicts_with: Vec<String>,
    /// Initial settings document copied onto new enablements.
    pub default_settings: Option<serde_json::Value>,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Module {
    /// Bridge into the validator's plain data record.
    pub fn to_spec(&self) -> ModuleSpec {
        ModuleSpec {
            slug: self.slug.clone(),
            display_name: self.display_name.clone(),
            is_core: self.is_core,
            requires_modules: self.requires_modules.clone(),
            conflicts_with: self.conflicts_with.clone(),
        }
    }
}

/// DTO for creating a new catalogue entry.
#[derive(Debug, Deserialize)]
pub struct CreateModule {
    pub slug: String,
    pub display_name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_core: bool,
    #[serde(default)]
    pub requires_modules: Vec<String>,
    #[serde(default)]
    pub conflicts_with: Vec<String>,
    pub default_settings: Option<serde_json::Value>,
    pub sort_order: Option<i32>,
}

/// DTO for partially updating a catalogue entry. All fields are optional;
/// the slug itself is immutable once created (enablement rows and other
/// modules' dependency lists reference it by value).
#[derive(Debug, Deserialize)]
pub struct UpdateModule {
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub is_core: Option<bool>,
    pub requires_modules: Option<Vec<String>>,
    pub conflicts_with: Option<Vec<String>>,
    pub default_settings: Option<serde_json::Value>,
    pub sort_order: Option<i32>,
}
