//! Module catalogue types and enablement validation.
//!
//! A *module* is a named, independently toggleable feature unit (hr,
//! finance, claims, ...) with declared dependency and conflict
//! relationships to other modules. This module lives in `core` (zero
//! internal deps) so the validator can be used by both the API layer and
//! any future worker or CLI tooling.

mod settings;
mod validation;

pub use settings::{
    ClaimsSettings, CrmSettings, FinanceSettings, HealthInsuranceSettings, HrSettings,
    ModuleSettings,
};
pub use validation::{
    find_dependents, validate_definition, validate_enablement, validate_selection,
};

use serde::{Deserialize, Serialize};

/// A module catalogue entry as seen by the validator.
///
/// Plain data record: the db layer builds these from `modules` rows and
/// the validator itself performs no I/O. Dependency lists tolerate being
/// absent in serialized form and default to empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleSpec {
    /// Unique identifier, e.g. `"health_insurance"`.
    pub slug: String,
    pub display_name: String,
    /// Core modules are mandatory for every firm and can never be disabled.
    #[serde(default)]
    pub is_core: bool,
    /// Slugs that must already be enabled before this module can be.
    #[serde(default)]
    pub requires_modules: Vec<String>,
    /// Slugs that must NOT be enabled alongside this module.
    #[serde(default)]
    pub conflicts_with: Vec<String>,
}

/// Outcome of a single enablement check.
///
/// Created fresh per validation call and immutable afterwards. `errors`
/// carries one human-readable message per violated category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub missing_dependencies: Vec<String>,
    pub conflicting_modules: Vec<String>,
    pub errors: Vec<String>,
}
