//! Typed per-module settings.
//!
//! Enablement rows store a JSONB settings document per firm and module.
//! This tagged union gives each built-in module a concrete schema
//! selected by its slug, so a typo'd field or wrong type is rejected at
//! the API boundary instead of surfacing later as a missing key.
//! Admin-defined modules fall back to [`ModuleSettings::Custom`], which
//! carries the raw document.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

/// Per-module configuration, one variant per built-in module kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModuleSettings {
    Hr(HrSettings),
    Finance(FinanceSettings),
    HealthInsurance(HealthInsuranceSettings),
    Claims(ClaimsSettings),
    Crm(CrmSettings),
    /// Settings for admin-defined modules, kept as the raw document.
    Custom(Value),
}

/// Settings for the `hr` module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HrSettings {
    #[serde(default)]
    pub headcount_limit: Option<u32>,
    #[serde(default = "default_probation_days")]
    pub probation_period_days: u16,
    #[serde(default)]
    pub track_leave_balances: bool,
}

/// Settings for the `finance` module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceSettings {
    #[serde(default = "default_currency")]
    pub default_currency: String,
    /// 1-based month the fiscal year starts in.
    #[serde(default = "default_fiscal_year_start")]
    pub fiscal_year_start_month: u8,
}

/// Settings for the `health_insurance` module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthInsuranceSettings {
    #[serde(default)]
    pub default_provider: Option<String>,
    /// Claims above this amount (in minor currency units) need manual
    /// approval.
    #[serde(default = "default_approval_threshold")]
    pub claim_approval_threshold: i64,
}

/// Settings for the `claims` module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimsSettings {
    /// Claims at or below this amount (minor units) are auto-approved.
    #[serde(default)]
    pub auto_approve_below: Option<i64>,
    #[serde(default = "default_true")]
    pub require_receipt: bool,
}

/// Settings for the `crm` and `legacy_crm` modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrmSettings {
    #[serde(default = "default_lead_retention")]
    pub lead_retention_days: u32,
}

fn default_probation_days() -> u16 {
    90
}

fn default_currency() -> String {
    "EUR".to_string()
}

fn default_fiscal_year_start() -> u8 {
    1
}

fn default_approval_threshold() -> i64 {
    100_000
}

fn default_true() -> bool {
    true
}

fn default_lead_retention() -> u32 {
    365
}

impl ModuleSettings {
    /// Parse a raw settings document for the module identified by `slug`.
    ///
    /// Built-in slugs get their typed variant; unknown slugs are kept as
    /// [`ModuleSettings::Custom`] so admin-defined catalogue entries stay
    /// representable.
    pub fn parse(slug: &str, value: Value) -> Result<Self, CoreError> {
        let parsed = match slug {
            "hr" => Self::Hr(typed(slug, value)?),
            "finance" => Self::Finance(typed(slug, value)?),
            "health_insurance" => Self::HealthInsurance(typed(slug, value)?),
            "claims" => Self::Claims(typed(slug, value)?),
            "crm" | "legacy_crm" => Self::Crm(typed(slug, value)?),
            _ => Self::Custom(value),
        };
        Ok(parsed)
    }
}

fn typed<T: DeserializeOwned>(slug: &str, value: Value) -> Result<T, CoreError> {
    serde_json::from_value(value).map_err(|e| {
        CoreError::Validation(format!("Invalid settings for module '{slug}': {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_hr_settings_with_defaults() {
        let settings = ModuleSettings::parse("hr", json!({})).unwrap();
        match settings {
            ModuleSettings::Hr(hr) => {
                assert_eq!(hr.headcount_limit, None);
                assert_eq!(hr.probation_period_days, 90);
                assert!(!hr.track_leave_balances);
            }
            other => panic!("expected Hr settings, got {other:?}"),
        }
    }

    #[test]
    fn parses_finance_settings() {
        let settings = ModuleSettings::parse(
            "finance",
            json!({ "default_currency": "CHF", "fiscal_year_start_month": 4 }),
        )
        .unwrap();
        match settings {
            ModuleSettings::Finance(f) => {
                assert_eq!(f.default_currency, "CHF");
                assert_eq!(f.fiscal_year_start_month, 4);
            }
            other => panic!("expected Finance settings, got {other:?}"),
        }
    }

    #[test]
    fn rejects_wrongly_typed_field() {
        let err = ModuleSettings::parse("hr", json!({ "headcount_limit": "lots" })).unwrap_err();
        assert!(err.to_string().contains("hr"));
    }

    #[test]
    fn legacy_crm_shares_crm_schema() {
        let settings =
            ModuleSettings::parse("legacy_crm", json!({ "lead_retention_days": 30 })).unwrap();
        assert_eq!(
            settings,
            ModuleSettings::Crm(CrmSettings {
                lead_retention_days: 30
            })
        );
    }

    #[test]
    fn unknown_slug_falls_back_to_custom() {
        let doc = json!({ "anything": ["goes", 1, true] });
        let settings = ModuleSettings::parse("timesheets", doc.clone()).unwrap();
        assert_eq!(settings, ModuleSettings::Custom(doc));
    }
}
