//! Enablement and definition checks for the module catalogue.
//!
//! All functions here are pure: they take plain data records and an
//! enabled-slug set and never touch the database. Dependency checking is
//! single-level -- `a requires b` is checked against the enabled set
//! as-is, without resolving what `b` itself requires. Deep chains
//! surface one hop at a time.

use std::collections::HashSet;

use crate::error::CoreError;

use super::{ModuleSpec, ValidationOutcome};

/// Check whether `candidate` may be enabled for a firm whose currently
/// enabled module slugs are `enabled`.
///
/// `enabled` does not need to contain `candidate` itself. The output
/// lists preserve the declaration order of the candidate's dependency
/// lists. Deterministic and side-effect free.
pub fn validate_enablement(candidate: &ModuleSpec, enabled: &HashSet<String>) -> ValidationOutcome {
    let missing_dependencies: Vec<String> = candidate
        .requires_modules
        .iter()
        .filter(|slug| !enabled.contains(slug.as_str()))
        .cloned()
        .collect();

    let conflicting_modules: Vec<String> = candidate
        .conflicts_with
        .iter()
        .filter(|slug| enabled.contains(slug.as_str()))
        .cloned()
        .collect();

    let mut errors = Vec::new();
    if !missing_dependencies.is_empty() {
        errors.push(format!(
            "Module '{}' requires the following modules to be enabled first: {}",
            candidate.slug,
            missing_dependencies.join(", ")
        ));
    }
    if !conflicting_modules.is_empty() {
        errors.push(format!(
            "Module '{}' conflicts with the following enabled modules: {}",
            candidate.slug,
            conflicting_modules.join(", ")
        ));
    }

    ValidationOutcome {
        valid: missing_dependencies.is_empty() && conflicting_modules.is_empty(),
        missing_dependencies,
        conflicting_modules,
        errors,
    }
}

/// Find every enabled module that directly requires `candidate_slug`.
///
/// Used by the disable workflow: a module with enabled dependents cannot
/// be switched off. Returns slugs in the order of `all_modules`.
pub fn find_dependents(
    candidate_slug: &str,
    all_modules: &[ModuleSpec],
    enabled: &HashSet<String>,
) -> Vec<String> {
    all_modules
        .iter()
        .filter(|m| enabled.contains(m.slug.as_str()))
        .filter(|m| m.requires_modules.iter().any(|r| r == candidate_slug))
        .map(|m| m.slug.clone())
        .collect()
}

/// Validate a batch module selection for firm creation.
///
/// Each module is checked against the union of the *other* selected
/// slugs. The first failing module aborts the whole selection with its
/// error message so callers can reject the request atomically (no
/// partially-configured firm is ever persisted).
pub fn validate_selection(selection: &[ModuleSpec]) -> Result<(), CoreError> {
    let all_slugs: HashSet<String> = selection.iter().map(|m| m.slug.clone()).collect();

    for module in selection {
        let mut others = all_slugs.clone();
        others.remove(&module.slug);

        let outcome = validate_enablement(module, &others);
        if !outcome.valid {
            return Err(CoreError::Validation(outcome.errors.join("; ")));
        }
    }

    Ok(())
}

/// Definition-time checks applied when an administrator creates or edits
/// a catalogue entry.
///
/// Enforced here rather than at enablement time: slug shape, no
/// self-references, and no slug appearing in both `requires_modules` and
/// `conflicts_with` of the same record.
pub fn validate_definition(spec: &ModuleSpec) -> Result<(), CoreError> {
    if spec.slug.trim().is_empty() {
        return Err(CoreError::Validation(
            "Module slug must not be empty".into(),
        ));
    }

    if !spec
        .slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(CoreError::Validation(format!(
            "Module slug '{}' may only contain lowercase letters, digits, and underscores",
            spec.slug
        )));
    }

    if spec.display_name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Module display name must not be empty".into(),
        ));
    }

    if spec.requires_modules.iter().any(|r| r == &spec.slug) {
        return Err(CoreError::Validation(format!(
            "Module '{}' must not require itself",
            spec.slug
        )));
    }

    if spec.conflicts_with.iter().any(|c| c == &spec.slug) {
        return Err(CoreError::Validation(format!(
            "Module '{}' must not conflict with itself",
            spec.slug
        )));
    }

    for slug in &spec.requires_modules {
        if spec.conflicts_with.contains(slug) {
            return Err(CoreError::Validation(format!(
                "Module '{}' both requires and conflicts with '{}'",
                spec.slug, slug
            )));
        }
    }

    Ok(())
}
