//! Integration tests for the module catalogue repository.
//!
//! Exercises the repository layer against a real database:
//! - Seeded catalogue contents
//! - Create / update / delete round trips
//! - Unique slug constraint violations

use assert_matches::assert_matches;
use firmdesk_db::models::module::{CreateModule, UpdateModule};
use firmdesk_db::repositories::ModuleRepo;
use sqlx::PgPool;

fn new_module(slug: &str) -> CreateModule {
    CreateModule {
        slug: slug.to_string(),
        display_name: slug.to_string(),
        description: None,
        is_core: false,
        requires_modules: vec![],
        conflicts_with: vec![],
        default_settings: None,
        sort_order: None,
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn seeded_catalogue_is_present(pool: PgPool) {
    let modules = ModuleRepo::list(&pool).await.unwrap();
    assert!(modules.len() >= 8, "expected seeded catalogue, got {}", modules.len());

    let dashboard = modules.iter().find(|m| m.slug == "dashboard").unwrap();
    assert!(dashboard.is_core);

    let claims = modules.iter().find(|m| m.slug == "claims").unwrap();
    assert_eq!(claims.requires_modules, vec!["health_insurance"]);

    let legacy_crm = modules.iter().find(|m| m.slug == "legacy_crm").unwrap();
    assert_eq!(legacy_crm.conflicts_with, vec!["crm"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn list_core_returns_only_core_modules(pool: PgPool) {
    let core = ModuleRepo::list_core(&pool).await.unwrap();
    assert!(!core.is_empty());
    assert!(core.iter().all(|m| m.is_core));
}

#[sqlx::test(migrations = "./migrations")]
async fn create_and_find_by_slug(pool: PgPool) {
    let mut input = new_module("timesheets");
    input.requires_modules = vec!["hr".to_string()];

    let created = ModuleRepo::create(&pool, &input).await.unwrap();
    assert_eq!(created.slug, "timesheets");
    assert_eq!(created.requires_modules, vec!["hr"]);
    assert_eq!(created.sort_order, 0);

    let found = ModuleRepo::find_by_slug(&pool, "timesheets")
        .await
        .unwrap()
        .expect("created module should be findable by slug");
    assert_eq!(found.id, created.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_slug_violates_unique_constraint(pool: PgPool) {
    let input = new_module("hr");
    let err = ModuleRepo::create(&pool, &input).await.unwrap_err();

    assert_matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505")
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn update_changes_only_provided_fields(pool: PgPool) {
    let created = ModuleRepo::create(&pool, &new_module("timesheets"))
        .await
        .unwrap();

    let update = UpdateModule {
        display_name: Some("Timesheets".to_string()),
        description: None,
        is_core: None,
        requires_modules: Some(vec!["hr".to_string()]),
        conflicts_with: None,
        default_settings: None,
        sort_order: None,
    };
    let updated = ModuleRepo::update(&pool, created.id, &update)
        .await
        .unwrap()
        .expect("module should exist");

    assert_eq!(updated.display_name, "Timesheets");
    assert_eq!(updated.requires_modules, vec!["hr"]);
    // Untouched fields keep their values.
    assert_eq!(updated.slug, "timesheets");
    assert!(!updated.is_core);
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_removes_unused_module(pool: PgPool) {
    let created = ModuleRepo::create(&pool, &new_module("timesheets"))
        .await
        .unwrap();

    assert!(ModuleRepo::delete(&pool, created.id).await.unwrap());
    assert!(ModuleRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .is_none());

    // Deleting again reports no row.
    assert!(!ModuleRepo::delete(&pool, created.id).await.unwrap());
}
