//! HTTP-level integration tests for the `/firms` endpoints, focused on
//! batch module selection at firm creation.
//!
//! The module catalogue is pre-seeded by migrations, so the dependency
//! and conflict scenarios run against realistic data.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, delete_auth, get_auth, post_json_auth, put_json_auth, seed_user,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_firm_with_valid_selection(pool: PgPool) {
    let (_, manager) = seed_user(&pool, "mona", "manager").await;
    let app = build_test_app(pool);

    let response = post_json_auth(
        &app,
        "/api/v1/firms",
        json!({ "name": "Acme GmbH", "modules": ["hr"] }),
        &manager,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let firm_id = json["data"]["id"].as_i64().expect("firm id");
    assert_eq!(json["data"]["name"], "Acme GmbH");

    // Core modules are enabled implicitly alongside the selection.
    let response = get_auth(&app, &format!("/api/v1/firms/{firm_id}/modules"), &manager).await;
    assert_eq!(response.status(), StatusCode::OK);

    let state = body_json(response).await;
    let slugs: Vec<&str> = state["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["slug"].as_str().unwrap())
        .collect();
    assert!(slugs.contains(&"dashboard"));
    assert!(slugs.contains(&"hr"));
    assert!(state["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|m| m["is_enabled"] == true));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_firm_with_missing_dependency_is_rejected_atomically(pool: PgPool) {
    let (_, manager) = seed_user(&pool, "mona", "manager").await;
    let app = build_test_app(pool);

    // claims requires health_insurance, which is not selected.
    let response = post_json_auth(
        &app,
        "/api/v1/firms",
        json!({ "name": "Acme GmbH", "modules": ["claims"] }),
        &manager,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("health_insurance"));

    // No partial firm may survive the rejection.
    let response = get_auth(&app, "/api/v1/firms", &manager).await;
    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_firm_with_conflicting_selection_is_rejected(pool: PgPool) {
    let (_, manager) = seed_user(&pool, "mona", "manager").await;
    let app = build_test_app(pool);

    let response = post_json_auth(
        &app,
        "/api/v1/firms",
        json!({ "name": "Acme GmbH", "modules": ["crm", "legacy_crm"] }),
        &manager,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("conflicts"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_firm_with_full_dependency_chain(pool: PgPool) {
    let (_, manager) = seed_user(&pool, "mona", "manager").await;
    let app = build_test_app(pool);

    let response = post_json_auth(
        &app,
        "/api/v1/firms",
        json!({ "name": "Acme GmbH", "modules": ["hr", "health_insurance", "claims"] }),
        &manager,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_firm_with_unknown_module_slug(pool: PgPool) {
    let (_, manager) = seed_user(&pool, "mona", "manager").await;
    let app = build_test_app(pool);

    let response = post_json_auth(
        &app,
        "/api/v1/firms",
        json!({ "name": "Acme GmbH", "modules": ["spacetravel"] }),
        &manager,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_viewer_cannot_create_firm(pool: PgPool) {
    let (_, viewer) = seed_user(&pool, "vera", "viewer").await;
    let app = build_test_app(pool);

    let response = post_json_auth(
        &app,
        "/api/v1/firms",
        json!({ "name": "Acme GmbH" }),
        &viewer,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_firm_name_conflicts(pool: PgPool) {
    let (_, manager) = seed_user(&pool, "mona", "manager").await;
    let app = build_test_app(pool);

    let response =
        post_json_auth(&app, "/api/v1/firms", json!({ "name": "Acme GmbH" }), &manager).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response =
        post_json_auth(&app, "/api/v1/firms", json!({ "name": "Acme GmbH" }), &manager).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_and_deactivate_firm(pool: PgPool) {
    let (_, manager) = seed_user(&pool, "mona", "manager").await;
    let (_, admin) = seed_user(&pool, "ada", "admin").await;
    let app = build_test_app(pool);

    let response =
        post_json_auth(&app, "/api/v1/firms", json!({ "name": "Acme GmbH" }), &manager).await;
    let firm_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = put_json_auth(
        &app,
        &format!("/api/v1/firms/{firm_id}"),
        json!({ "city": "Zurich" }),
        &manager,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["city"], "Zurich");
    assert_eq!(json["data"]["name"], "Acme GmbH");

    // Deactivation is admin-only.
    let response = delete_auth(&app, &format!("/api/v1/firms/{firm_id}"), &manager).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(&app, &format!("/api/v1/firms/{firm_id}"), &admin).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(&app, &format!("/api/v1/firms/{firm_id}"), &manager).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["is_active"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_firm_routes_require_authentication(pool: PgPool) {
    let app = build_test_app(pool);

    let response = common::get(&app, "/api/v1/firms").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
