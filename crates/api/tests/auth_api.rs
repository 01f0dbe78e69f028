//! HTTP-level integration tests for the `/auth` endpoints.
//!
//! Uses Axum's `tower::ServiceExt` to send requests directly to the
//! router. Roles are pre-seeded by migrations; users are seeded per test.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, post_auth, post_json, seed_user, TEST_PASSWORD};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_returns_token_pair(pool: PgPool) {
    seed_user(&pool, "alice", "manager").await;
    let app = build_test_app(pool);

    let response = post_json(
        &app,
        "/api/v1/auth/login",
        json!({ "username": "alice", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["access_token"].as_str().is_some());
    assert!(json["refresh_token"].as_str().is_some());
    assert_eq!(json["user"]["username"], "alice");
    assert_eq!(json["user"]["role"], "manager");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_with_wrong_password_fails(pool: PgPool) {
    seed_user(&pool, "alice", "manager").await;
    let app = build_test_app(pool);

    let response = post_json(
        &app,
        "/api/v1/auth/login",
        json!({ "username": "alice", "password": "not-the-password" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_with_unknown_user_fails(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json(
        &app,
        "/api/v1/auth/login",
        json!({ "username": "nobody", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_account_locks_after_repeated_failures(pool: PgPool) {
    seed_user(&pool, "alice", "manager").await;
    let app = build_test_app(pool);

    for _ in 0..5 {
        let response = post_json(
            &app,
            "/api/v1/auth/login",
            json!({ "username": "alice", "password": "wrong" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // Even the correct password is rejected while the account is locked.
    let response = post_json(
        &app,
        "/api/v1/auth/login",
        json!({ "username": "alice", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_refresh_rotates_the_token(pool: PgPool) {
    seed_user(&pool, "alice", "manager").await;
    let app = build_test_app(pool);

    let login = post_json(
        &app,
        "/api/v1/auth/login",
        json!({ "username": "alice", "password": TEST_PASSWORD }),
    )
    .await;
    let login_json = body_json(login).await;
    let refresh_token = login_json["refresh_token"].as_str().unwrap().to_string();

    // First refresh succeeds and returns a new pair.
    let response = post_json(
        &app,
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let refreshed = body_json(response).await;
    assert_ne!(refreshed["refresh_token"], login_json["refresh_token"]);

    // The old refresh token is revoked by rotation.
    let response = post_json(
        &app,
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_logout_revokes_refresh_tokens(pool: PgPool) {
    seed_user(&pool, "alice", "manager").await;
    let app = build_test_app(pool);

    let login = post_json(
        &app,
        "/api/v1/auth/login",
        json!({ "username": "alice", "password": TEST_PASSWORD }),
    )
    .await;
    let login_json = body_json(login).await;
    let access_token = login_json["access_token"].as_str().unwrap().to_string();
    let refresh_token = login_json["refresh_token"].as_str().unwrap().to_string();

    let response = post_auth(&app, "/api/v1/auth/logout", &access_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(
        &app,
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_logout_requires_authentication(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json(&app, "/api/v1/auth/logout", json!({})).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
