//! Shared helpers for HTTP-level integration tests.
//!
//! Mirrors the router construction in `main.rs` via
//! [`firmdesk_api::router::build_app_router`] so tests exercise the same
//! middleware stack (CORS, request ID, timeout, tracing, panic recovery)
//! that production uses.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use firmdesk_api::auth::jwt::{generate_access_token, JwtConfig};
use firmdesk_api::auth::password::hash_password;
use firmdesk_api::config::ServerConfig;
use firmdesk_api::router::build_app_router;
use firmdesk_api::state::AppState;
use firmdesk_core::types::DbId;
use firmdesk_db::models::user::CreateUser;
use firmdesk_db::repositories::{RoleRepo, UserRepo};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

/// Password used for all seeded test users.
pub const TEST_PASSWORD: &str = "correct-horse-battery-staple";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router with all middleware layers, using
/// the given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Seed a user with the given role and return `(user_id, access_token)`.
///
/// The password is always [`TEST_PASSWORD`].
pub async fn seed_user(pool: &PgPool, username: &str, role_name: &str) -> (DbId, String) {
    let role = RoleRepo::find_by_name(pool, role_name)
        .await
        .expect("role lookup should succeed")
        .unwrap_or_else(|| panic!("role '{role_name}' must be seeded by migrations"));

    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            full_name: None,
            password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
            role_id: role.id,
        },
    )
    .await
    .expect("user creation should succeed");

    let token = generate_access_token(user.id, role_name, &test_config().jwt)
        .expect("token generation should succeed");

    (user.id, token)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone()
        .oneshot(request)
        .await
        .expect("request should not fail at the transport level")
}

fn with_auth(builder: axum::http::request::Builder, token: Option<&str>) -> axum::http::request::Builder {
    match token {
        Some(t) => builder.header(header::AUTHORIZATION, format!("Bearer {t}")),
        None => builder,
    }
}

/// GET without authentication.
pub async fn get(app: &Router, path: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(path)
        .body(Body::empty())
        .expect("request should build");
    send(app, request).await
}

/// GET with a Bearer token.
pub async fn get_auth(app: &Router, path: &str, token: &str) -> Response<Body> {
    let request = with_auth(Request::builder().uri(path), Some(token))
        .body(Body::empty())
        .expect("request should build");
    send(app, request).await
}

/// POST a JSON body without authentication.
pub async fn post_json(app: &Router, path: &str, body: serde_json::Value) -> Response<Body> {
    post_json_inner(app, path, body, None).await
}

/// POST a JSON body with a Bearer token.
pub async fn post_json_auth(
    app: &Router,
    path: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    post_json_inner(app, path, body, Some(token)).await
}

async fn post_json_inner(
    app: &Router,
    path: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Response<Body> {
    let request = with_auth(Request::builder().method("POST").uri(path), token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build");
    send(app, request).await
}

/// POST with an empty body and a Bearer token (toggle endpoints).
pub async fn post_auth(app: &Router, path: &str, token: &str) -> Response<Body> {
    let request = with_auth(Request::builder().method("POST").uri(path), Some(token))
        .body(Body::empty())
        .expect("request should build");
    send(app, request).await
}

/// PUT a JSON body with a Bearer token.
pub async fn put_json_auth(
    app: &Router,
    path: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = with_auth(Request::builder().method("PUT").uri(path), Some(token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build");
    send(app, request).await
}

/// DELETE with a Bearer token.
pub async fn delete_auth(app: &Router, path: &str, token: &str) -> Response<Body> {
    let request = with_auth(Request::builder().method("DELETE").uri(path), Some(token))
        .body(Body::empty())
        .expect("request should build");
    send(app, request).await
}

/// Collect a response body into a JSON value.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}
