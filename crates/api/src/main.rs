use std::net::SocketAddr;
use std::sync::Arc;

use firmdesk_db::models::user::CreateUser;
use firmdesk_db::repositories::{RoleRepo, UserRepo};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use firmdesk_api::auth::password::hash_password;
use firmdesk_api::config::ServerConfig;
use firmdesk_api::router::build_app_router;
use firmdesk_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "firmdesk_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = firmdesk_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    firmdesk_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    firmdesk_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    bootstrap_initial_admin(&pool).await;

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Create the first admin account on an empty installation.
///
/// Reads `INITIAL_ADMIN_PASSWORD`; if unset while the users table is
/// empty, the server still starts but nobody can log in, so a warning is
/// emitted.
async fn bootstrap_initial_admin(pool: &firmdesk_db::DbPool) {
    let user_count = UserRepo::count(pool)
        .await
        .expect("Failed to count users during bootstrap");
    if user_count > 0 {
        return;
    }

    let Ok(password) = std::env::var("INITIAL_ADMIN_PASSWORD") else {
        tracing::warn!(
            "No users exist and INITIAL_ADMIN_PASSWORD is not set; nobody will be able to log in"
        );
        return;
    };

    let admin_role = RoleRepo::find_by_name(pool, firmdesk_core::roles::ROLE_ADMIN)
        .await
        .expect("Failed to look up admin role")
        .expect("admin role must be seeded by migrations");

    let password_hash = hash_password(&password).expect("Failed to hash initial admin password");

    let admin = UserRepo::create(
        pool,
        &CreateUser {
            username: "admin".to_string(),
            email: "admin@localhost".to_string(),
            full_name: None,
            password_hash,
            role_id: admin_role.id,
        },
    )
    .await
    .expect("Failed to create initial admin user");

    tracing::info!(user_id = admin.id, "Created initial admin user");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
