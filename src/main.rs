use attendance_portal::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    storage::{FileStorage, StorageState},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Entry point of the portal shell: configuration, logging, session storage,
/// route table, API client, then the HTTP server.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (Fail-Fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging Filter Setup
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "attendance_portal=debug,tower_http=info".into());

    // 3. Log format per environment: pretty locally, JSON in production.
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Portal starting in {:?} mode", config.env);

    // 4. Session Storage
    let storage = Arc::new(FileStorage::new(&config.storage_path)) as StorageState;
    tracing::info!(path = %config.storage_path, "session storage opened");

    // 5. Unified State Assembly
    let app_state = AppState::assemble(&config, storage)
        .expect("FATAL: Failed to build the backend HTTP client.");

    match app_state.session.reader().role() {
        Some(role) => tracing::info!(%role, "resuming cached session"),
        None => tracing::info!("no cached session"),
    }

    // 6. Router and Server Startup
    let app = create_router(app_state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .expect("FATAL: Failed to bind PORTAL_BIND_ADDR.");

    tracing::info!("Listening on {}", config.bind_addr);
    tracing::info!("Backend API at {}", config.api_url());
    tracing::info!("Swagger UI at http://{}/swagger-ui", config.bind_addr);

    axum::serve(listener, app)
        .await
        .expect("FATAL: HTTP server terminated unexpectedly.");
}
