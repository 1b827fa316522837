// src/main.rs

use std::sync::Arc;
use std::time::Duration;

use judge_gateway::config::{Config, StoreMode};
use judge_gateway::judge::executor::RetryPolicy;
use judge_gateway::routes;
use judge_gateway::services::{
    backend::BackendClient, catalog::StaticCatalog, local_store::SqliteStore,
    piston::PistonExecutor,
};
use judge_gateway::state::AppState;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load configuration from environment (.env included)
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "judge.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let executor = Arc::new(PistonExecutor::new(
        config.execution_service_url.clone(),
        config.execution_timeout(),
        RetryPolicy::new(
            config.execution_max_attempts,
            Duration::from_millis(config.execution_retry_backoff_ms),
        ),
    ));
    tracing::info!("Execution service: {}", config.execution_service_url);

    let state = match config.store_mode {
        StoreMode::Remote => {
            let base_url = config
                .backend_api_url
                .clone()
                .expect("BACKEND_API_URL must be set when STORE_MODE=remote");
            let backend = Arc::new(
                BackendClient::new(&base_url, config.execution_timeout())
                    .expect("Failed to build Backend API client"),
            );
            tracing::info!("Remote mode, backend at {}", base_url);
            AppState::new(
                config.clone(),
                executor,
                backend.clone(),
                backend.clone(),
                backend.clone(),
                backend,
            )
        }
        StoreMode::Local => {
            let catalog_path = config
                .catalog_path
                .clone()
                .expect("CATALOG_PATH must be set when STORE_MODE=local");
            let catalog = Arc::new(
                StaticCatalog::from_path(&catalog_path).expect("Failed to load catalog"),
            );

            // Initialize Database Pool with Retry
            let mut retry_count = 0;
            let store = loop {
                match SqliteStore::connect(&config.database_url).await {
                    Ok(store) => break Arc::new(store),
                    Err(e) => {
                        retry_count += 1;
                        if retry_count > 5 {
                            panic!("Failed to open local store after 5 retries: {}", e);
                        }
                        tracing::warn!(
                            "Local store not ready, retrying in 2s... (Attempt {})",
                            retry_count
                        );
                        tokio::time::sleep(Duration::from_secs(2)).await;
                    }
                }
            };
            tracing::info!("Local mode, catalog {} and {}", catalog_path, config.database_url);
            AppState::new(
                config.clone(),
                executor,
                catalog,
                store.clone(),
                store.clone(),
                store,
            )
        }
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listening address");
    tracing::info!("Judge gateway listening on {}", config.bind_addr);

    // Start the server
    axum::serve(listener, app).await.expect("Server error");
}
