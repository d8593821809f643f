use std::net::SocketAddr;
use std::sync::Arc;

use demandas_db::{MemoryStore, PgStore, SharedStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use demandas_api::config::ServerConfig;
use demandas_api::routes::build_router;
use demandas_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "demandas_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Store ---
    let store: SharedStore = match std::env::var("DATABASE_URL") {
        Ok(database_url) => {
            let store = PgStore::connect(&database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Connected to PostgreSQL store");
            Arc::new(store)
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; using in-memory store (data is not persisted)");
            Arc::new(MemoryStore::default())
        }
    };

    store
        .health_check()
        .await
        .expect("Store health check failed");
    tracing::info!("Store health check passed");

    // --- Router ---
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
    };
    let app = build_router(state);

    // --- Serve ---
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("invalid HOST/PORT combination");
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}
