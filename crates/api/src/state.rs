use std::sync::Arc;

use demandas_db::SharedStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`. Cheaply cloneable (everything is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// The entity repository (in-memory or PostgreSQL).
    pub store: SharedStore,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
