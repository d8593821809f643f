//! The repository contract shared by all backends.

use std::sync::Arc;

use async_trait::async_trait;
use demandas_core::model::{Demand, Project, Stage};

/// Persistence-layer error. Never surfaces inside the estimator; the API
/// layer maps it to an HTTP response.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Uniform load/save/delete contract per entity collection.
///
/// `save_*` has whole-collection replace semantics: records present in the
/// argument are upserted and records absent from it are removed. `delete_*`
/// removes one record by id and reports whether anything was removed.
#[async_trait]
pub trait Store: Send + Sync {
    async fn load_projects(&self) -> Result<Vec<Project>, StoreError>;
    async fn save_projects(&self, projects: &[Project]) -> Result<(), StoreError>;
    async fn delete_project(&self, id: &str) -> Result<bool, StoreError>;

    async fn load_demands(&self) -> Result<Vec<Demand>, StoreError>;
    async fn save_demands(&self, demands: &[Demand]) -> Result<(), StoreError>;
    async fn delete_demand(&self, id: &str) -> Result<bool, StoreError>;

    async fn load_stages(&self) -> Result<Vec<Stage>, StoreError>;
    async fn save_stages(&self, stages: &[Stage]) -> Result<(), StoreError>;
    async fn delete_stage(&self, id: &str) -> Result<bool, StoreError>;

    /// Probe backend reachability.
    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Shared handle passed through application state.
pub type SharedStore = Arc<dyn Store>;
