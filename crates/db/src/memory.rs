//! In-memory backend, used when no `DATABASE_URL` is configured and by the
//! integration test suites.

use async_trait::async_trait;
use demandas_core::model::{Demand, Project, Stage};
use tokio::sync::RwLock;

use crate::store::{Store, StoreError};

#[derive(Debug, Default)]
struct Collections {
    projects: Vec<Project>,
    demands: Vec<Demand>,
    stages: Vec<Stage>,
}

/// Volatile store holding the three entity collections behind one lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

#[async_trait]
impl Store for MemoryStore {
    async fn load_projects(&self) -> Result<Vec<Project>, StoreError> {
        Ok(self.inner.read().await.projects.clone())
    }

    async fn save_projects(&self, projects: &[Project]) -> Result<(), StoreError> {
        self.inner.write().await.projects = projects.to_vec();
        Ok(())
    }

    async fn delete_project(&self, id: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.projects.len();
        inner.projects.retain(|p| p.id != id);
        Ok(inner.projects.len() < before)
    }

    async fn load_demands(&self) -> Result<Vec<Demand>, StoreError> {
        Ok(self.inner.read().await.demands.clone())
    }

    async fn save_demands(&self, demands: &[Demand]) -> Result<(), StoreError> {
        self.inner.write().await.demands = demands.to_vec();
        Ok(())
    }

    async fn delete_demand(&self, id: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.demands.len();
        inner.demands.retain(|d| d.id != id);
        Ok(inner.demands.len() < before)
    }

    async fn load_stages(&self) -> Result<Vec<Stage>, StoreError> {
        Ok(self.inner.read().await.stages.clone())
    }

    async fn save_stages(&self, stages: &[Stage]) -> Result<(), StoreError> {
        self.inner.write().await.stages = stages.to_vec();
        Ok(())
    }

    async fn delete_stage(&self, id: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.stages.len();
        inner.stages.retain(|s| s.id != id);
        Ok(inner.stages.len() < before)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
