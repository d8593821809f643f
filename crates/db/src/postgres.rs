//! PostgreSQL backend.
//!
//! Keeps the legacy table and column layout (`projetos`, `demandas`,
//! `etapas`, Portuguese column names) so existing data sets remain
//! readable. Dates are stored as strings, `tags`/`comentarios` as JSONB.
//! The schema is bootstrapped with idempotent DDL on connect.

use async_trait::async_trait;
use demandas_core::model::{clamp_percent, Demand, Priority, Project, Stage, Status};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use crate::store::{Store, StoreError};

const MAX_CONNECTIONS: u32 = 5;

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS projetos (
    id VARCHAR(64) PRIMARY KEY,
    nome VARCHAR(255) NOT NULL,
    descricao TEXT,
    status VARCHAR(50),
    responsavel VARCHAR(255),
    data_criacao VARCHAR(64),
    data_conclusao VARCHAR(64)
);
CREATE TABLE IF NOT EXISTS demandas (
    id VARCHAR(64) PRIMARY KEY,
    titulo VARCHAR(255) NOT NULL,
    descricao TEXT,
    projeto_id VARCHAR(64),
    status VARCHAR(50),
    prioridade VARCHAR(50),
    responsavel VARCHAR(255),
    etapa_id VARCHAR(64),
    data_inicio_plano VARCHAR(64),
    data_inicio_real VARCHAR(64),
    data_vencimento_plano VARCHAR(64),
    data_vencimento_real VARCHAR(64),
    data_vencimento VARCHAR(64),
    data_criacao VARCHAR(64),
    data_conclusao VARCHAR(64),
    percentual_completo INTEGER,
    tags JSONB,
    comentarios JSONB
);
CREATE TABLE IF NOT EXISTS etapas (
    id VARCHAR(64) PRIMARY KEY,
    nome VARCHAR(255) NOT NULL,
    descricao TEXT,
    ordem INTEGER,
    data_criacao VARCHAR(64)
);";

/// Store backed by a PostgreSQL connection pool.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect and bootstrap the schema.
    pub async fn connect(database_url: &str) -> Result<PgStore, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(database_url)
            .await?;
        let store = PgStore { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Wrap an existing pool (used by tests that manage their own pool).
    pub async fn from_pool(pool: PgPool) -> Result<PgStore, StoreError> {
        let store = PgStore { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        for statement in SCHEMA.split(';') {
            let statement = statement.trim();
            if !statement.is_empty() {
                sqlx::query(statement).execute(&self.pool).await?;
            }
        }
        tracing::debug!("schema bootstrap complete");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------
// Column names stay in Portuguese (legacy schema); the entity model uses
// English field names, so rows are mapped explicitly.

#[derive(FromRow)]
struct ProjectRow {
    id: String,
    nome: String,
    descricao: Option<String>,
    status: Option<String>,
    responsavel: Option<String>,
    data_criacao: Option<String>,
    data_conclusao: Option<String>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Project {
        Project {
            id: row.id,
            name: row.nome,
            description: row.descricao.unwrap_or_default(),
            status: row
                .status
                .as_deref()
                .and_then(Status::from_label)
                .unwrap_or_default(),
            responsible: row.responsavel,
            created_at: row.data_criacao.unwrap_or_default(),
            due_date: row.data_conclusao,
        }
    }
}

#[derive(FromRow)]
struct DemandRow {
    id: String,
    titulo: String,
    descricao: Option<String>,
    projeto_id: Option<String>,
    status: Option<String>,
    prioridade: Option<String>,
    responsavel: Option<String>,
    etapa_id: Option<String>,
    data_inicio_plano: Option<String>,
    data_inicio_real: Option<String>,
    data_vencimento_plano: Option<String>,
    data_vencimento_real: Option<String>,
    data_vencimento: Option<String>,
    data_criacao: Option<String>,
    data_conclusao: Option<String>,
    percentual_completo: Option<i32>,
    tags: Option<serde_json::Value>,
    comentarios: Option<serde_json::Value>,
}

fn string_list(value: Option<serde_json::Value>) -> Vec<String> {
    value
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}

impl From<DemandRow> for Demand {
    fn from(row: DemandRow) -> Demand {
        Demand {
            id: row.id,
            title: row.titulo,
            description: row.descricao.unwrap_or_default(),
            project_id: row.projeto_id.unwrap_or_default(),
            stage_id: row.etapa_id,
            status: row
                .status
                .as_deref()
                .and_then(Status::from_label)
                .unwrap_or_default(),
            priority: row
                .prioridade
                .as_deref()
                .and_then(Priority::from_label)
                .unwrap_or_default(),
            responsible: row.responsavel,
            planned_start: row.data_inicio_plano,
            actual_start: row.data_inicio_real,
            planned_due: row.data_vencimento_plano,
            actual_due: row.data_vencimento_real,
            due_date: row.data_vencimento,
            created_at: row.data_criacao.unwrap_or_default(),
            completed_at: row.data_conclusao,
            percent_complete: clamp_percent(row.percentual_completo.unwrap_or(0)),
            tags: string_list(row.tags),
            comments: string_list(row.comentarios),
        }
    }
}

#[derive(FromRow)]
struct StageRow {
    id: String,
    nome: String,
    descricao: Option<String>,
    ordem: Option<i32>,
    data_criacao: Option<String>,
}

impl From<StageRow> for Stage {
    fn from(row: StageRow) -> Stage {
        Stage {
            id: row.id,
            name: row.nome,
            description: row.descricao.unwrap_or_default(),
            order: row.ordem.unwrap_or(0),
            created_at: row.data_criacao.unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Replace-save helpers
// ---------------------------------------------------------------------------

async fn insert_project(
    tx: &mut Transaction<'_, Postgres>,
    project: &Project,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO projetos \
         (id, nome, descricao, status, responsavel, data_criacao, data_conclusao) \
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(&project.id)
    .bind(&project.name)
    .bind(&project.description)
    .bind(project.status.label())
    .bind(&project.responsible)
    .bind(&project.created_at)
    .bind(&project.due_date)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn insert_demand(
    tx: &mut Transaction<'_, Postgres>,
    demand: &Demand,
) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO demandas \
         (id, titulo, descricao, projeto_id, status, prioridade, responsavel, etapa_id, \
          data_inicio_plano, data_inicio_real, data_vencimento_plano, data_vencimento_real, \
          data_vencimento, data_criacao, data_conclusao, percentual_completo, tags, comentarios) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)",
    )
    .bind(&demand.id)
    .bind(&demand.title)
    .bind(&demand.description)
    .bind(&demand.project_id)
    .bind(demand.status.label())
    .bind(demand.priority.label())
    .bind(&demand.responsible)
    .bind(&demand.stage_id)
    .bind(&demand.planned_start)
    .bind(&demand.actual_start)
    .bind(&demand.planned_due)
    .bind(&demand.actual_due)
    .bind(&demand.due_date)
    .bind(&demand.created_at)
    .bind(&demand.completed_at)
    .bind(demand.percent_complete)
    .bind(serde_json::to_value(&demand.tags)?)
    .bind(serde_json::to_value(&demand.comments)?)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn insert_stage(
    tx: &mut Transaction<'_, Postgres>,
    stage: &Stage,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO etapas (id, nome, descricao, ordem, data_criacao) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(&stage.id)
    .bind(&stage.name)
    .bind(&stage.description)
    .bind(stage.order)
    .bind(&stage.created_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Store impl
// ---------------------------------------------------------------------------

#[async_trait]
impl Store for PgStore {
    async fn load_projects(&self) -> Result<Vec<Project>, StoreError> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            "SELECT id, nome, descricao, status, responsavel, data_criacao, data_conclusao \
             FROM projetos",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn save_projects(&self, projects: &[Project]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM projetos").execute(&mut *tx).await?;
        for project in projects {
            insert_project(&mut tx, project).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn delete_project(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM projetos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn load_demands(&self) -> Result<Vec<Demand>, StoreError> {
        let rows = sqlx::query_as::<_, DemandRow>(
            "SELECT id, titulo, descricao, projeto_id, status, prioridade, responsavel, \
                    etapa_id, data_inicio_plano, data_inicio_real, data_vencimento_plano, \
                    data_vencimento_real, data_vencimento, data_criacao, data_conclusao, \
                    percentual_completo, tags, comentarios \
             FROM demandas",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Demand::from).collect())
    }

    async fn save_demands(&self, demands: &[Demand]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM demandas").execute(&mut *tx).await?;
        for demand in demands {
            insert_demand(&mut tx, demand).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn delete_demand(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM demandas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn load_stages(&self) -> Result<Vec<Stage>, StoreError> {
        let rows = sqlx::query_as::<_, StageRow>(
            "SELECT id, nome, descricao, ordem, data_criacao FROM etapas",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Stage::from).collect())
    }

    async fn save_stages(&self, stages: &[Stage]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM etapas").execute(&mut *tx).await?;
        for stage in stages {
            insert_stage(&mut tx, stage).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn delete_stage(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM etapas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
