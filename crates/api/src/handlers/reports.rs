//! Handlers for the report endpoints: delay-risk table, dashboard metrics,
//! S-curve series, and Gantt task bars.

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use demandas_core::dates::parse_date;
use demandas_core::gantt::{demand_tasks, project_tasks, GanttTask};
use demandas_core::kanban::{dashboard_metrics, DashboardMetrics};
use demandas_core::progress::{compute_project_delay_risk, RiskRow};
use demandas_core::scurve::{scurve, SCurve};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the delay-risk report.
#[derive(Debug, Deserialize)]
pub struct RiskQuery {
    /// Reference date (`YYYY-MM-DD`); defaults to the current UTC date.
    pub today: Option<String>,
}

/// GET /api/v1/reports/delay-risk
pub async fn delay_risk(
    State(state): State<AppState>,
    Query(query): Query<RiskQuery>,
) -> AppResult<Json<DataResponse<Vec<RiskRow>>>> {
    let today = match &query.today {
        Some(raw) => parse_date(Some(raw)).ok_or_else(|| {
            AppError::BadRequest(format!("invalid `today` date: {raw}"))
        })?,
        None => Utc::now().date_naive(),
    };

    let projects = state.store.load_projects().await?;
    let demands = state.store.load_demands().await?;
    let rows = compute_project_delay_risk(&projects, &demands, today);
    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/reports/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DashboardMetrics>>> {
    let projects = state.store.load_projects().await?;
    let demands = state.store.load_demands().await?;
    Ok(Json(DataResponse {
        data: dashboard_metrics(&projects, &demands),
    }))
}

/// GET /api/v1/reports/s-curve
pub async fn s_curve(State(state): State<AppState>) -> AppResult<Json<DataResponse<SCurve>>> {
    let demands = state.store.load_demands().await?;
    Ok(Json(DataResponse {
        data: scurve(&demands),
    }))
}

/// Query parameters for the Gantt report.
#[derive(Debug, Deserialize)]
pub struct GanttQuery {
    /// `demand` (default) for one bar per demand, `project` for rollups.
    pub level: Option<String>,
}

/// GET /api/v1/reports/gantt
pub async fn gantt(
    State(state): State<AppState>,
    Query(query): Query<GanttQuery>,
) -> AppResult<Json<DataResponse<Vec<GanttTask>>>> {
    let projects = state.store.load_projects().await?;
    let demands = state.store.load_demands().await?;
    let stages = state.store.load_stages().await?;

    let tasks = match query.level.as_deref().unwrap_or("demand") {
        "demand" => demand_tasks(&demands, &projects, &stages),
        "project" => project_tasks(&demands, &projects),
        other => {
            return Err(AppError::BadRequest(format!(
                "invalid gantt level: {other} (expected `demand` or `project`)"
            )))
        }
    };
    Ok(Json(DataResponse { data: tasks }))
}
