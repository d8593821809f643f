//! Handlers for the `/demands` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use demandas_core::error::CoreError;
use demandas_core::kanban::BoardFilter;
use demandas_core::model::{CreateDemand, Demand, Status, UpdateDemand};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: String) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Demand",
        id,
    })
}

/// GET /api/v1/demands
///
/// Supports the same optional filters as the kanban board:
/// `project_id`, `stage_id`, `responsible`.
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<BoardFilter>,
) -> AppResult<Json<DataResponse<Vec<Demand>>>> {
    let demands = state.store.load_demands().await?;
    let demands: Vec<Demand> = demands
        .into_iter()
        .filter(|d| filter.matches(d))
        .collect();
    Ok(Json(DataResponse { data: demands }))
}

/// POST /api/v1/demands
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateDemand>,
) -> AppResult<(StatusCode, Json<DataResponse<Demand>>)> {
    let demand = Demand::new(input)?;
    let mut demands = state.store.load_demands().await?;
    demands.push(demand.clone());
    state.store.save_demands(&demands).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: demand })))
}

/// GET /api/v1/demands/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Demand>>> {
    let demands = state.store.load_demands().await?;
    let demand = demands
        .into_iter()
        .find(|d| d.id == id)
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: demand }))
}

/// PUT /api/v1/demands/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateDemand>,
) -> AppResult<Json<DataResponse<Demand>>> {
    let mut demands = state.store.load_demands().await?;
    let demand = demands
        .iter_mut()
        .find(|d| d.id == id)
        .ok_or_else(|| not_found(id))?;
    demand.apply(input);
    let updated = demand.clone();
    state.store.save_demands(&demands).await?;
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/demands/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if state.store.delete_demand(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// Body for the status-change endpoint.
#[derive(Debug, Deserialize)]
pub struct StatusChange {
    pub status: Status,
}

/// PATCH /api/v1/demands/{id}/status
///
/// Moving a demand to Done sets its percentage to 100 and stamps the
/// completion date.
pub async fn change_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<StatusChange>,
) -> AppResult<Json<DataResponse<Demand>>> {
    let mut demands = state.store.load_demands().await?;
    let demand = demands
        .iter_mut()
        .find(|d| d.id == id)
        .ok_or_else(|| not_found(id))?;
    demand.set_status(input.status);
    let updated = demand.clone();
    state.store.save_demands(&demands).await?;
    Ok(Json(DataResponse { data: updated }))
}
