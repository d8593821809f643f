//! Handlers for the `/stages` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use demandas_core::error::CoreError;
use demandas_core::model::{CreateStage, Stage, UpdateStage};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: String) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Stage",
        id,
    })
}

/// GET /api/v1/stages
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Stage>>>> {
    let mut stages = state.store.load_stages().await?;
    stages.sort_by_key(|s| s.order);
    Ok(Json(DataResponse { data: stages }))
}

/// POST /api/v1/stages
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateStage>,
) -> AppResult<(StatusCode, Json<DataResponse<Stage>>)> {
    let stage = Stage::new(input)?;
    let mut stages = state.store.load_stages().await?;
    stages.push(stage.clone());
    state.store.save_stages(&stages).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: stage })))
}

/// GET /api/v1/stages/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Stage>>> {
    let stages = state.store.load_stages().await?;
    let stage = stages
        .into_iter()
        .find(|s| s.id == id)
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: stage }))
}

/// PUT /api/v1/stages/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateStage>,
) -> AppResult<Json<DataResponse<Stage>>> {
    let mut stages = state.store.load_stages().await?;
    let stage = stages
        .iter_mut()
        .find(|s| s.id == id)
        .ok_or_else(|| not_found(id))?;
    stage.apply(input);
    let updated = stage.clone();
    state.store.save_stages(&stages).await?;
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/stages/{id}
///
/// Deleting a stage detaches (nulls) `stage_id` on referencing demands
/// rather than cascading.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if !state.store.delete_stage(&id).await? {
        return Err(not_found(id));
    }

    let mut demands = state.store.load_demands().await?;
    let mut detached = false;
    for demand in demands.iter_mut() {
        if demand.stage_id.as_deref() == Some(id.as_str()) {
            demand.stage_id = None;
            detached = true;
        }
    }
    if detached {
        state.store.save_demands(&demands).await?;
    }

    Ok(StatusCode::NO_CONTENT)
}
