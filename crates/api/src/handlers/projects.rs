//! Handlers for the `/projects` resource.
//!
//! Every mutation follows the repository's whole-collection contract:
//! load, modify in memory, save back.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use demandas_core::error::CoreError;
use demandas_core::model::{CreateProject, Project, UpdateProject};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: String) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Project",
        id,
    })
}

/// GET /api/v1/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = state.store.load_projects().await?;
    Ok(Json(DataResponse { data: projects }))
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    let project = Project::new(input)?;
    let mut projects = state.store.load_projects().await?;
    projects.push(project.clone());
    state.store.save_projects(&projects).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Project>>> {
    let projects = state.store.load_projects().await?;
    let project = projects
        .into_iter()
        .find(|p| p.id == id)
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    let mut projects = state.store.load_projects().await?;
    let project = projects
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| not_found(id))?;
    project.apply(input);
    let updated = project.clone();
    state.store.save_projects(&projects).await?;
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/projects/{id}
///
/// Deleting a project cascades deletion of its demands.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if !state.store.delete_project(&id).await? {
        return Err(not_found(id));
    }

    let mut demands = state.store.load_demands().await?;
    let before = demands.len();
    demands.retain(|d| d.project_id != id);
    if demands.len() < before {
        state.store.save_demands(&demands).await?;
    }

    Ok(StatusCode::NO_CONTENT)
}
