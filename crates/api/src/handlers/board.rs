//! Handler for the kanban board view.

use axum::extract::{Query, State};
use axum::Json;
use demandas_core::kanban::{board_columns, BoardColumn, BoardFilter};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/board
///
/// One column per status in workflow order, after applying the optional
/// `project_id`, `stage_id`, and `responsible` filters.
pub async fn board(
    State(state): State<AppState>,
    Query(filter): Query<BoardFilter>,
) -> AppResult<Json<DataResponse<Vec<BoardColumn>>>> {
    let demands = state.store.load_demands().await?;
    let columns = board_columns(&demands, &filter);
    Ok(Json(DataResponse { data: columns }))
}
