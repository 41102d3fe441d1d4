//! Handlers for the `/write-offs` resource (read-only; records are created
//! and cancelled through the item endpoints).

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use tmc_core::types::DbId;
use tmc_db::models::write_off::WriteOffQuery;
use tmc_lifecycle::queries;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/write-offs
///
/// Filters: `?is_cancelled=`, `?location=` (substring), `?date_written_off=YYYY-MM-DD`.
pub async fn list_write_offs(
    State(state): State<AppState>,
    Query(params): Query<WriteOffQuery>,
) -> AppResult<impl IntoResponse> {
    let records = queries::list_write_offs(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: records }))
}

/// GET /api/v1/write-offs/{id}
pub async fn get_write_off(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let record = queries::get_write_off(&state.pool, id).await?;
    Ok(Json(DataResponse { data: record }))
}
