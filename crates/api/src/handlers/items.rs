//! Handlers for the `/items` resource.
//!
//! Mutating handlers run one lifecycle command and answer with the item as
//! it stands after the commit.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tmc_core::types::DbId;
use tmc_core::write_off::WriteOffInput;
use tmc_db::models::item::{CreateItem, Item, ItemListQuery};
use tmc_lifecycle::commands::{self, ConfirmAction, ItemUpdate};
use tmc_lifecycle::queries;

use crate::error::AppResult;
use crate::middleware::actor::CurrentActor;
use crate::query::{LocationParams, PaginationParams};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub location: String,
    pub responsible: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IssueRequest {
    pub brigade_id: DbId,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub action: ConfirmAction,
}

#[derive(Debug, Deserialize)]
pub struct SendToServiceRequest {
    pub reason: String,
}

/// Write-off details. Omitted dates default to today, cost to zero.
#[derive(Debug, Deserialize)]
pub struct WriteOffRequest {
    pub invoice_number: String,
    pub repair_cost: Option<Decimal>,
    pub description: Option<String>,
    pub date_to_service: Option<NaiveDate>,
    pub date_written_off: Option<NaiveDate>,
}

impl From<WriteOffRequest> for WriteOffInput {
    fn from(req: WriteOffRequest) -> Self {
        WriteOffInput {
            invoice_number: req.invoice_number,
            repair_cost: req.repair_cost,
            description: req.description,
            date_to_service: req.date_to_service,
            date_written_off: req.date_written_off,
        }
    }
}

// ---------------------------------------------------------------------------
// Read model
// ---------------------------------------------------------------------------

/// GET /api/v1/items
///
/// `?search=` matches a name substring or an exact status tag.
pub async fn list_items(
    State(state): State<AppState>,
    Query(params): Query<ItemListQuery>,
) -> AppResult<impl IntoResponse> {
    let page = queries::list_items(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/items/{id}
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let item = queries::get_item(&state.pool, id).await?;
    Ok(Json(DataResponse { data: item }))
}

/// GET /api/v1/items/{id}/history
pub async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let page = queries::get_history(&state.pool, id, params.limit, params.offset).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/items/confirm-queue
pub async fn confirm_queue(
    State(state): State<AppState>,
    Query(params): Query<LocationParams>,
) -> AppResult<impl IntoResponse> {
    let items = queries::list_items_for_confirm(&state.pool, params.location.as_deref()).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/items/counters
pub async fn status_counters(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let counters = queries::status_counters(&state.pool).await?;
    Ok(Json(DataResponse { data: counters }))
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// POST /api/v1/items
pub async fn create_item(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Json(input): Json<CreateItem>,
) -> AppResult<impl IntoResponse> {
    let id = commands::create_item(&state.pool, &input, &actor).await?;
    let item = queries::get_item(&state.pool, id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// PATCH /api/v1/items/{id}
pub async fn update_item(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(update): Json<ItemUpdate>,
) -> AppResult<impl IntoResponse> {
    commands::update_item(&state.pool, id, &update, &actor).await?;
    respond_with_item(&state, id).await
}

/// POST /api/v1/items/{id}/assign
pub async fn assign_item(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(req): Json<AssignRequest>,
) -> AppResult<impl IntoResponse> {
    commands::assign_item(
        &state.pool,
        id,
        &req.location,
        req.responsible.as_deref(),
        &actor,
    )
    .await?;
    respond_with_item(&state, id).await
}

/// POST /api/v1/items/{id}/issue
pub async fn issue_to_brigade(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(req): Json<IssueRequest>,
) -> AppResult<impl IntoResponse> {
    commands::issue_to_brigade(&state.pool, id, req.brigade_id, &actor).await?;
    respond_with_item(&state, id).await
}

/// POST /api/v1/items/{id}/confirm
///
/// Body: `{ "action": "accept" | "reject" }`.
pub async fn confirm(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(req): Json<ConfirmRequest>,
) -> AppResult<impl IntoResponse> {
    commands::confirm(&state.pool, id, req.action, &actor).await?;
    respond_with_item(&state, id).await
}

/// POST /api/v1/items/{id}/send-to-service
pub async fn send_to_service(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(req): Json<SendToServiceRequest>,
) -> AppResult<impl IntoResponse> {
    commands::send_to_service(&state.pool, id, &req.reason, &actor).await?;
    respond_with_item(&state, id).await
}

/// POST /api/v1/items/{id}/confirm-repair
pub async fn confirm_repair(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    commands::confirm_repair(&state.pool, id, &actor).await?;
    respond_with_item(&state, id).await
}

/// POST /api/v1/items/{id}/return-from-service
pub async fn return_from_service(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    commands::return_from_service(&state.pool, id, &actor).await?;
    respond_with_item(&state, id).await
}

/// POST /api/v1/items/{id}/write-off
///
/// Returns the item and write-off record ids.
pub async fn write_off(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(req): Json<WriteOffRequest>,
) -> AppResult<impl IntoResponse> {
    let outcome = commands::write_off(&state.pool, id, &req.into(), &actor).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: outcome })))
}

/// DELETE /api/v1/items/{id}/write-off
pub async fn cancel_write_off(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    commands::cancel_write_off(&state.pool, id, &actor).await?;
    respond_with_item(&state, id).await
}

/// POST /api/v1/items/{id}/lock
pub async fn lock(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    commands::lock(&state.pool, id, &actor).await?;
    respond_with_item(&state, id).await
}

/// DELETE /api/v1/items/{id}/lock
pub async fn unlock(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    commands::unlock(&state.pool, id, &actor).await?;
    respond_with_item(&state, id).await
}

async fn respond_with_item(state: &AppState, id: DbId) -> AppResult<Json<DataResponse<Item>>> {
    let item = queries::get_item(&state.pool, id).await?;
    Ok(Json(DataResponse { data: item }))
}
