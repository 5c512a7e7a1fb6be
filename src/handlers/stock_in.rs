// src/handlers/stock_in.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{RequireRole, WarehouseAccess},
    },
    models::stock_in::{CreateStockInPayload, StockInBatch, StockInDetail, StockInQuery},
};

#[utoipa::path(
    get,
    path = "/warehouse/stock-in",
    tag = "Stock In",
    params(StockInQuery),
    responses(
        (status = 200, description = "Lotes de recebimento (status=pending: pendentes)", body = Vec<StockInBatch>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_batches(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<WarehouseAccess>,
    Query(query): Query<StockInQuery>,
) -> Result<Json<Vec<StockInBatch>>, ApiError> {
    let batches = app_state
        .stock_in_service
        .list_batches(&query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(batches))
}

#[utoipa::path(
    post,
    path = "/warehouse/stock-in",
    tag = "Stock In",
    request_body = CreateStockInPayload,
    responses(
        (status = 201, description = "Lote pendente criado", body = StockInDetail),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_batch(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<WarehouseAccess>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateStockInPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let detail = app_state
        .stock_in_service
        .create_batch(&payload, user.account_id())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(detail)))
}

#[utoipa::path(
    get,
    path = "/warehouse/stock-in/{id}",
    tag = "Stock In",
    params(("id" = Uuid, Path, description = "ID do lote")),
    responses(
        (status = 200, description = "Lote com itens", body = StockInDetail)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_batch(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<WarehouseAccess>,
    Path(id): Path<Uuid>,
) -> Result<Json<StockInDetail>, ApiError> {
    let detail = app_state
        .stock_in_service
        .get_batch(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(detail))
}

#[utoipa::path(
    post,
    path = "/warehouse/stock-in/{id}/receive",
    tag = "Stock In",
    params(("id" = Uuid, Path, description = "ID do lote")),
    responses(
        (status = 200, description = "Lote recebido; estoque somado", body = StockInDetail),
        (status = 409, description = "Lote não está pendente")
    ),
    security(("api_jwt" = []))
)]
pub async fn receive_batch(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<WarehouseAccess>,
    Path(id): Path<Uuid>,
) -> Result<Json<StockInDetail>, ApiError> {
    let detail = app_state
        .stock_in_service
        .receive_batch(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(detail))
}

#[utoipa::path(
    post,
    path = "/warehouse/stock-in/{id}/cancel",
    tag = "Stock In",
    params(("id" = Uuid, Path, description = "ID do lote")),
    responses(
        (status = 200, description = "Lote cancelado", body = StockInDetail),
        (status = 409, description = "Lote não está pendente")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancel_batch(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<WarehouseAccess>,
    Path(id): Path<Uuid>,
) -> Result<Json<StockInDetail>, ApiError> {
    let detail = app_state
        .stock_in_service
        .cancel_batch(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(detail))
}
