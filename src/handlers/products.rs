// src/handlers/products.rs

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
    models::product::{
        AdjustStockPayload, AdjustmentResult, BulkCostPayload, CreateProductPayload, Product,
        ProductQuery, UpdateCostPayload, UpdateProductPayload,
    },
};

#[utoipa::path(
    get,
    path = "/warehouse/products",
    tag = "Warehouse",
    params(ProductQuery),
    responses(
        (status = 200, description = "Catálogo com saldo", body = Vec<Product>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<WarehouseAccess>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = app_state
        .product_service
        .list(&query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(products))
}

#[utoipa::path(
    get,
    path = "/warehouse/products/{id}",
    tag = "Warehouse",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto", body = Product),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<WarehouseAccess>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, ApiError> {
    let product = app_state
        .product_service
        .get(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(product))
}

#[utoipa::path(
    post,
    path = "/warehouse/products",
    tag = "Warehouse",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Produto criado", body = Product)
    ),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<WarehouseAccess>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state
        .product_service
        .create(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    put,
    path = "/warehouse/products/{id}",
    tag = "Warehouse",
    request_body = UpdateProductPayload,
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto atualizado", body = Product)
    ),
    security(("api_jwt" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<WarehouseAccess>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<Json<Product>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state
        .product_service
        .update(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/warehouse/products/{id}",
    tag = "Warehouse",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 204, description = "Produto removido"),
        (status = 409, description = "Produto já aparece em faturas ou recebimentos")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<WarehouseAccess>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .product_service
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/warehouse/products/{id}/cost",
    tag = "Warehouse",
    request_body = UpdateCostPayload,
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Custo atualizado", body = Product)
    ),
    security(("api_jwt" = []))
)]
pub async fn update_product_cost(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<WarehouseAccess>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCostPayload>,
) -> Result<Json<Product>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state
        .product_service
        .update_cost(id, payload.cost)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(product))
}

#[utoipa::path(
    put,
    path = "/warehouse/products/cost",
    tag = "Warehouse",
    request_body = BulkCostPayload,
    responses(
        (status = 200, description = "Custos atualizados (tudo ou nada)", body = Vec<Product>),
        (status = 404, description = "Algum produto não existe; nada foi alterado")
    ),
    security(("api_jwt" = []))
)]
pub async fn bulk_update_cost(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<WarehouseAccess>,
    Json(payload): Json<BulkCostPayload>,
) -> Result<Json<Vec<Product>>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let products = app_state
        .product_service
        .bulk_update_cost(&payload.items)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(products))
}

#[utoipa::path(
    post,
    path = "/warehouse/products/{id}/adjust",
    tag = "Warehouse",
    request_body = AdjustStockPayload,
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Ajuste registrado", body = AdjustmentResult),
        (status = 409, description = "O saldo ficaria negativo")
    ),
    security(("api_jwt" = []))
)]
pub async fn adjust_stock(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<WarehouseAccess>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdjustStockPayload>,
) -> Result<Json<AdjustmentResult>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let result = app_state
        .product_service
        .adjust_stock(id, &payload, user.account_id())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(result))
}
