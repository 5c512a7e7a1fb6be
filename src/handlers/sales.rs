// src/handlers/sales.rs

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
        rbac::{RequireRole, SaleAccess},
    },
    models::{
        invoice::{CheckoutPayload, Invoice, InvoiceDetail, InvoiceQuery, QuotePayload},
        product::{Product, ProductQuery},
    },
    services::cart::CartQuote,
};

// O terminal de vendas só lê o catálogo
#[utoipa::path(
    get,
    path = "/sale/products",
    tag = "Sales",
    params(ProductQuery),
    responses(
        (status = 200, description = "Catálogo para o terminal de vendas", body = Vec<Product>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_sale_products(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<SaleAccess>,
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
    post,
    path = "/sale/cart/quote",
    tag = "Sales",
    request_body = QuotePayload,
    responses(
        (status = 200, description = "Linhas com preço atual, subtotal, IVA e total", body = CartQuote),
        (status = 409, description = "Estoque insuficiente")
    ),
    security(("api_jwt" = []))
)]
pub async fn quote_cart(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<SaleAccess>,
    Json(payload): Json<QuotePayload>,
) -> Result<Json<CartQuote>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let quote = app_state
        .sales_service
        .quote(&payload.items)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(quote))
}

#[utoipa::path(
    post,
    path = "/sale/checkout",
    tag = "Sales",
    request_body = CheckoutPayload,
    responses(
        (status = 201, description = "Venda concluída; fatura gerada", body = InvoiceDetail),
        (status = 409, description = "Estoque insuficiente")
    ),
    security(("api_jwt" = []))
)]
pub async fn checkout(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<SaleAccess>,
    user: AuthenticatedUser,
    Json(payload): Json<CheckoutPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let invoice = app_state
        .sales_service
        .checkout(payload.customer_id, user.account_id(), &payload.items)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(invoice)))
}

#[utoipa::path(
    get,
    path = "/sale/invoices",
    tag = "Sales",
    params(InvoiceQuery),
    responses(
        (status = 200, description = "Faturas (mais recentes primeiro)", body = Vec<Invoice>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_invoices(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<SaleAccess>,
    Query(query): Query<InvoiceQuery>,
) -> Result<Json<Vec<Invoice>>, ApiError> {
    let invoices = app_state
        .sales_service
        .list_invoices(&query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(invoices))
}

#[utoipa::path(
    get,
    path = "/sale/invoices/{id}",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    responses(
        (status = 200, description = "Fatura com itens", body = InvoiceDetail),
        (status = 404, description = "Fatura não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_invoice(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<SaleAccess>,
    Path(id): Path<Uuid>,
) -> Result<Json<InvoiceDetail>, ApiError> {
    let invoice = app_state
        .sales_service
        .get_invoice(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(invoice))
}

#[utoipa::path(
    post,
    path = "/sale/invoices/{id}/cancel",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    responses(
        (status = 200, description = "Fatura cancelada; estoque devolvido", body = InvoiceDetail),
        (status = 409, description = "Fatura já cancelada")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancel_invoice(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<SaleAccess>,
    Path(id): Path<Uuid>,
) -> Result<Json<InvoiceDetail>, ApiError> {
    let invoice = app_state
        .sales_service
        .cancel_invoice(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(invoice))
}
