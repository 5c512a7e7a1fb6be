// src/handlers/analytics.rs

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{AnalyticsAccess, RequireRole},
    },
    models::analytics::{
        AnalyticsQuery, AnalyticsSummary, DeadStockEntry, MonthlySalesPoint, RankedEntry,
    },
};

#[utoipa::path(
    get,
    path = "/analytics/summary",
    tag = "Analytics",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Cards do painel (vendas, lucro, faturas, estoque parado)", body = AnalyticsSummary),
        (status = 400, description = "Mês fora do formato YYYY-MM")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AnalyticsAccess>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsSummary>, ApiError> {
    let summary = app_state
        .analytics_service
        .summary(&query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/analytics/monthly-sales",
    tag = "Analytics",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Doze meses do ano (sem venda = 0)", body = Vec<MonthlySalesPoint>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_monthly_sales(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AnalyticsAccess>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<Vec<MonthlySalesPoint>>, ApiError> {
    let points = app_state
        .analytics_service
        .monthly_sales(&query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(points))
}

#[utoipa::path(
    get,
    path = "/analytics/dead-stock",
    tag = "Analytics",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Produtos com saldo e sem venda no período", body = Vec<DeadStockEntry>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_dead_stock(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AnalyticsAccess>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<Vec<DeadStockEntry>>, ApiError> {
    let entries = app_state
        .analytics_service
        .dead_stock(&query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(entries))
}

#[utoipa::path(
    get,
    path = "/analytics/top-products",
    tag = "Analytics",
    params(AnalyticsQuery),
    responses((status = 200, description = "Produtos mais vendidos", body = Vec<RankedEntry>)),
    security(("api_jwt" = []))
)]
pub async fn get_top_products(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AnalyticsAccess>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<Vec<RankedEntry>>, ApiError> {
    let ranking = app_state
        .analytics_service
        .top_products(&query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(ranking))
}

#[utoipa::path(
    get,
    path = "/analytics/top-customers",
    tag = "Analytics",
    params(AnalyticsQuery),
    responses((status = 200, description = "Clientes com maior valor comprado", body = Vec<RankedEntry>)),
    security(("api_jwt" = []))
)]
pub async fn get_top_customers(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AnalyticsAccess>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<Vec<RankedEntry>>, ApiError> {
    let ranking = app_state
        .analytics_service
        .top_customers(&query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(ranking))
}

#[utoipa::path(
    get,
    path = "/analytics/top-companies",
    tag = "Analytics",
    params(AnalyticsQuery),
    responses((status = 200, description = "Empresas (fornecedores) com mais venda", body = Vec<RankedEntry>)),
    security(("api_jwt" = []))
)]
pub async fn get_top_companies(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AnalyticsAccess>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<Vec<RankedEntry>>, ApiError> {
    let ranking = app_state
        .analytics_service
        .top_companies(&query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(ranking))
}

#[utoipa::path(
    get,
    path = "/analytics/leaderboard",
    tag = "Analytics",
    params(AnalyticsQuery),
    responses((status = 200, description = "Ranking de vendedores", body = Vec<RankedEntry>)),
    security(("api_jwt" = []))
)]
pub async fn get_leaderboard(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AnalyticsAccess>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<Vec<RankedEntry>>, ApiError> {
    let ranking = app_state
        .analytics_service
        .leaderboard(&query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(ranking))
}
