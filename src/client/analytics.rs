// src/client/analytics.rs

//! Fetchers dos painéis do dono. Toda resposta passa pelo `common::sanitize`:
//! número inválido vira 0 e payload que não é lista vira lista vazia.

use serde_json::Value;

use crate::{
    client::{panel::Panel, ApiClient, ClientResult},
    common::sanitize::{field, list_or_empty, number_or_none, number_or_zero, text_or_empty},
};

#[derive(Debug, Clone, PartialEq)]
pub struct SalesPoint {
    pub month: String,
    pub sales: f64,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryCards {
    pub month: String,
    pub sales_total: f64,
    pub profit: f64,
    pub invoice_count: f64,
    pub dead_stock_count: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeadStockRow {
    pub name: String,
    pub company: String,
    pub stock_quantity: f64,
    pub stock_value: f64,
    pub last_sold_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankingRow {
    pub rank: f64,
    pub name: String,
    pub orders: f64,
    pub quantity: f64,
    pub total: f64,
}

pub mod paths {
    pub fn summary(month: Option<&str>) -> String {
        with_month("/analytics/summary", month)
    }

    pub fn monthly_sales(year: Option<i32>) -> String {
        match year {
            Some(year) => format!("/analytics/monthly-sales?year={year}"),
            None => "/analytics/monthly-sales".into(),
        }
    }

    pub fn dead_stock(days: Option<u32>) -> String {
        match days {
            Some(days) => format!("/analytics/dead-stock?days={days}"),
            None => "/analytics/dead-stock".into(),
        }
    }

    /// `kind`: `top-products`, `top-customers`, `top-companies` ou `leaderboard`.
    pub fn ranking(kind: &str, month: Option<&str>, limit: Option<u32>) -> String {
        let mut path = with_month(&format!("/analytics/{kind}"), month);
        if let Some(limit) = limit {
            path.push(if path.contains('?') { '&' } else { '?' });
            path.push_str(&format!("limit={limit}"));
        }
        path
    }

    fn with_month(base: &str, month: Option<&str>) -> String {
        match month {
            Some(month) => format!("{base}?month={month}"),
            None => base.to_string(),
        }
    }
}

// --- Sanitizadores ---

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}

pub fn sanitize_monthly(json: Value) -> Option<Vec<SalesPoint>> {
    non_empty(
        list_or_empty(json)
            .iter()
            .map(|row| SalesPoint {
                month: text_or_empty(field(row, "month")),
                sales: number_or_zero(field(row, "sales")),
                profit: number_or_zero(field(row, "profit")),
            })
            .collect(),
    )
}

/// Objeto esperado; qualquer outra coisa não tem o que mostrar.
pub fn sanitize_summary(json: Value) -> Option<SummaryCards> {
    if !json.is_object() {
        return None;
    }
    Some(SummaryCards {
        month: text_or_empty(field(&json, "month")),
        sales_total: number_or_zero(field(&json, "salesTotal")),
        profit: number_or_zero(field(&json, "profit")),
        invoice_count: number_or_zero(field(&json, "invoiceCount")),
        dead_stock_count: number_or_zero(field(&json, "deadStockCount")),
    })
}

pub fn sanitize_dead_stock(json: Value) -> Option<Vec<DeadStockRow>> {
    non_empty(
        list_or_empty(json)
            .iter()
            .map(|row| DeadStockRow {
                name: text_or_empty(field(row, "name")),
                company: text_or_empty(field(row, "company")),
                stock_quantity: number_or_zero(field(row, "stockQuantity")),
                stock_value: number_or_zero(field(row, "stockValue")),
                last_sold_at: Some(text_or_empty(field(row, "lastSoldAt"))).filter(|s| !s.is_empty()),
            })
            .collect(),
    )
}

pub fn sanitize_ranking(json: Value) -> Option<Vec<RankingRow>> {
    non_empty(
        list_or_empty(json)
            .iter()
            .enumerate()
            .map(|(i, row)| RankingRow {
                // Sem posição válida, vale a ordem recebida
                rank: number_or_none(field(row, "rank")).unwrap_or((i + 1) as f64),
                name: text_or_empty(field(row, "name")),
                orders: number_or_zero(field(row, "orders")),
                quantity: number_or_zero(field(row, "quantity")),
                total: number_or_zero(field(row, "total")),
            })
            .collect(),
    )
}

// --- Fetch direto ---

pub async fn fetch_monthly_sales(client: &ApiClient, year: Option<i32>) -> ClientResult<Vec<SalesPoint>> {
    let json = client.get_value(&paths::monthly_sales(year)).await?;
    Ok(sanitize_monthly(json).unwrap_or_default())
}

pub async fn fetch_summary(client: &ApiClient, month: Option<&str>) -> ClientResult<Option<SummaryCards>> {
    let json = client.get_value(&paths::summary(month)).await?;
    Ok(sanitize_summary(json))
}

pub async fn fetch_dead_stock(client: &ApiClient, days: Option<u32>) -> ClientResult<Vec<DeadStockRow>> {
    let json = client.get_value(&paths::dead_stock(days)).await?;
    Ok(sanitize_dead_stock(json).unwrap_or_default())
}

pub async fn fetch_ranking(
    client: &ApiClient,
    kind: &str,
    month: Option<&str>,
    limit: Option<u32>,
) -> ClientResult<Vec<RankingRow>> {
    let json = client.get_value(&paths::ranking(kind, month, limit)).await?;
    Ok(sanitize_ranking(json).unwrap_or_default())
}

// --- Painéis ---

pub fn monthly_sales_panel(client: &ApiClient, year: Option<i32>) -> Panel<Vec<SalesPoint>> {
    let mut panel = Panel::new();
    panel.load(client, &paths::monthly_sales(year), sanitize_monthly);
    panel
}

pub fn summary_panel(client: &ApiClient, month: Option<&str>) -> Panel<SummaryCards> {
    let mut panel = Panel::new();
    panel.load(client, &paths::summary(month), sanitize_summary);
    panel
}

pub fn dead_stock_panel(client: &ApiClient, days: Option<u32>) -> Panel<Vec<DeadStockRow>> {
    let mut panel = Panel::new();
    panel.load(client, &paths::dead_stock(days), sanitize_dead_stock);
    panel
}

pub fn top_products_panel(client: &ApiClient, month: Option<&str>, limit: Option<u32>) -> Panel<Vec<RankingRow>> {
    ranking_panel(client, "top-products", month, limit)
}

pub fn top_customers_panel(client: &ApiClient, month: Option<&str>, limit: Option<u32>) -> Panel<Vec<RankingRow>> {
    ranking_panel(client, "top-customers", month, limit)
}

pub fn top_companies_panel(client: &ApiClient, month: Option<&str>, limit: Option<u32>) -> Panel<Vec<RankingRow>> {
    ranking_panel(client, "top-companies", month, limit)
}

pub fn leaderboard_panel(client: &ApiClient, month: Option<&str>, limit: Option<u32>) -> Panel<Vec<RankingRow>> {
    ranking_panel(client, "leaderboard", month, limit)
}

fn ranking_panel(
    client: &ApiClient,
    kind: &str,
    month: Option<&str>,
    limit: Option<u32>,
) -> Panel<Vec<RankingRow>> {
    let mut panel = Panel::new();
    panel.load(client, &paths::ranking(kind, month, limit), sanitize_ranking);
    panel
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{panel::PanelState, test_support::serve};
    use axum::{routing::get, Json, Router};
    use serde_json::json;

    #[test]
    fn monthly_points_survive_bad_numbers() {
        let points = sanitize_monthly(json!([
            { "month": "2026-01", "sales": 1200.5, "profit": "300" },
            { "month": "2026-02", "sales": "NaN", "profit": null },
            { "sales": { "nested": 1 } }
        ]))
        .unwrap();

        assert_eq!(points[0], SalesPoint { month: "2026-01".into(), sales: 1200.5, profit: 300.0 });
        assert_eq!(points[1].sales, 0.0);
        assert_eq!(points[1].profit, 0.0);
        assert_eq!(points[2].month, "");
        assert!(points.iter().all(|p| p.sales.is_finite() && p.profit.is_finite()));
    }

    #[test]
    fn lists_that_are_not_lists_are_empty() {
        assert!(sanitize_monthly(json!({ "error": "boom" })).is_none());
        assert!(sanitize_ranking(json!(null)).is_none());
        assert!(sanitize_dead_stock(json!([])).is_none());
        assert!(sanitize_summary(json!([1, 2])).is_none());
    }

    #[test]
    fn ranking_falls_back_to_position() {
        let rows = sanitize_ranking(json!([
            { "rank": 1, "name": "Cola 325ml", "orders": 3, "quantity": 12, "total": 180.0 },
            { "name": "Water", "total": "abc" }
        ]))
        .unwrap();
        assert_eq!(rows[0].rank, 1.0);
        assert_eq!(rows[1].rank, 2.0);
        assert_eq!(rows[1].total, 0.0);
        assert_eq!(rows[1].orders, 0.0);
    }

    #[test]
    fn summary_reads_camel_case_fields() {
        let cards = sanitize_summary(json!({
            "month": "2026-10",
            "salesTotal": 1605.0,
            "profit": "405.5",
            "invoiceCount": 3,
            "deadStockCount": "many"
        }))
        .unwrap();
        assert_eq!(cards.sales_total, 1605.0);
        assert_eq!(cards.profit, 405.5);
        assert_eq!(cards.invoice_count, 3.0);
        assert_eq!(cards.dead_stock_count, 0.0);
    }

    #[test]
    fn ranking_paths_carry_the_filters() {
        assert_eq!(paths::ranking("leaderboard", None, None), "/analytics/leaderboard");
        assert_eq!(
            paths::ranking("top-products", Some("2026-10"), Some(10)),
            "/analytics/top-products?month=2026-10&limit=10"
        );
        assert_eq!(paths::ranking("top-customers", None, Some(3)), "/analytics/top-customers?limit=3");
    }

    #[tokio::test]
    async fn panels_fetch_from_the_analytics_routes() {
        let router = Router::new()
            .route(
                "/analytics/monthly-sales",
                get(|| async { Json(json!([{ "month": "2026-01", "sales": 10, "profit": 4 }])) }),
            )
            .route("/analytics/top-products", get(|| async { Json(json!({ "oops": true })) }));
        let client = serve(router).await;

        let monthly = monthly_sales_panel(&client, Some(2026));
        let state = monthly.subscribe().wait_for(|s| !s.is_loading()).await.unwrap().clone();
        assert_eq!(
            state,
            PanelState::Ready(vec![SalesPoint { month: "2026-01".into(), sales: 10.0, profit: 4.0 }])
        );

        let top = top_products_panel(&client, None, None);
        let state = top.subscribe().wait_for(|s| !s.is_loading()).await.unwrap().clone();
        assert_eq!(state, PanelState::Empty);

        let rows = fetch_ranking(&client, "top-products", None, None).await.unwrap();
        assert!(rows.is_empty());
    }
}
