// src/models/analytics.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::{IntoParams, ToSchema};

// 1. Cards do topo do painel do dono
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    #[schema(example = "2026-10")]
    pub month: String,
    pub sales_total: Decimal,
    pub profit: Decimal,
    pub invoice_count: i64,
    pub dead_stock_count: i64,
}

// 2. Gráfico mensal (vendas x lucro)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySalesPoint {
    #[schema(example = "2026-01")]
    pub month: String,
    pub sales: Decimal,
    pub profit: Decimal,
}

// 3. Estoque parado
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeadStockEntry {
    pub product_id: Uuid,
    pub name: String,
    pub company: String,
    pub stock_quantity: i32,
    pub stock_value: Decimal,
    pub last_sold_at: Option<DateTime<Utc>>,
}

// 4. Rankings (produtos, clientes, empresas, vendedores)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    pub rank: u32,
    pub id: Option<Uuid>,
    #[schema(example = "Cola 325ml")]
    pub name: String,
    /// Número de faturas
    pub orders: i64,
    /// Unidades vendidas
    pub quantity: i64,
    pub total: Decimal,
}

// --- Linhas cruas dos agregados SQL (SUM/COUNT podem voltar NULL) ---

#[derive(Debug, Clone, FromRow)]
pub struct MonthlyRow {
    pub month: Option<String>,
    pub sales: Option<Decimal>,
    pub profit: Option<Decimal>,
}

#[derive(Debug, Clone, FromRow)]
pub struct RankingRow {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub orders: Option<i64>,
    pub quantity: Option<i64>,
    pub total: Option<Decimal>,
}

#[derive(Debug, Clone, FromRow)]
pub struct SummaryRow {
    pub sales_total: Option<Decimal>,
    pub profit: Option<Decimal>,
    pub invoice_count: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AnalyticsQuery {
    /// Mês no formato `YYYY-MM` (padrão: mês atual nos resumos, todos os meses nos rankings)
    pub month: Option<String>,
    /// Ano do gráfico mensal (padrão: ano atual)
    pub year: Option<i32>,
    /// Quantidade de itens do ranking (1..=50, padrão 5)
    pub limit: Option<u32>,
    /// Dias sem venda para considerar estoque parado (padrão 90)
    pub days: Option<u32>,
}
