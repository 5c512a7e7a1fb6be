// src/db/analytics_repo.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::analytics::{DeadStockEntry, MonthlyRow, RankingRow, SummaryRow},
};

/// Intervalo `[from, to)`; `None` nos dois lados = todo o histórico.
#[derive(Debug, Clone, Copy, Default)]
pub struct Period {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

// Só faturas concluídas entram nos números. $1/$2 = período.
const COMPLETED_IN_PERIOD: &str = r#"
    i.status = 'COMPLETED'
    AND ($1::timestamptz IS NULL OR i.created_at >= $1)
    AND ($2::timestamptz IS NULL OR i.created_at < $2)
"#;

#[derive(Clone)]
pub struct AnalyticsRepository {
    pool: PgPool,
}

impl AnalyticsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn summary(&self, period: Period) -> Result<SummaryRow, AppError> {
        let row = sqlx::query_as::<_, SummaryRow>(&format!(
            r#"
            SELECT
                (SELECT SUM(i.subtotal) FROM invoices i WHERE {COMPLETED_IN_PERIOD}) AS sales_total,
                (SELECT SUM(ii.line_total - ii.unit_cost * ii.quantity)
                   FROM invoice_items ii
                   JOIN invoices i ON i.id = ii.invoice_id
                  WHERE {COMPLETED_IN_PERIOD}) AS profit,
                (SELECT COUNT(*) FROM invoices i WHERE {COMPLETED_IN_PERIOD}) AS invoice_count
            "#
        ))
        .bind(period.from)
        .bind(period.to)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    // Meses sem venda não voltam; o serviço completa com zero
    pub async fn monthly(&self, period: Period) -> Result<Vec<MonthlyRow>, AppError> {
        let rows = sqlx::query_as::<_, MonthlyRow>(&format!(
            r#"
            SELECT
                to_char(date_trunc('month', i.created_at), 'YYYY-MM') AS month,
                SUM(ii.line_total) AS sales,
                SUM(ii.line_total - ii.unit_cost * ii.quantity) AS profit
            FROM invoices i
            JOIN invoice_items ii ON ii.invoice_id = i.id
            WHERE {COMPLETED_IN_PERIOD}
            GROUP BY 1
            ORDER BY 1
            "#
        ))
        .bind(period.from)
        .bind(period.to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Produtos com saldo e sem venda concluída desde `cutoff`.
    pub async fn dead_stock(&self, cutoff: DateTime<Utc>) -> Result<Vec<DeadStockEntry>, AppError> {
        let entries = sqlx::query_as::<_, DeadStockEntry>(
            r#"
            SELECT
                p.id AS product_id,
                p.name,
                p.company,
                p.stock_quantity,
                p.cost * p.stock_quantity AS stock_value,
                last_sale.last_sold_at
            FROM products p
            LEFT JOIN LATERAL (
                SELECT MAX(i.created_at) AS last_sold_at
                FROM invoice_items ii
                JOIN invoices i ON i.id = ii.invoice_id
                WHERE ii.product_id = p.id AND i.status = 'COMPLETED'
            ) last_sale ON TRUE
            WHERE p.stock_quantity > 0
              AND (last_sale.last_sold_at IS NULL OR last_sale.last_sold_at < $1)
            ORDER BY stock_value DESC, p.name
            "#,
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    pub async fn top_products(&self, period: Period, limit: i64) -> Result<Vec<RankingRow>, AppError> {
        self.ranking(
            &format!(
                r#"
                SELECT
                    ii.product_id AS id,
                    ii.product_name AS name,
                    COUNT(DISTINCT i.id) AS orders,
                    SUM(ii.quantity)::bigint AS quantity,
                    SUM(ii.line_total) AS total
                FROM invoice_items ii
                JOIN invoices i ON i.id = ii.invoice_id
                WHERE {COMPLETED_IN_PERIOD}
                GROUP BY ii.product_id, ii.product_name
                ORDER BY total DESC, quantity DESC
                LIMIT $3
                "#
            ),
            period,
            limit,
        )
        .await
    }

    pub async fn top_customers(&self, period: Period, limit: i64) -> Result<Vec<RankingRow>, AppError> {
        self.ranking(
            &format!(
                r#"
                SELECT
                    c.id AS id,
                    c.name AS name,
                    COUNT(i.id) AS orders,
                    COALESCE(SUM(q.quantity), 0)::bigint AS quantity,
                    SUM(i.subtotal) AS total
                FROM invoices i
                JOIN customers c ON c.id = i.customer_id
                {ITEM_QUANTITY_JOIN}
                WHERE {COMPLETED_IN_PERIOD}
                GROUP BY c.id, c.name
                ORDER BY total DESC, orders DESC
                LIMIT $3
                "#
            ),
            period,
            limit,
        )
        .await
    }

    pub async fn top_companies(&self, period: Period, limit: i64) -> Result<Vec<RankingRow>, AppError> {
        self.ranking(
            &format!(
                r#"
                SELECT
                    NULL::uuid AS id,
                    c.company AS name,
                    COUNT(i.id) AS orders,
                    COALESCE(SUM(q.quantity), 0)::bigint AS quantity,
                    SUM(i.subtotal) AS total
                FROM invoices i
                JOIN customers c ON c.id = i.customer_id
                {ITEM_QUANTITY_JOIN}
                WHERE {COMPLETED_IN_PERIOD}
                  AND NULLIF(trim(c.company), '') IS NOT NULL
                GROUP BY c.company
                ORDER BY total DESC, orders DESC
                LIMIT $3
                "#
            ),
            period,
            limit,
        )
        .await
    }

    /// Ranking de vendedores (quem fechou a venda no terminal).
    pub async fn leaderboard(&self, period: Period, limit: i64) -> Result<Vec<RankingRow>, AppError> {
        self.ranking(
            &format!(
                r#"
                SELECT
                    a.id AS id,
                    a.name AS name,
                    COUNT(i.id) AS orders,
                    COALESCE(SUM(q.quantity), 0)::bigint AS quantity,
                    SUM(i.subtotal) AS total
                FROM invoices i
                JOIN accounts a ON a.id = i.sales_account_id
                {ITEM_QUANTITY_JOIN}
                WHERE {COMPLETED_IN_PERIOD}
                GROUP BY a.id, a.name
                ORDER BY total DESC, orders DESC
                LIMIT $3
                "#
            ),
            period,
            limit,
        )
        .await
    }

    async fn ranking(&self, sql: &str, period: Period, limit: i64) -> Result<Vec<RankingRow>, AppError> {
        let rows = sqlx::query_as::<_, RankingRow>(sql)
            .bind(period.from)
            .bind(period.to)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

// Unidades por fatura, sem duplicar o cabeçalho no SUM(subtotal)
const ITEM_QUANTITY_JOIN: &str = r#"
    LEFT JOIN LATERAL (
        SELECT SUM(quantity) AS quantity FROM invoice_items WHERE invoice_id = i.id
    ) q ON TRUE
"#;
