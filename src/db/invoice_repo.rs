// src/db/invoice_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::invoice::{Invoice, InvoiceItem, InvoiceStatus},
};

// Cabeçalho sempre com o nome do cliente resolvido
const INVOICE_SELECT: &str = r#"
    i.id, i.order_number, i.customer_id, c.name AS customer_name, i.sales_account_id,
    i.subtotal, i.vat_amount, i.total, i.status, i.created_at, i.cancelled_at
"#;

const ITEM_COLUMNS: &str =
    "id, invoice_id, product_id, product_name, quantity, unit_price, unit_cost, line_total";

/// Filtro da listagem de faturas (`to` é exclusivo).
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    pub status: Option<InvoiceStatus>,
    pub customer_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct InvoiceRepository {
    pool: PgPool,
}

impl InvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>, AppError> {
        let invoices = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            SELECT {INVOICE_SELECT}
            FROM invoices i
            LEFT JOIN customers c ON c.id = i.customer_id
            WHERE ($1::invoice_status IS NULL OR i.status = $1)
              AND ($2::uuid IS NULL OR i.customer_id = $2)
              AND ($3::timestamptz IS NULL OR i.created_at >= $3)
              AND ($4::timestamptz IS NULL OR i.created_at < $4)
            ORDER BY i.created_at DESC
            "#
        ))
        .bind(filter.status)
        .bind(filter.customer_id)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_all(&self.pool)
        .await?;
        Ok(invoices)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            SELECT {INVOICE_SELECT}
            FROM invoices i
            LEFT JOIN customers c ON c.id = i.customer_id
            WHERE i.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(invoice)
    }

    pub async fn items<'e, E>(&self, executor: E, invoice_id: Uuid) -> Result<Vec<InvoiceItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, InvoiceItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM invoice_items WHERE invoice_id = $1 ORDER BY product_name"
        ))
        .bind(invoice_id)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        customer_id: Option<Uuid>,
        sales_account_id: Option<Uuid>,
        subtotal: Decimal,
        vat_amount: Decimal,
        total: Decimal,
    ) -> Result<Invoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            WITH i AS (
                INSERT INTO invoices (customer_id, sales_account_id, subtotal, vat_amount, total)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
            )
            SELECT {INVOICE_SELECT}
            FROM i
            LEFT JOIN customers c ON c.id = i.customer_id
            "#
        ))
        .bind(customer_id)
        .bind(sales_account_id)
        .bind(subtotal)
        .bind(vat_amount)
        .bind(total)
        .fetch_one(executor)
        .await?;
        Ok(invoice)
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        invoice_id: Uuid,
        product_id: Uuid,
        product_name: &str,
        quantity: i32,
        unit_price: Decimal,
        unit_cost: Decimal,
    ) -> Result<InvoiceItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, InvoiceItem>(&format!(
            r#"
            INSERT INTO invoice_items (invoice_id, product_id, product_name, quantity, unit_price, unit_cost, line_total)
            VALUES ($1, $2, $3, $4, $5, $6, $5 * $4)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(invoice_id)
        .bind(product_id)
        .bind(product_name)
        .bind(quantity)
        .bind(unit_price)
        .bind(unit_cost)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    /// Passa a fatura para `cancelled`. Devolve `None` se ela não existe ou já estava cancelada.
    pub async fn mark_cancelled<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            WITH i AS (
                UPDATE invoices
                SET status = 'CANCELLED', cancelled_at = NOW()
                WHERE id = $1 AND status = 'COMPLETED'
                RETURNING *
            )
            SELECT {INVOICE_SELECT}
            FROM i
            LEFT JOIN customers c ON c.id = i.customer_id
            "#
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(invoice)
    }
}
