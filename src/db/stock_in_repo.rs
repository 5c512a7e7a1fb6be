// src/db/stock_in_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::stock_in::{StockInBatch, StockInItem, StockInStatus},
};

const BATCH_COLUMNS: &str =
    "id, batch_number, supplier, expected_date, status, note, created_by, received_at, created_at";

const ITEM_COLUMNS: &str = "id, batch_id, product_id, product_name, quantity, unit_cost, note";

#[derive(Clone)]
pub struct StockInRepository {
    pool: PgPool,
}

impl StockInRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Pendentes primeiro pela data prevista; os demais do mais novo para o mais antigo
    pub async fn list(&self, status: Option<StockInStatus>) -> Result<Vec<StockInBatch>, AppError> {
        let batches = sqlx::query_as::<_, StockInBatch>(&format!(
            r#"
            SELECT {BATCH_COLUMNS}
            FROM stock_in_batches
            WHERE $1::stock_in_status IS NULL OR status = $1
            ORDER BY
                CASE WHEN status = 'PENDING' THEN expected_date END ASC NULLS LAST,
                created_at DESC
            "#
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(batches)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<StockInBatch>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let batch = sqlx::query_as::<_, StockInBatch>(&format!(
            "SELECT {BATCH_COLUMNS} FROM stock_in_batches WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(batch)
    }

    pub async fn find_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<StockInBatch>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let batch = sqlx::query_as::<_, StockInBatch>(&format!(
            "SELECT {BATCH_COLUMNS} FROM stock_in_batches WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(batch)
    }

    pub async fn items<'e, E>(&self, executor: E, batch_id: Uuid) -> Result<Vec<StockInItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, StockInItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM stock_in_items WHERE batch_id = $1 ORDER BY product_name"
        ))
        .bind(batch_id)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    pub async fn create_batch<'e, E>(
        &self,
        executor: E,
        supplier: &str,
        expected_date: NaiveDate,
        note: Option<&str>,
        created_by: Option<Uuid>,
    ) -> Result<StockInBatch, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let batch = sqlx::query_as::<_, StockInBatch>(&format!(
            r#"
            INSERT INTO stock_in_batches (supplier, expected_date, note, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING {BATCH_COLUMNS}
            "#
        ))
        .bind(supplier.trim())
        .bind(expected_date)
        .bind(note)
        .bind(created_by)
        .fetch_one(executor)
        .await?;
        Ok(batch)
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        batch_id: Uuid,
        product_id: Uuid,
        product_name: &str,
        quantity: i32,
        unit_cost: Decimal,
        note: Option<&str>,
    ) -> Result<StockInItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, StockInItem>(&format!(
            r#"
            INSERT INTO stock_in_items (batch_id, product_id, product_name, quantity, unit_cost, note)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(batch_id)
        .bind(product_id)
        .bind(product_name)
        .bind(quantity)
        .bind(unit_cost)
        .bind(note)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    pub async fn set_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: StockInStatus,
    ) -> Result<StockInBatch, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let batch = sqlx::query_as::<_, StockInBatch>(&format!(
            r#"
            UPDATE stock_in_batches
            SET status = $2,
                received_at = CASE WHEN $2 = 'RECEIVED'::stock_in_status THEN NOW() ELSE received_at END
            WHERE id = $1
            RETURNING {BATCH_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .fetch_one(executor)
        .await?;
        Ok(batch)
    }
}
