// src/db/product_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::contains_pattern,
    models::product::{CreateProductPayload, Product, StockAdjustment, UpdateProductPayload},
};

const PRODUCT_COLUMNS: &str =
    "id, company, name, category, price, cost, stock_quantity, image_url, created_at, updated_at";

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Listagem é só leitura, vai direto no pool
    pub async fn list(
        &self,
        search: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<Product>, AppError> {
        // Busca vazia = sem filtro
        let pattern = contains_pattern(search);

        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE ($1::text IS NULL
                   OR lower(name) LIKE $1 ESCAPE '\'
                   OR lower(category) LIKE $1 ESCAPE '\'
                   OR lower(company) LIKE $1 ESCAPE '\')
              AND ($2::text IS NULL OR category = $2)
            ORDER BY name
            "#
        ))
        .bind(pattern)
        .bind(category.map(str::trim).filter(|c| !c.is_empty()))
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }

    pub async fn find_many<'e, E>(&self, executor: E, ids: &[Uuid]) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(executor)
        .await?;
        Ok(products)
    }

    /// Carrega (e trava até o fim da transação) os produtos informados.
    pub async fn lock_many<'e, E>(&self, executor: E, ids: &[Uuid]) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1) ORDER BY id FOR UPDATE"
        ))
        .bind(ids)
        .fetch_all(executor)
        .await?;
        Ok(products)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        payload: &CreateProductPayload,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (company, name, category, price, cost, stock_quantity, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(payload.company.trim())
        .bind(payload.name.trim())
        .bind(payload.category.trim())
        .bind(payload.price)
        .bind(payload.cost)
        .bind(payload.stock_quantity)
        .bind(payload.image_url.as_deref())
        .fetch_one(executor)
        .await?;
        Ok(product)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &UpdateProductPayload,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products SET
                company = COALESCE($2, company),
                name = COALESCE($3, name),
                category = COALESCE($4, category),
                price = COALESCE($5, price),
                image_url = COALESCE($6, image_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(payload.company.as_deref().map(str::trim))
        .bind(payload.name.as_deref().map(str::trim))
        .bind(payload.category.as_deref().map(str::trim))
        .bind(payload.price)
        .bind(payload.image_url.as_deref())
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }

    pub async fn update_cost<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        cost: Decimal,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET cost = $2, updated_at = NOW() WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(cost)
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }

    /// Soma `delta` ao saldo. Devolve `None` se o produto não existe.
    /// Quem chama garante que o saldo não fica negativo (a CHECK do banco barra de qualquer forma).
    pub async fn change_stock<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        delta: i32,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET stock_quantity = stock_quantity + $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(delta)
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }

    pub async fn insert_adjustment<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        delta: i32,
        reason: &str,
        created_by: Option<Uuid>,
    ) -> Result<StockAdjustment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let adjustment = sqlx::query_as::<_, StockAdjustment>(
            r#"
            INSERT INTO stock_adjustments (product_id, delta, reason, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING id, product_id, delta, reason, created_by, created_at
            "#,
        )
        .bind(product_id)
        .bind(delta)
        .bind(reason.trim())
        .bind(created_by)
        .fetch_one(executor)
        .await?;
        Ok(adjustment)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| {
                // Produto já usado num recebimento (FK sem cascade)
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::InvalidState(
                            "product is referenced by a stock-in batch".into(),
                        );
                    }
                }
                e.into()
            })?;
        Ok(result.rows_affected() > 0)
    }
}
