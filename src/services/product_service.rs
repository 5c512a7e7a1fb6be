// src/services/product_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ProductRepository,
    models::product::{
        AdjustStockPayload, AdjustmentResult, CostUpdateEntry, CreateProductPayload, Product,
        ProductQuery, UpdateProductPayload,
    },
};

#[derive(Clone)]
pub struct ProductService {
    repo: ProductRepository,
    pool: PgPool,
}

impl ProductService {
    pub fn new(repo: ProductRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>, AppError> {
        self.repo.list(query.q.as_deref(), query.category.as_deref()).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Product, AppError> {
        self.repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Product".into()))
    }

    pub async fn create(&self, payload: &CreateProductPayload) -> Result<Product, AppError> {
        let product = self.repo.create(&self.pool, payload).await?;
        tracing::info!("Produto criado: {} ({})", product.name, product.id);
        Ok(product)
    }

    pub async fn update(&self, id: Uuid, payload: &UpdateProductPayload) -> Result<Product, AppError> {
        self.repo
            .update(&self.pool, id, payload)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Product".into()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(&self.pool, id).await? {
            return Err(AppError::ResourceNotFound("Product".into()));
        }
        Ok(())
    }

    /// Atualização de custo de um item (o `PATCH` usado como alternativa ao lote).
    pub async fn update_cost(&self, id: Uuid, cost: Decimal) -> Result<Product, AppError> {
        self.repo
            .update_cost(&self.pool, id, cost)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Product".into()))
    }

    /// Custos em lote: ou atualiza todos, ou nenhum.
    pub async fn bulk_update_cost(&self, entries: &[CostUpdateEntry]) -> Result<Vec<Product>, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut updated = Vec::with_capacity(entries.len());

        for entry in entries {
            let product = self
                .repo
                .update_cost(&mut *tx, entry.product_id, entry.cost)
                .await?
                .ok_or_else(|| AppError::ResourceNotFound(format!("Product {}", entry.product_id)))?;
            updated.push(product);
        }

        tx.commit().await?;
        Ok(updated)
    }

    /// Ajuste manual (quebra, perda, contagem). O saldo nunca fica negativo.
    pub async fn adjust_stock(
        &self,
        id: Uuid,
        payload: &AdjustStockPayload,
        actor: Option<Uuid>,
    ) -> Result<AdjustmentResult, AppError> {
        if payload.delta == 0 {
            return Err(AppError::BadRequest("delta must not be zero".into()));
        }

        let mut tx = self.pool.begin().await?;

        let current = self
            .repo
            .lock_many(&mut *tx, &[id])
            .await?
            .pop()
            .ok_or_else(|| AppError::ResourceNotFound("Product".into()))?;

        stock_after(&current, payload.delta)?;

        let product = self
            .repo
            .change_stock(&mut *tx, id, payload.delta)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Product".into()))?;
        let adjustment = self
            .repo
            .insert_adjustment(&mut *tx, id, payload.delta, &payload.reason, actor)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Ajuste de estoque: {} {:+} ({}) -> {}",
            product.name,
            payload.delta,
            payload.reason,
            product.stock_quantity
        );
        Ok(AdjustmentResult { product, adjustment })
    }
}

/// Saldo depois do ajuste; abaixo de zero é conflito.
pub fn stock_after(product: &Product, delta: i32) -> Result<i32, AppError> {
    let resulting = i64::from(product.stock_quantity) + i64::from(delta);
    if resulting < 0 {
        return Err(AppError::InsufficientStock {
            product: product.name.clone(),
            available: product.stock_quantity,
        });
    }
    i32::try_from(resulting).map_err(|_| AppError::BadRequest("resulting stock is too large".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{product, stock_of};
    use axum::http::StatusCode;

    fn sample(stock: i32) -> Product {
        Product {
            id: Uuid::new_v4(),
            company: "Siam Beverage Co.".into(),
            name: "Cola".into(),
            category: "Drinks".into(),
            price: Decimal::new(15, 0),
            cost: Decimal::new(9, 0),
            stock_quantity: stock,
            image_url: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn adjustments_never_go_below_zero() {
        assert_eq!(stock_after(&sample(5), -5).unwrap(), 0);
        assert_eq!(stock_after(&sample(5), 3).unwrap(), 8);

        let err = stock_after(&sample(5), -6).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert!(matches!(err, AppError::InsufficientStock { available: 5, .. }));

        assert!(matches!(stock_after(&sample(i32::MAX), 1), Err(AppError::BadRequest(_))));
    }

    fn service(pool: &PgPool) -> ProductService {
        ProductService::new(ProductRepository::new(pool.clone()), pool.clone())
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "precisa de um PostgreSQL em DATABASE_URL"]
    async fn adjust_stock_records_or_refuses(pool: PgPool) {
        let cola = product(&pool, "Cola", 1500, 900, 3).await;
        let products = service(&pool);

        let result = products
            .adjust_stock(cola.id, &AdjustStockPayload { delta: -2, reason: "Damaged".into() }, None)
            .await
            .unwrap();
        assert_eq!(result.product.stock_quantity, 1);
        assert_eq!(result.adjustment.delta, -2);

        let err = products
            .adjust_stock(cola.id, &AdjustStockPayload { delta: -2, reason: "Lost".into() }, None)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(stock_of(&pool, &cola).await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "precisa de um PostgreSQL em DATABASE_URL"]
    async fn bulk_cost_is_all_or_nothing(pool: PgPool) {
        let cola = product(&pool, "Cola", 1500, 900, 3).await;
        let products = service(&pool);

        let err = products
            .bulk_update_cost(&[
                CostUpdateEntry { product_id: cola.id, cost: Decimal::new(1000, 2) },
                CostUpdateEntry { product_id: Uuid::new_v4(), cost: Decimal::ONE },
            ])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ResourceNotFound(_)));
        assert_eq!(products.get(cola.id).await.unwrap().cost, Decimal::new(900, 2));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "precisa de um PostgreSQL em DATABASE_URL"]
    async fn search_treats_percent_as_text(pool: PgPool) {
        product(&pool, "Sale 50% Cola", 1500, 900, 3).await;
        product(&pool, "500ml Water", 1000, 400, 3).await;

        let found = service(&pool)
            .list(&ProductQuery { q: Some("50%".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Sale 50% Cola");
    }
}
