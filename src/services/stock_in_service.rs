// src/services/stock_in_service.rs

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ProductRepository, StockInRepository},
    models::{
        product::Product,
        stock_in::{CreateStockInPayload, StockInBatch, StockInDetail, StockInQuery, StockInStatus},
    },
};

#[derive(Clone)]
pub struct StockInService {
    repo: StockInRepository,
    product_repo: ProductRepository,
    pool: PgPool,
}

impl StockInService {
    pub fn new(repo: StockInRepository, product_repo: ProductRepository, pool: PgPool) -> Self {
        Self { repo, product_repo, pool }
    }

    /// Cria o lote pendente. O estoque só muda no recebimento.
    pub async fn create_batch(
        &self,
        payload: &CreateStockInPayload,
        created_by: Option<Uuid>,
    ) -> Result<StockInDetail, AppError> {
        if payload.items.is_empty() {
            return Err(AppError::EmptyCart);
        }

        let mut tx = self.pool.begin().await?;

        let ids: Vec<Uuid> = payload.items.iter().map(|i| i.product_id).collect();
        let products = self.product_repo.find_many(&mut *tx, &ids).await?;
        let names: HashMap<Uuid, &Product> = products.iter().map(|p| (p.id, p)).collect();

        let batch = self
            .repo
            .create_batch(
                &mut *tx,
                &payload.supplier,
                payload.expected_date,
                payload.note.as_deref(),
                created_by,
            )
            .await?;

        let mut items = Vec::with_capacity(payload.items.len());
        for line in &payload.items {
            let product = names
                .get(&line.product_id)
                .ok_or_else(|| AppError::ResourceNotFound(format!("Product {}", line.product_id)))?;

            let item = self
                .repo
                .insert_item(
                    &mut *tx,
                    batch.id,
                    product.id,
                    &product.name,
                    line.quantity,
                    line.unit_cost,
                    line.note.as_deref(),
                )
                .await?;
            items.push(item);
        }

        tx.commit().await?;

        tracing::info!(
            "Entrada {} registrada ({} itens, fornecedor {})",
            batch.batch_number,
            items.len(),
            batch.supplier
        );
        Ok(StockInDetail { batch, items })
    }

    /// Com `status=pending` é a lista de produtos aguardando recebimento.
    pub async fn list_batches(&self, query: &StockInQuery) -> Result<Vec<StockInBatch>, AppError> {
        self.repo.list(query.status).await
    }

    pub async fn get_batch(&self, id: Uuid) -> Result<StockInDetail, AppError> {
        let mut conn = self.pool.acquire().await?;
        let batch = self
            .repo
            .find_by_id(&mut *conn, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Stock-in batch".into()))?;
        let items = self.repo.items(&mut *conn, id).await?;
        Ok(StockInDetail { batch, items })
    }

    /// Recebe o lote: soma cada linha ao saldo do produto, tudo ou nada.
    pub async fn receive_batch(&self, id: Uuid) -> Result<StockInDetail, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = self
            .repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Stock-in batch".into()))?;
        ensure_pending(&current)?;

        let items = self.repo.items(&mut *tx, id).await?;
        for item in &items {
            self.product_repo
                .change_stock(&mut *tx, item.product_id, item.quantity)
                .await?
                .ok_or_else(|| AppError::ResourceNotFound(format!("Product {}", item.product_id)))?;
        }

        let batch = self.repo.set_status(&mut *tx, id, StockInStatus::Received).await?;
        tx.commit().await?;

        tracing::info!("Entrada {} recebida", batch.batch_number);
        Ok(StockInDetail { batch, items })
    }

    pub async fn cancel_batch(&self, id: Uuid) -> Result<StockInDetail, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = self
            .repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Stock-in batch".into()))?;
        ensure_pending(&current)?;

        let batch = self.repo.set_status(&mut *tx, id, StockInStatus::Cancelled).await?;
        let items = self.repo.items(&mut *tx, id).await?;
        tx.commit().await?;

        tracing::info!("Entrada {} cancelada", batch.batch_number);
        Ok(StockInDetail { batch, items })
    }
}

/// Só lotes pendentes podem ser recebidos ou cancelados.
pub fn ensure_pending(batch: &StockInBatch) -> Result<(), AppError> {
    match batch.status {
        StockInStatus::Pending => Ok(()),
        StockInStatus::Received => Err(AppError::InvalidState(format!(
            "batch {} was already received",
            batch.batch_number
        ))),
        StockInStatus::Cancelled => Err(AppError::InvalidState(format!(
            "batch {} was cancelled",
            batch.batch_number
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn batch(status: StockInStatus) -> StockInBatch {
        StockInBatch {
            id: Uuid::new_v4(),
            batch_number: "SI-000003".into(),
            supplier: "Siam Beverage Co.".into(),
            expected_date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            status,
            note: None,
            created_by: None,
            received_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn only_pending_batches_can_change() {
        assert!(ensure_pending(&batch(StockInStatus::Pending)).is_ok());

        match ensure_pending(&batch(StockInStatus::Received)) {
            Err(AppError::InvalidState(reason)) => assert!(reason.contains("SI-000003")),
            other => panic!("esperava InvalidState, veio {other:?}"),
        }
        assert!(matches!(
            ensure_pending(&batch(StockInStatus::Cancelled)),
            Err(AppError::InvalidState(_))
        ));
    }

    mod with_db {
        use super::*;
        use crate::{
            models::stock_in::StockInLinePayload,
            services::test_support::{product, stock_of},
        };
        use rust_decimal::Decimal;

        fn service(pool: &PgPool) -> StockInService {
            StockInService::new(
                StockInRepository::new(pool.clone()),
                ProductRepository::new(pool.clone()),
                pool.clone(),
            )
        }

        fn payload(lines: &[(Uuid, i32)]) -> CreateStockInPayload {
            CreateStockInPayload {
                supplier: "Siam Beverage Co.".into(),
                expected_date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
                note: None,
                items: lines
                    .iter()
                    .map(|&(product_id, quantity)| StockInLinePayload {
                        product_id,
                        quantity,
                        unit_cost: Decimal::new(925, 2),
                        note: None,
                    })
                    .collect(),
            }
        }

        #[sqlx::test(migrations = "./migrations")]
        #[ignore = "precisa de um PostgreSQL em DATABASE_URL"]
        async fn receiving_adds_stock_exactly_once(pool: PgPool) {
            let cola = product(&pool, "Cola", 1500, 900, 4).await;
            let water = product(&pool, "Water", 1000, 400, 0).await;
            let stock_in = service(&pool);

            let batch = stock_in
                .create_batch(&payload(&[(cola.id, 12), (water.id, 24)]), None)
                .await
                .unwrap();
            assert_eq!(batch.batch.status, StockInStatus::Pending);
            // Lote pendente ainda não mexe no saldo
            assert_eq!(stock_of(&pool, &cola).await, 4);

            let received = stock_in.receive_batch(batch.batch.id).await.unwrap();
            assert_eq!(received.batch.status, StockInStatus::Received);
            assert_eq!(stock_of(&pool, &cola).await, 16);
            assert_eq!(stock_of(&pool, &water).await, 24);

            assert!(matches!(
                stock_in.receive_batch(batch.batch.id).await,
                Err(AppError::InvalidState(_))
            ));
            assert!(matches!(
                stock_in.cancel_batch(batch.batch.id).await,
                Err(AppError::InvalidState(_))
            ));
            assert_eq!(stock_of(&pool, &cola).await, 16);
        }

        #[sqlx::test(migrations = "./migrations")]
        #[ignore = "precisa de um PostgreSQL em DATABASE_URL"]
        async fn cancelled_batches_never_arrive(pool: PgPool) {
            let cola = product(&pool, "Cola", 1500, 900, 4).await;
            let stock_in = service(&pool);

            let batch = stock_in.create_batch(&payload(&[(cola.id, 6)]), None).await.unwrap();
            let cancelled = stock_in.cancel_batch(batch.batch.id).await.unwrap();
            assert_eq!(cancelled.batch.status, StockInStatus::Cancelled);

            assert!(stock_in.receive_batch(batch.batch.id).await.is_err());
            assert_eq!(stock_of(&pool, &cola).await, 4);

            let pending = stock_in
                .list_batches(&StockInQuery { status: Some(StockInStatus::Pending) })
                .await
                .unwrap();
            assert!(pending.is_empty());
        }
    }
}
