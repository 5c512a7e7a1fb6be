// src/services/sales_service.rs

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{invoice_repo::InvoiceFilter, CustomerRepository, InvoiceRepository, ProductRepository},
    models::{
        invoice::{CheckoutLine, Invoice, InvoiceDetail, InvoiceQuery, InvoiceStatus},
        product::Product,
    },
    services::{
        analytics_service::month_period,
        cart::{Cart, CartLine, CartQuote},
    },
};

#[derive(Clone)]
pub struct SalesService {
    product_repo: ProductRepository,
    customer_repo: CustomerRepository,
    invoice_repo: InvoiceRepository,
    pool: PgPool,
}

impl SalesService {
    pub fn new(
        product_repo: ProductRepository,
        customer_repo: CustomerRepository,
        invoice_repo: InvoiceRepository,
        pool: PgPool,
    ) -> Self {
        Self { product_repo, customer_repo, invoice_repo, pool }
    }

    /// Preço das linhas com os valores atuais do catálogo (sem gravar nada).
    pub async fn quote(&self, lines: &[CheckoutLine]) -> Result<CartQuote, AppError> {
        if lines.is_empty() {
            return Err(AppError::EmptyCart);
        }
        let products = self.product_repo.find_many(&self.pool, &product_ids(lines)).await?;
        let cart = build_cart(lines, &products)?;
        Ok(CartQuote::from(&cart))
    }

    /// Fecha a venda numa única transação: trava os produtos, confere o saldo,
    /// baixa o estoque, grava a fatura e soma no total pago do cliente.
    pub async fn checkout(
        &self,
        customer_id: Option<Uuid>,
        seller_id: Option<Uuid>,
        lines: &[CheckoutLine],
    ) -> Result<InvoiceDetail, AppError> {
        if lines.is_empty() {
            return Err(AppError::EmptyCart);
        }

        let mut tx = self.pool.begin().await?;

        if let Some(customer_id) = customer_id {
            self.customer_repo
                .find_by_id(&mut *tx, customer_id)
                .await?
                .ok_or_else(|| AppError::ResourceNotFound("Customer".into()))?;
        }

        let products = self.product_repo.lock_many(&mut *tx, &product_ids(lines)).await?;
        let cart = build_cart(lines, &products)?;
        let totals = cart.totals();
        let by_id: HashMap<Uuid, &Product> = products.iter().map(|p| (p.id, p)).collect();

        let header = self
            .invoice_repo
            .create(&mut *tx, customer_id, seller_id, totals.subtotal, totals.vat_amount, totals.total)
            .await?;

        let mut items = Vec::with_capacity(cart.lines().len());
        for line in cart.lines() {
            let unit_cost = by_id
                .get(&line.product_id)
                .map(|p| p.cost)
                .unwrap_or_default();

            self.product_repo
                .change_stock(&mut *tx, line.product_id, -line.quantity)
                .await?;
            let item = self
                .invoice_repo
                .insert_item(
                    &mut *tx,
                    header.id,
                    line.product_id,
                    &line.name,
                    line.quantity,
                    line.unit_price,
                    unit_cost,
                )
                .await?;
            items.push(item);
        }

        if let Some(customer_id) = customer_id {
            self.customer_repo
                .add_total_paid(&mut *tx, customer_id, totals.total)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            "Venda {} concluída: {} itens, total {}",
            header.order_number,
            cart.total_quantity(),
            header.total
        );
        Ok(InvoiceDetail { header, items })
    }

    pub async fn list_invoices(&self, query: &InvoiceQuery) -> Result<Vec<Invoice>, AppError> {
        let period = match query.month.as_deref() {
            Some(month) => month_period(month)?,
            None => Default::default(),
        };
        let filter = InvoiceFilter {
            status: query.status,
            customer_id: query.customer_id,
            from: period.from,
            to: period.to,
        };
        self.invoice_repo.list(&filter).await
    }

    pub async fn get_invoice(&self, id: Uuid) -> Result<InvoiceDetail, AppError> {
        let mut conn = self.pool.acquire().await?;
        let header = self
            .invoice_repo
            .find_by_id(&mut *conn, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Invoice".into()))?;
        let items = self.invoice_repo.items(&mut *conn, id).await?;
        Ok(InvoiceDetail { header, items })
    }

    /// Cancela a fatura: devolve o estoque de cada linha e desconta o total do cliente.
    pub async fn cancel_invoice(&self, id: Uuid) -> Result<InvoiceDetail, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = self
            .invoice_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Invoice".into()))?;
        ensure_cancellable(&current)?;

        // O WHERE status = 'COMPLETED' segura dois cancelamentos simultâneos
        let header = self
            .invoice_repo
            .mark_cancelled(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::InvalidState("invoice is already cancelled".into()))?;

        let items = self.invoice_repo.items(&mut *tx, id).await?;
        for item in &items {
            // Produto excluído depois da venda: nada a devolver
            if let Some(product_id) = item.product_id {
                self.product_repo
                    .change_stock(&mut *tx, product_id, item.quantity)
                    .await?;
            }
        }

        if let Some(customer_id) = header.customer_id {
            self.customer_repo
                .add_total_paid(&mut *tx, customer_id, -header.total)
                .await?;
        }

        tx.commit().await?;

        tracing::info!("Fatura {} cancelada", header.order_number);
        Ok(InvoiceDetail { header, items })
    }
}

/// Só faturas concluídas podem ser canceladas (uma vez).
pub fn ensure_cancellable(invoice: &Invoice) -> Result<(), AppError> {
    match invoice.status {
        InvoiceStatus::Completed => Ok(()),
        InvoiceStatus::Cancelled => Err(AppError::InvalidState(format!(
            "invoice {} is already cancelled",
            invoice.order_number
        ))),
    }
}

fn product_ids(lines: &[CheckoutLine]) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = lines.iter().map(|l| l.product_id).collect();
    ids.sort();
    ids.dedup();
    ids
}

/// Monta o carrinho a partir das linhas pedidas e do catálogo carregado.
/// Linhas repetidas do mesmo produto são somadas antes da conferência de saldo.
pub fn build_cart(lines: &[CheckoutLine], products: &[Product]) -> Result<Cart, AppError> {
    if lines.is_empty() {
        return Err(AppError::EmptyCart);
    }

    let by_id: HashMap<Uuid, &Product> = products.iter().map(|p| (p.id, p)).collect();
    let mut cart = Cart::new();

    for line in lines {
        if line.quantity <= 0 {
            return Err(AppError::BadRequest("quantity must be greater than zero".into()));
        }
        let product = by_id
            .get(&line.product_id)
            .ok_or_else(|| AppError::ResourceNotFound(format!("Product {}", line.product_id)))?;

        let merged = cart.add(CartLine {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.price,
            quantity: line.quantity,
        });
        if !merged {
            return Err(AppError::BadRequest(format!(
                "quantity for {} is too large",
                product.name
            )));
        }
    }

    for line in cart.lines() {
        let available = by_id.get(&line.product_id).map_or(0, |p| p.stock_quantity);
        if line.quantity > available {
            return Err(AppError::InsufficientStock { product: line.name.clone(), available });
        }
    }

    Ok(cart)
}


#[cfg(test)]
mod db_tests {
    use super::*;
    use crate::services::test_support::{customer, product, stock_of, total_paid};
    use rust_decimal::Decimal;

    fn service(pool: &PgPool) -> SalesService {
        SalesService::new(
            ProductRepository::new(pool.clone()),
            CustomerRepository::new(pool.clone()),
            InvoiceRepository::new(pool.clone()),
            pool.clone(),
        )
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "precisa de um PostgreSQL em DATABASE_URL"]
    async fn checkout_moves_stock_and_customer_total(pool: PgPool) {
        let cola = product(&pool, "Cola", 1500, 900, 10).await;
        let water = product(&pool, "Water", 1000, 400, 5).await;
        let niran = customer(&pool, "Niran Wongsa").await;
        let sales = service(&pool);

        let lines = [
            CheckoutLine { product_id: cola.id, quantity: 2 },
            CheckoutLine { product_id: water.id, quantity: 1 },
            CheckoutLine { product_id: cola.id, quantity: 1 },
        ];
        let invoice = sales.checkout(Some(niran.id), None, &lines).await.unwrap();

        // 15 × 3 + 10 = 55; × 1.07 = 58.85
        assert_eq!(invoice.header.subtotal, Decimal::new(5500, 2));
        assert_eq!(invoice.header.total, Decimal::new(5885, 2));
        assert_eq!(invoice.header.status, InvoiceStatus::Completed);
        assert_eq!(invoice.items.len(), 2);
        assert_eq!(stock_of(&pool, &cola).await, 7);
        assert_eq!(stock_of(&pool, &water).await, 4);
        assert_eq!(total_paid(&pool, &niran).await, Decimal::new(5885, 2));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "precisa de um PostgreSQL em DATABASE_URL"]
    async fn checkout_beyond_stock_changes_nothing(pool: PgPool) {
        let cola = product(&pool, "Cola", 1500, 900, 2).await;
        let niran = customer(&pool, "Niran Wongsa").await;

        let err = service(&pool)
            .checkout(Some(niran.id), None, &[CheckoutLine { product_id: cola.id, quantity: 3 }])
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InsufficientStock { available: 2, .. }));
        assert_eq!(stock_of(&pool, &cola).await, 2);
        assert_eq!(total_paid(&pool, &niran).await, Decimal::ZERO);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "precisa de um PostgreSQL em DATABASE_URL"]
    async fn cancel_restores_everything_once(pool: PgPool) {
        let cola = product(&pool, "Cola", 1500, 900, 10).await;
        let niran = customer(&pool, "Niran Wongsa").await;
        let sales = service(&pool);

        let invoice = sales
            .checkout(Some(niran.id), None, &[CheckoutLine { product_id: cola.id, quantity: 4 }])
            .await
            .unwrap();
        assert_eq!(stock_of(&pool, &cola).await, 6);

        let cancelled = sales.cancel_invoice(invoice.header.id).await.unwrap();
        assert_eq!(cancelled.header.status, InvoiceStatus::Cancelled);
        assert!(cancelled.header.cancelled_at.is_some());
        assert_eq!(stock_of(&pool, &cola).await, 10);
        assert_eq!(total_paid(&pool, &niran).await, Decimal::ZERO);

        let err = sales.cancel_invoice(invoice.header.id).await.unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::CONFLICT);
        assert_eq!(stock_of(&pool, &cola).await, 10);
    }
}
