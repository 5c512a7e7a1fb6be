// src/client/terminal.rs

use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    client::{ApiClient, ClientError, ClientResult},
    models::{
        invoice::{CheckoutLine, CheckoutPayload, InvoiceDetail},
        product::Product,
    },
    services::cart::{Cart, CartLine, CartTotals},
};

/// Terminal de vendas: catálogo local + carrinho.
///
/// O saldo local é reservado ao adicionar e devolvido ao remover; o servidor
/// confere de novo no checkout.
#[derive(Debug, Clone, Default)]
pub struct SalesTerminal {
    catalog: HashMap<Uuid, Product>,
    cart: Cart,
    customer_id: Option<Uuid>,
}

impl SalesTerminal {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            catalog: products.into_iter().map(|p| (p.id, p)).collect(),
            cart: Cart::new(),
            customer_id: None,
        }
    }

    pub async fn load(client: &ApiClient) -> ClientResult<Self> {
        let products: Vec<Product> = client.get("/sale/products").await?;
        Ok(Self::new(products))
    }

    pub fn product(&self, product_id: Uuid) -> Option<&Product> {
        self.catalog.get(&product_id)
    }

    /// Saldo ainda livre no catálogo local.
    pub fn available(&self, product_id: Uuid) -> i32 {
        self.catalog.get(&product_id).map(|p| p.stock_quantity).unwrap_or(0)
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn totals(&self) -> CartTotals {
        self.cart.totals()
    }

    pub fn set_customer(&mut self, customer_id: Option<Uuid>) {
        self.customer_id = customer_id;
    }

    pub fn add(&mut self, product_id: Uuid, quantity: i32) -> ClientResult<()> {
        if quantity <= 0 {
            return Err(ClientError::Validation("Quantity must be greater than zero.".into()));
        }
        let product = self
            .catalog
            .get_mut(&product_id)
            .ok_or_else(|| ClientError::Validation("Unknown product.".into()))?;
        if quantity > product.stock_quantity {
            return Err(ClientError::Validation(format!(
                "Only {} left of {}.",
                product.stock_quantity, product.name
            )));
        }

        let added = self.cart.add(CartLine {
            product_id,
            name: product.name.clone(),
            unit_price: product.price,
            quantity,
        });
        if !added {
            return Err(ClientError::Validation(format!("Quantity for {} is too large.", product.name)));
        }
        product.stock_quantity -= quantity;
        Ok(())
    }

    /// Troca a quantidade da linha; 0 remove.
    pub fn set_quantity(&mut self, product_id: Uuid, quantity: i32) -> ClientResult<()> {
        if quantity <= 0 {
            self.remove(product_id);
            return Ok(());
        }
        let current = self.cart.get(product_id).map(|l| l.quantity).unwrap_or(0);
        match quantity - current {
            0 => Ok(()),
            more if more > 0 => self.add(product_id, more),
            less => {
                if let Some(product) = self.catalog.get_mut(&product_id) {
                    product.stock_quantity -= less;
                }
                self.cart.update_quantity(product_id, quantity);
                Ok(())
            }
        }
    }

    pub fn remove(&mut self, product_id: Uuid) -> Option<CartLine> {
        let line = self.cart.remove(product_id)?;
        if let Some(product) = self.catalog.get_mut(&product_id) {
            product.stock_quantity += line.quantity;
        }
        Some(line)
    }

    /// Fecha a venda no servidor. Com sucesso o carrinho é limpo e o catálogo
    /// é recarregado; se a recarga falhar, fica o saldo local já descontado.
    pub async fn checkout(&mut self, client: &ApiClient) -> ClientResult<InvoiceDetail> {
        if self.cart.is_empty() {
            return Err(ClientError::Validation("The cart is empty.".into()));
        }

        let payload = CheckoutPayload {
            customer_id: self.customer_id,
            items: self
                .cart
                .lines()
                .iter()
                .map(|l| CheckoutLine { product_id: l.product_id, quantity: l.quantity })
                .collect(),
        };
        let invoice: InvoiceDetail = client.post("/sale/checkout", &payload).await?;

        self.cart.clear();
        self.customer_id = None;
        match client.get::<Vec<Product>>("/sale/products").await {
            Ok(products) => self.catalog = products.into_iter().map(|p| (p.id, p)).collect(),
            Err(e) => tracing::warn!("Catálogo não recarregado após a venda: {}", e),
        }

        Ok(invoice)
    }
}
