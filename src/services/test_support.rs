// src/services/test_support.rs

//! Cadastros mínimos para os testes que rodam contra o PostgreSQL (`#[sqlx::test]`).

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    db::{CustomerRepository, ProductRepository},
    models::{
        customer::{CreateCustomerPayload, Customer},
        product::{CreateProductPayload, Product},
    },
};

/// `price` e `cost` em centavos.
pub async fn product(pool: &PgPool, name: &str, price: i64, cost: i64, stock: i32) -> Product {
    ProductRepository::new(pool.clone())
        .create(
            pool,
            &CreateProductPayload {
                company: "Siam Beverage Co.".into(),
                name: name.into(),
                category: "Drinks".into(),
                price: Decimal::new(price, 2),
                cost: Decimal::new(cost, 2),
                stock_quantity: stock,
                image_url: None,
            },
        )
        .await
        .unwrap()
}

pub async fn customer(pool: &PgPool, name: &str) -> Customer {
    CustomerRepository::new(pool.clone())
        .create(
            pool,
            &CreateCustomerPayload {
                name: name.into(),
                company: Some("Wongsa Trading".into()),
                address: None,
                phone: Some("+66 81 234 5678".into()),
                email: None,
            },
        )
        .await
        .unwrap()
}

pub async fn stock_of(pool: &PgPool, product: &Product) -> i32 {
    ProductRepository::new(pool.clone())
        .find_by_id(pool, product.id)
        .await
        .unwrap()
        .unwrap()
        .stock_quantity
}

pub async fn total_paid(pool: &PgPool, customer: &Customer) -> Decimal {
    CustomerRepository::new(pool.clone())
        .find_by_id(pool, customer.id)
        .await
        .unwrap()
        .unwrap()
        .total_paid
}
