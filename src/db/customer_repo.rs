// src/db/customer_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::contains_pattern,
    models::customer::{CreateCustomerPayload, Customer, UpdateCustomerPayload},
};

const CUSTOMER_COLUMNS: &str =
    "id, name, company, address, phone, email, total_paid, created_at, updated_at";

#[derive(Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Customer>, AppError> {
        let pattern = contains_pattern(search);

        let customers = sqlx::query_as::<_, Customer>(&format!(
            r#"
            SELECT {CUSTOMER_COLUMNS}
            FROM customers
            WHERE $1::text IS NULL
               OR lower(name) LIKE $1 ESCAPE '\'
               OR lower(COALESCE(company, '')) LIKE $1 ESCAPE '\'
               OR lower(COALESCE(phone, '')) LIKE $1 ESCAPE '\'
               OR lower(COALESCE(email, '')) LIKE $1 ESCAPE '\'
            ORDER BY name
            "#
        ))
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(customers)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(customer)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        payload: &CreateCustomerPayload,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            r#"
            INSERT INTO customers (name, company, address, phone, email)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(payload.name.trim())
        .bind(payload.company.as_deref())
        .bind(payload.address.as_deref())
        .bind(payload.phone.as_deref())
        .bind(payload.email.as_deref())
        .fetch_one(executor)
        .await?;
        Ok(customer)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &UpdateCustomerPayload,
    ) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            r#"
            UPDATE customers SET
                name = COALESCE($2, name),
                company = COALESCE($3, company),
                address = COALESCE($4, address),
                phone = COALESCE($5, phone),
                email = COALESCE($6, email),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(payload.name.as_deref().map(str::trim))
        .bind(payload.company.as_deref())
        .bind(payload.address.as_deref())
        .bind(payload.phone.as_deref())
        .bind(payload.email.as_deref())
        .fetch_optional(executor)
        .await?;
        Ok(customer)
    }

    /// Soma (ou subtrai, com valor negativo) do total pago pelo cliente.
    pub async fn add_total_paid<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        amount: Decimal,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE customers SET total_paid = total_paid + $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(amount)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
