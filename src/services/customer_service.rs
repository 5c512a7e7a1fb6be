// src/services/customer_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CustomerRepository,
    models::customer::{CreateCustomerPayload, Customer, CustomerQuery, UpdateCustomerPayload},
};

#[derive(Clone)]
pub struct CustomerService {
    repo: CustomerRepository,
    pool: PgPool,
}

impl CustomerService {
    pub fn new(repo: CustomerRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list(&self, query: &CustomerQuery) -> Result<Vec<Customer>, AppError> {
        self.repo.list(query.q.as_deref()).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Customer, AppError> {
        self.repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Customer".into()))
    }

    pub async fn create(&self, payload: &CreateCustomerPayload) -> Result<Customer, AppError> {
        self.repo.create(&self.pool, payload).await
    }

    pub async fn update(&self, id: Uuid, payload: &UpdateCustomerPayload) -> Result<Customer, AppError> {
        self.repo
            .update(&self.pool, id, payload)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Customer".into()))
    }

    // Faturas antigas ficam com customer_id NULL (ON DELETE SET NULL)
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(&self.pool, id).await? {
            return Err(AppError::ResourceNotFound("Customer".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::customer;

    fn service(pool: &PgPool) -> CustomerService {
        CustomerService::new(CustomerRepository::new(pool.clone()), pool.clone())
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "precisa de um PostgreSQL em DATABASE_URL"]
    async fn crud_round(pool: PgPool) {
        let customers = service(&pool);
        let created = customers
            .create(&CreateCustomerPayload {
                name: "Malee Srisuk".into(),
                company: None,
                address: Some("12 Silom Rd".into()),
                phone: None,
                email: Some("malee@example.com".into()),
            })
            .await
            .unwrap();
        assert_eq!(created.total_paid, rust_decimal::Decimal::ZERO);

        let updated = customers
            .update(
                created.id,
                &UpdateCustomerPayload { phone: Some("+66 2 123 4567".into()), ..Default::default() },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Malee Srisuk");
        assert_eq!(updated.phone.as_deref(), Some("+66 2 123 4567"));

        customers.delete(created.id).await.unwrap();
        assert!(matches!(customers.get(created.id).await, Err(AppError::ResourceNotFound(_))));
        assert!(matches!(customers.delete(created.id).await, Err(AppError::ResourceNotFound(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "precisa de um PostgreSQL em DATABASE_URL"]
    async fn search_matches_company_and_escapes_wildcards(pool: PgPool) {
        customer(&pool, "Niran Wongsa").await;
        customer(&pool, "Somchai Jaidee").await;
        let customers = service(&pool);

        let all = customers.list(&CustomerQuery { q: Some("wongsa trad".into()) }).await.unwrap();
        assert_eq!(all.len(), 2);

        let niran = customers.list(&CustomerQuery { q: Some("NIRAN".into()) }).await.unwrap();
        assert_eq!(niran.len(), 1);

        let none = customers.list(&CustomerQuery { q: Some("_iran".into()) }).await.unwrap();
        assert!(none.is_empty());
    }
}
