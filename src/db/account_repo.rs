// src/db/account_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Account, AccountStatus, UserRole},
};

const ACCOUNT_COLUMNS: &str =
    "id, name, username, email, password_hash, role, status, created_at, updated_at";

// Responsável por todas as interações com a tabela 'accounts'
#[derive(Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

/// Campos de uma atualização parcial (já com a senha em hash).
#[derive(Debug, Default)]
pub struct AccountChanges<'a> {
    pub name: Option<&'a str>,
    pub username: Option<&'a str>,
    pub email: Option<&'a str>,
    pub password_hash: Option<&'a str>,
    pub role: Option<UserRole>,
    pub status: Option<AccountStatus>,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE lower(email) = lower($1)"
        ))
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Account>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(account)
    }

    // A tela de contas filtra/ordena/pagina em memória (tabela pequena)
    pub async fn list_all<'e, E>(&self, executor: E) -> Result<Vec<Account>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let accounts = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY created_at"
        ))
        .fetch_all(executor)
        .await?;
        Ok(accounts)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        name: &str,
        username: &str,
        email: &str,
        password_hash: &str,
        role: UserRole,
        status: AccountStatus,
    ) -> Result<Account, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Account>(&format!(
            r#"
            INSERT INTO accounts (name, username, email, password_hash, role, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(name.trim())
        .bind(username.trim())
        .bind(email.trim())
        .bind(password_hash)
        .bind(role)
        .bind(status)
        .fetch_one(executor)
        .await
        .map_err(map_unique_violation)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        changes: AccountChanges<'_>,
    ) -> Result<Option<Account>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Account>(&format!(
            r#"
            UPDATE accounts SET
                name = COALESCE($2, name),
                username = COALESCE($3, username),
                email = COALESCE($4, email),
                password_hash = COALESCE($5, password_hash),
                role = COALESCE($6, role),
                status = COALESCE($7, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.name.map(str::trim))
        .bind(changes.username.map(str::trim))
        .bind(changes.email.map(str::trim))
        .bind(changes.password_hash)
        .bind(changes.role)
        .bind(changes.status)
        .fetch_optional(executor)
        .await
        .map_err(map_unique_violation)
    }

    pub async fn set_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: AccountStatus,
    ) -> Result<Option<Account>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let account = sqlx::query_as::<_, Account>(&format!(
            "UPDATE accounts SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(executor)
        .await?;
        Ok(account)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// Traduz as violações de UNIQUE para os erros de domínio
fn map_unique_violation(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            if let Some(conflict) = conflict_for(db_err.constraint()) {
                return conflict;
            }
        }
    }
    e.into()
}

// Os índices únicos são sobre lower(username) / lower(email)
fn conflict_for(constraint: Option<&str>) -> Option<AppError> {
    match constraint? {
        "accounts_username_key" => Some(AppError::UsernameAlreadyExists),
        "accounts_email_key" => Some(AppError::EmailAlreadyExists),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_indexes_map_to_domain_conflicts() {
        assert!(matches!(conflict_for(Some("accounts_email_key")), Some(AppError::EmailAlreadyExists)));
        assert!(matches!(
            conflict_for(Some("accounts_username_key")),
            Some(AppError::UsernameAlreadyExists)
        ));
        assert!(conflict_for(Some("invoices_order_number_key")).is_none());
        assert!(conflict_for(None).is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "precisa de um PostgreSQL em DATABASE_URL"]
    async fn email_and_username_ignore_case(pool: PgPool) {
        let repo = AccountRepository::new(pool.clone());
        repo.create(&pool, "Owner", "owner", "owner@inventory.local", "hash", UserRole::Owner, AccountStatus::Active)
            .await
            .unwrap();

        let err = repo
            .create(&pool, "Owner 2", "owner2", "Owner@Inventory.local", "hash", UserRole::Owner, AccountStatus::Active)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EmailAlreadyExists));

        let err = repo
            .create(&pool, "Owner 3", "OWNER", "other@inventory.local", "hash", UserRole::Owner, AccountStatus::Active)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UsernameAlreadyExists));

        let found = repo.find_by_email("OWNER@inventory.local").await.unwrap().unwrap();
        assert_eq!(found.username, "owner");
    }
}
