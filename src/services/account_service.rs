// src/services/account_service.rs

use std::cmp::Ordering;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        pagination::{page_window, total_pages},
    },
    db::{account_repo::AccountChanges, AccountRepository},
    models::{
        account::{
            AccountPage, AccountQuery, AccountSortField, CreateAccountPayload, SortOrder,
            UpdateAccountPayload, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
        },
        auth::{Account, AccountStatus},
    },
    services::{auth::hash_password, session::SessionStore},
};

#[derive(Clone)]
pub struct AccountService {
    repo: AccountRepository,
    sessions: SessionStore,
    pool: PgPool,
}

impl AccountService {
    pub fn new(repo: AccountRepository, sessions: SessionStore, pool: PgPool) -> Self {
        Self { repo, sessions, pool }
    }

    pub async fn list(&self, query: &AccountQuery) -> Result<AccountPage, AppError> {
        let accounts = self.repo.list_all(&self.pool).await?;
        Ok(query_accounts(accounts, query))
    }

    pub async fn create(&self, payload: CreateAccountPayload) -> Result<Account, AppError> {
        let password_hash = hash_password(&payload.password).await?;
        let account = self
            .repo
            .create(
                &self.pool,
                &payload.name,
                &payload.username,
                &payload.email,
                &password_hash,
                payload.role,
                payload.status,
            )
            .await?;

        tracing::info!("Conta criada: {} ({})", account.username, account.role.as_str());
        Ok(account)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateAccountPayload) -> Result<Account, AppError> {
        // Só gera hash novo se a senha veio no payload
        let password_hash = match payload.password.as_deref() {
            Some(password) => Some(hash_password(password).await?),
            None => None,
        };

        let changes = AccountChanges {
            name: payload.name.as_deref(),
            username: payload.username.as_deref(),
            email: payload.email.as_deref(),
            password_hash: password_hash.as_deref(),
            role: payload.role,
            status: payload.status,
        };

        let account = self
            .repo
            .update(&self.pool, id, changes)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Account".into()))?;

        // Papel ou status mudou: a sessão antiga não vale mais
        if payload.role.is_some() || account.status == AccountStatus::Inactive {
            self.sessions.close_for_account(id).await;
        }
        Ok(account)
    }

    pub async fn delete(&self, id: Uuid, actor: Option<Uuid>) -> Result<(), AppError> {
        if actor == Some(id) {
            return Err(AppError::InvalidState("an account cannot delete itself".into()));
        }
        if !self.repo.delete(&self.pool, id).await? {
            return Err(AppError::ResourceNotFound("Account".into()));
        }
        self.sessions.close_for_account(id).await;
        Ok(())
    }

    /// Active ↔ Inactive. Devolve a conta já com o novo status.
    pub async fn toggle_status(&self, id: Uuid, actor: Option<Uuid>) -> Result<Account, AppError> {
        if actor == Some(id) {
            return Err(AppError::InvalidState("an account cannot deactivate itself".into()));
        }

        let mut tx = self.pool.begin().await?;
        let current = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Account".into()))?;

        let account = self
            .repo
            .set_status(&mut *tx, id, current.status.toggled())
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Account".into()))?;
        tx.commit().await?;

        if account.status == AccountStatus::Inactive {
            self.sessions.close_for_account(id).await;
        }
        Ok(account)
    }
}

/// Busca, filtro, ordenação e paginação da tela de contas.
pub fn query_accounts(accounts: Vec<Account>, query: &AccountQuery) -> AccountPage {
    let search = query
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    let mut items: Vec<Account> = accounts
        .into_iter()
        .filter(|a| query.role.is_none_or(|role| a.role == role))
        .filter(|a| query.status.is_none_or(|status| a.status == status))
        .filter(|a| match &search {
            Some(term) => [&a.name, &a.username, &a.email]
                .iter()
                .any(|field| field.to_lowercase().contains(term.as_str())),
            None => true,
        })
        .collect();

    let sort = query.sort.unwrap_or_default();
    let order = query.order.unwrap_or_default();
    items.sort_by(|a, b| {
        let ordering = compare(a, b, sort);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    let page_size = query
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let total = items.len() as u64;
    let pages = total_pages(total, page_size);
    let page = query.page.unwrap_or(1).clamp(1, pages.max(1));

    let start = ((page - 1) * page_size) as usize;
    let items: Vec<Account> = items.into_iter().skip(start).take(page_size as usize).collect();

    AccountPage {
        items,
        total,
        page,
        page_size,
        total_pages: pages,
        page_numbers: page_window(page, pages),
    }
}

fn compare(a: &Account, b: &Account, field: AccountSortField) -> Ordering {
    match field {
        AccountSortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        AccountSortField::Username => a.username.to_lowercase().cmp(&b.username.to_lowercase()),
        AccountSortField::Email => a.email.to_lowercase().cmp(&b.email.to_lowercase()),
        AccountSortField::Role => a.role.as_str().cmp(b.role.as_str()),
        AccountSortField::Status => status_rank(a.status).cmp(&status_rank(b.status)),
        AccountSortField::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

fn status_rank(status: AccountStatus) -> u8 {
    match status {
        AccountStatus::Active => 0,
        AccountStatus::Inactive => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::pagination::PageItem;
    use crate::models::auth::UserRole;
    use chrono::{Duration, Utc};

    fn account(i: i64, name: &str, role: UserRole, status: AccountStatus) -> Account {
        Account {
            id: Uuid::new_v4(),
            name: name.into(),
            username: name.to_lowercase().replace(' ', "."),
            email: format!("{}@inventory.local", name.to_lowercase().replace(' ', ".")),
            password_hash: "x".into(),
            role,
            status,
            created_at: Utc::now() + Duration::minutes(i),
            updated_at: Utc::now(),
        }
    }

    fn sample() -> Vec<Account> {
        vec![
            account(0, "Somchai", UserRole::Warehouse, AccountStatus::Active),
            account(1, "Anong", UserRole::Sales, AccountStatus::Active),
            account(2, "Malee", UserRole::Sales, AccountStatus::Inactive),
            account(3, "Boonmee", UserRole::Owner, AccountStatus::Active),
            account(4, "Chai", UserRole::Admin, AccountStatus::Active),
        ]
    }

    fn names(page: &AccountPage) -> Vec<&str> {
        page.items.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn default_query_sorts_by_name() {
        let page = query_accounts(sample(), &AccountQuery::default());
        assert_eq!(names(&page), ["Anong", "Boonmee", "Chai", "Malee", "Somchai"]);
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page_numbers, vec![PageItem::Page(1)]);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let query = AccountQuery { search: Some("MAL".into()), ..Default::default() };
        assert_eq!(names(&query_accounts(sample(), &query)), ["Malee"]);

        let query = AccountQuery { search: Some("inventory.local".into()), ..Default::default() };
        assert_eq!(query_accounts(sample(), &query).total, 5);
    }

    #[test]
    fn filters_by_role_and_status() {
        let query = AccountQuery {
            role: Some(UserRole::Sales),
            status: Some(AccountStatus::Active),
            ..Default::default()
        };
        assert_eq!(names(&query_accounts(sample(), &query)), ["Anong"]);
    }

    #[test]
    fn sorts_descending_by_creation() {
        let query = AccountQuery {
            sort: Some(AccountSortField::CreatedAt),
            order: Some(SortOrder::Desc),
            ..Default::default()
        };
        assert_eq!(
            names(&query_accounts(sample(), &query)),
            ["Chai", "Boonmee", "Malee", "Anong", "Somchai"]
        );
    }

    #[test]
    fn paginates_and_clamps_the_page() {
        let many: Vec<Account> = (0..45)
            .map(|i| account(i, &format!("User {i:02}"), UserRole::Sales, AccountStatus::Active))
            .collect();

        let query = AccountQuery { page: Some(2), page_size: Some(10), ..Default::default() };
        let page = query_accounts(many.clone(), &query);
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.items[0].name, "User 10");
        assert_eq!(page.total_pages, 5);

        let query = AccountQuery { page: Some(99), page_size: Some(10), ..Default::default() };
        let page = query_accounts(many.clone(), &query);
        assert_eq!(page.page, 5);
        assert_eq!(page.items.len(), 5);

        let query = AccountQuery { page: Some(1), page_size: Some(5), ..Default::default() };
        let page = query_accounts(many, &query);
        assert_eq!(page.total_pages, 9);
        assert_eq!(page.page_numbers.len(), 7);
        assert_eq!(page.page_numbers[5], PageItem::ELLIPSIS);
    }

    #[test]
    fn empty_result_has_no_pages() {
        let query = AccountQuery { search: Some("ninguém".into()), ..Default::default() };
        let page = query_accounts(sample(), &query);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.page, 1);
        assert!(page.page_numbers.is_empty());
    }
}
