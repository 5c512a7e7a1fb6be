// src/models/account.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::common::pagination::PageItem;
use crate::models::auth::{Account, AccountStatus, UserRole};

// --- Payloads da tela de "Role Access" ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountPayload {
    #[validate(length(min = 1, max = 200, message = "O nome é obrigatório."))]
    #[schema(example = "Malee Srisuk")]
    pub name: String,

    #[validate(length(min = 3, max = 50, message = "O usuário deve ter entre 3 e 50 caracteres."))]
    #[schema(example = "malee")]
    pub username: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "malee@inventory.local")]
    pub email: String,

    #[validate(length(min = 6, max = 128, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,

    pub role: UserRole,

    #[serde(default = "default_status")]
    pub status: AccountStatus,
}

fn default_status() -> AccountStatus {
    AccountStatus::Active
}

// Atualização parcial: só os campos enviados mudam
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountPayload {
    #[validate(length(min = 1, max = 200, message = "O nome é obrigatório."))]
    pub name: Option<String>,

    #[validate(length(min = 3, max = 50, message = "O usuário deve ter entre 3 e 50 caracteres."))]
    pub username: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    #[validate(length(min = 6, max = 128, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: Option<String>,

    pub role: Option<UserRole>,
    pub status: Option<AccountStatus>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AccountSortField {
    #[default]
    Name,
    Username,
    Email,
    Role,
    Status,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "snake_case")]
#[into_params(parameter_in = Query)]
pub struct AccountQuery {
    /// Busca em nome, usuário e e-mail (sem diferenciar maiúsculas)
    pub search: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<AccountStatus>,
    pub sort: Option<AccountSortField>,
    pub order: Option<SortOrder>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountPage {
    pub items: Vec<Account>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    /// Números de página para o componente de paginação (`"..."` = reticências)
    #[schema(value_type = Vec<Object>, example = json!([1, "...", 4, 5, 6, "...", 10]))]
    pub page_numbers: Vec<PageItem>,
}
