// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use utoipa::ToSchema;
use validator::Validate;

// --- Papéis ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")] // Banco: OWNER
#[serde(rename_all = "lowercase")] // JSON: owner
pub enum UserRole {
    Owner,
    Sales,
    Warehouse,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Owner => "owner",
            UserRole::Sales => "sales",
            UserRole::Warehouse => "warehouse",
            UserRole::Admin => "admin",
        }
    }

    /// Página inicial de cada papel no frontend.
    pub fn home_path(&self) -> &'static str {
        match self {
            UserRole::Owner => "/owner",
            UserRole::Sales => "/sale",
            UserRole::Warehouse => "/warehouse",
            UserRole::Admin => "/admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "owner" => Some(UserRole::Owner),
            "sales" => Some(UserRole::Sales),
            "warehouse" => Some(UserRole::Warehouse),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "account_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Active,
    Inactive,
}

impl AccountStatus {
    pub fn toggled(self) -> Self {
        match self {
            AccountStatus::Active => AccountStatus::Inactive,
            AccountStatus::Inactive => AccountStatus::Active,
        }
    }
}

// Representa uma conta vinda do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    #[schema(example = "Somchai Jaidee")]
    pub name: String,
    #[schema(example = "somchai")]
    pub username: String,
    #[schema(example = "somchai@inventory.local")]
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub role: UserRole,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados para login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "owner@inventory.local")]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    #[schema(example = "owner1234")]
    pub password: String,
}

/// Dados do usuário guardados na sessão (e devolvidos ao frontend).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: Option<Uuid>,
    pub name: String,
    pub username: Option<String>,
    pub email: String,
    pub role: UserRole,
}

impl From<&Account> for SessionUser {
    fn from(account: &Account) -> Self {
        Self {
            id: Some(account.id),
            name: account.name.clone(),
            username: Some(account.username.clone()),
            email: account.email.clone(),
            role: account.role,
        }
    }
}

// Resposta de autenticação com o token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    #[schema(example = "/owner")]
    pub redirect_url: String,
    pub user: SessionUser,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,      // Subject (ID da conta)
    pub sid: Uuid,      // ID da sessão no SessionStore
    pub role: UserRole,
    pub exp: usize,     // Expiration time
    pub iat: usize,     // Issued At
}

// --- Login de demonstração (POST /login) ---

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MockLoginPayload {
    #[schema(example = "owner@inventory.local")]
    pub email: String,
    #[schema(example = "owner1234")]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MockLoginResponse {
    #[schema(example = "http://localhost:3000/owner")]
    pub redirect_url: String,
    pub user: SessionUser,
}
