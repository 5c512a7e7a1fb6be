// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// Erros de domínio. Os handlers convertem para `ApiError` (já traduzido) com `to_api_error`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Requisição inválida: {0}")]
    BadRequest(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Conta inativa")]
    AccountInactive,

    #[error("Papel '{0}' sem acesso")]
    Forbidden(String),

    #[error("{0} não encontrado")]
    ResourceNotFound(String),

    #[error("Nome de usuário já existe")]
    UsernameAlreadyExists,

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Estoque insuficiente para {product} (disponível: {available})")]
    InsufficientStock { product: String, available: i32 },

    #[error("Operação não permitida: {0}")]
    InvalidState(String),

    #[error("Carrinho vazio")]
    EmptyCart,

    #[error("OAuth não configurado")]
    OAuthNotConfigured,

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

/// Erro pronto para a resposta HTTP: status + mensagem traduzida.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::BadRequest(_) | AppError::EmptyCart => {
                StatusCode::BAD_REQUEST
            }
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::AccountInactive | AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            AppError::UsernameAlreadyExists
            | AppError::EmailAlreadyExists
            | AppError::InsufficientStock { .. }
            | AppError::InvalidState(_) => StatusCode::CONFLICT,
            AppError::OAuthNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            AppError::FontNotFound(_)
            | AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_api_error(self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let lang = locale.0.as_str();
        let status = self.status_code();

        let (error, details) = match self {
            AppError::ValidationError(errors) => {
                let mut fields = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    fields.insert(field.to_string(), json!(messages));
                }
                (i18n.translate(lang, "error.validation"), Some(Value::Object(fields)))
            }
            AppError::BadRequest(reason) => {
                (i18n.translate_with(lang, "error.bad_request", &[("reason", reason)]), None)
            }
            AppError::InvalidCredentials => (i18n.translate(lang, "error.invalid_credentials"), None),
            AppError::InvalidToken => (i18n.translate(lang, "error.invalid_token"), None),
            AppError::AccountInactive => (i18n.translate(lang, "error.account_inactive"), None),
            AppError::Forbidden(role) => {
                (i18n.translate_with(lang, "error.forbidden", &[("role", role)]), None)
            }
            AppError::ResourceNotFound(resource) => {
                (i18n.translate_with(lang, "error.not_found", &[("resource", resource)]), None)
            }
            AppError::UsernameAlreadyExists => (i18n.translate(lang, "error.username_taken"), None),
            AppError::EmailAlreadyExists => (i18n.translate(lang, "error.email_taken"), None),
            AppError::InsufficientStock { product, available } => (
                i18n.translate_with(
                    lang,
                    "error.insufficient_stock",
                    &[("product", product), ("available", available.to_string())],
                ),
                None,
            ),
            AppError::InvalidState(reason) => {
                (i18n.translate_with(lang, "error.invalid_state", &[("reason", reason)]), None)
            }
            AppError::EmptyCart => (i18n.translate(lang, "error.empty_cart"), None),
            AppError::OAuthNotConfigured => (i18n.translate(lang, "error.oauth_not_configured"), None),
            ref e @ AppError::FontNotFound(_) => {
                tracing::error!("Falha ao gerar PDF: {}", e);
                (i18n.translate(lang, "error.font_not_found"), None)
            }
            // Todo o resto vira 500. O detalhe fica só no log.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (i18n.translate(lang, "error.internal"), None)
            }
        };

        ApiError { status, error, details }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::{ValidationError, ValidationErrors};

    fn store() -> I18nStore {
        I18nStore::load().unwrap()
    }

    #[test]
    fn validation_errors_carry_field_details() {
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("length");
        err.message = Some("required".into());
        errors.add("name", err);

        let api = AppError::ValidationError(errors).to_api_error(&Locale("en".into()), &store());
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.error, "One or more fields are invalid.");
        assert_eq!(api.details.unwrap()["name"][0], "required");
    }

    #[test]
    fn insufficient_stock_is_a_localized_conflict() {
        let err = AppError::InsufficientStock { product: "Café".into(), available: 2 };
        let api = err.to_api_error(&Locale("pt".into()), &store());
        assert_eq!(api.status, StatusCode::CONFLICT);
        assert_eq!(api.error, "Estoque insuficiente para Café (disponível: 2).");
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = AppError::InternalServerError(anyhow::anyhow!("conexão recusada"));
        let api = err.to_api_error(&Locale("en".into()), &store());
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.error, "An unexpected error occurred.");
        assert!(api.details.is_none());
    }

    #[test]
    fn status_codes_follow_the_error_kind() {
        assert_eq!(AppError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden("sales".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::ResourceNotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::OAuthNotConfigured.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(AppError::EmptyCart.status_code(), StatusCode::BAD_REQUEST);
    }
}
