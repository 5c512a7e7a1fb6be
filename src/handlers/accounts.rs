// src/handlers/accounts.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{AccountAdmin, RequireRole},
    },
    models::{
        account::{AccountPage, AccountQuery, CreateAccountPayload, UpdateAccountPayload},
        auth::Account,
    },
};

#[utoipa::path(
    get,
    path = "/admin/accounts",
    tag = "Accounts",
    params(AccountQuery),
    responses(
        (status = 200, description = "Página de contas (busca, filtro, ordenação)", body = AccountPage)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_accounts(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AccountAdmin>,
    Query(query): Query<AccountQuery>,
) -> Result<Json<AccountPage>, ApiError> {
    let page = app_state
        .account_service
        .list(&query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(page))
}

#[utoipa::path(
    post,
    path = "/admin/accounts",
    tag = "Accounts",
    request_body = CreateAccountPayload,
    responses(
        (status = 201, description = "Conta criada", body = Account),
        (status = 409, description = "Usuário ou e-mail já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_account(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AccountAdmin>,
    Json(payload): Json<CreateAccountPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let account = app_state
        .account_service
        .create(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(account)))
}

#[utoipa::path(
    put,
    path = "/admin/accounts/{id}",
    tag = "Accounts",
    request_body = UpdateAccountPayload,
    params(("id" = Uuid, Path, description = "ID da conta")),
    responses(
        (status = 200, description = "Conta atualizada", body = Account),
        (status = 404, description = "Conta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_account(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AccountAdmin>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAccountPayload>,
) -> Result<Json<Account>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let account = app_state
        .account_service
        .update(id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(account))
}

#[utoipa::path(
    delete,
    path = "/admin/accounts/{id}",
    tag = "Accounts",
    params(("id" = Uuid, Path, description = "ID da conta")),
    responses(
        (status = 204, description = "Conta removida"),
        (status = 409, description = "Não é possível remover a própria conta")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_account(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AccountAdmin>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .account_service
        .delete(id, user.account_id())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/admin/accounts/{id}/toggle-status",
    tag = "Accounts",
    params(("id" = Uuid, Path, description = "ID da conta")),
    responses(
        (status = 200, description = "Status alternado (Active ↔ Inactive)", body = Account)
    ),
    security(("api_jwt" = []))
)]
pub async fn toggle_account_status(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AccountAdmin>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Account>, ApiError> {
    let account = app_state
        .account_service
        .toggle_status(id, user.account_id())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(account))
}
