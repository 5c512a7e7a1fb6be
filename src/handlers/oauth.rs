// src/handlers/oauth.rs

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    services::oauth::OAuthCallbackQuery,
};

fn found(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

#[utoipa::path(
    get,
    path = "/auth/google",
    tag = "Auth",
    responses(
        (status = 302, description = "Redireciona para o consentimento do Google"),
        (status = 503, description = "Login com Google não configurado")
    )
)]
pub async fn google_login(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<Response, ApiError> {
    let url = app_state
        .oauth_service
        .begin()
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(found(url))
}

#[utoipa::path(
    get,
    path = "/auth/google/callback",
    tag = "Auth",
    params(OAuthCallbackQuery),
    responses(
        (status = 302, description = "Redireciona para a ponte de login do frontend (ou /login?error=...)"),
        (status = 503, description = "Login com Google não configurado")
    )
)]
pub async fn google_callback(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<OAuthCallbackQuery>,
) -> Result<Response, ApiError> {
    let url = app_state
        .oauth_service
        .complete(query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(found(url))
}
