// src/handlers/mock.rs

use axum::{extract::State, Json};

use crate::{
    config::AppState,
    models::auth::{MockLoginPayload, MockLoginResponse},
    services::mock_auth,
};

pub const HEALTH_TEXT: &str = "Inventory backend is running";

#[utoipa::path(
    get,
    path = "/",
    tag = "Mock",
    responses(
        (status = 200, description = "Servidor no ar", body = String)
    )
)]
pub async fn health() -> &'static str {
    HEALTH_TEXT
}

/// Login de demonstração: nunca falha, só escolhe o papel pelo par e-mail/senha.
#[utoipa::path(
    post,
    path = "/login",
    tag = "Mock",
    request_body = MockLoginPayload,
    responses(
        (status = 200, description = "Destino conforme o papel", body = MockLoginResponse)
    )
)]
pub async fn mock_login(
    State(app_state): State<AppState>,
    Json(payload): Json<MockLoginPayload>,
) -> Json<MockLoginResponse> {
    let response = mock_auth::mock_login(
        &payload.email,
        &payload.password,
        &app_state.config.frontend_base(),
    );
    tracing::info!("Login de demonstração: {} → {}", payload.email, response.redirect_url);
    Json(response)
}
