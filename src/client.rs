// src/client.rs

//! SDK do frontend: o wrapper de fetch compartilhado e os fluxos do cliente
//! (painéis, terminal de vendas, recebimento e sessão).

pub mod analytics;
pub mod panel;
pub mod session;
pub mod stock_in;
pub mod terminal;

use std::time::Duration;

use reqwest::{header, Client, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::auth::{
    AuthResponse, LoginUserPayload, MockLoginPayload, MockLoginResponse, SessionUser,
};

#[derive(Debug, Error)]
pub enum ClientError {
    /// Resposta não-2xx; `message` é o campo `error` do corpo (já traduzido pelo servidor)
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Falha de rede: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Resposta inesperada: {0}")]
    Decode(String),

    #[error("{0}")]
    Validation(String),

    #[error("Configuração inválida: {0}")]
    Config(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Texto para exibir no painel.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Http { message, .. } if !message.is_empty() => message.clone(),
            ClientError::Http { status, .. } => format!("Request failed ({status})."),
            ClientError::Network(_) => "Could not reach the server.".into(),
            ClientError::Decode(_) => "Unexpected response from the server.".into(),
            ClientError::Validation(message) => message.clone(),
            ClientError::Config(_) => "The client is not configured.".into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Token fixo do site, usado quando não há sessão
    pub site_token: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), site_token: None, timeout: Duration::from_secs(30) }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `NEXT_PUBLIC_BACKEND_DOMAIN_URL:NEXT_PUBLIC_BACKEND_PORT` + `NEXT_PUBLIC_ENDPOINT`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let domain = get("NEXT_PUBLIC_BACKEND_DOMAIN_URL").unwrap_or_else(|| "http://localhost".into());
        let port = get("NEXT_PUBLIC_BACKEND_PORT").unwrap_or_else(|| "5000".into());
        let endpoint = get("NEXT_PUBLIC_ENDPOINT").unwrap_or_default();

        let mut config = Self::new(format!(
            "{}:{}{}",
            domain.trim_end_matches('/'),
            port,
            endpoint.trim_end_matches('/')
        ));
        config.site_token = get("NEXT_PUBLIC_JWT_SITE_TOKEN");
        config
    }
}

/// Cliente HTTP compartilhado: JSON, bearer opcional e cookies (`credentials: include`).
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    site_token: Option<String>,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            site_token: config.site_token.clone(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn without_token(mut self) -> Self {
        self.token = None;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Token de sessão; sem sessão, o token do site.
    pub fn bearer(&self) -> Option<&str> {
        self.token.as_deref().or(self.site_token.as_deref())
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut request = self
            .http
            .request(method, self.url(path))
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json");
        if let Some(token) = self.bearer() {
            request = request.bearer_auth(token);
        }
        request
    }

    async fn send(request: RequestBuilder) -> ClientResult<String> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(http_error(status, &text));
        }
        Ok(text)
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> ClientResult<T> {
        let text = Self::send(request).await?;
        serde_json::from_str(&text).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// JSON cru, para os fetchers que sanitizam a resposta.
    pub async fn get_value(&self, path: &str) -> ClientResult<Value> {
        let text = Self::send(self.request(Method::GET, path)).await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ClientError::Decode(e.to_string()))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        Self::send_json(self.request(Method::GET, path)).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ClientResult<T> {
        Self::send_json(self.request(Method::POST, path).json(body)).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ClientResult<T> {
        Self::send_json(self.request(Method::PUT, path).json(body)).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ClientResult<T> {
        Self::send_json(self.request(Method::PATCH, path).json(body)).await
    }

    /// POST sem corpo e sem resposta (ex.: logout, 204).
    pub async fn post_empty(&self, path: &str) -> ClientResult<()> {
        Self::send(self.request(Method::POST, path)).await.map(|_| ())
    }

    // ========== Auth ==========

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let payload = LoginUserPayload { email: email.to_string(), password: password.to_string() };
        self.post("/auth/login", &payload).await
    }

    pub async fn mock_login(&self, email: &str, password: &str) -> ClientResult<MockLoginResponse> {
        let payload = MockLoginPayload { email: email.to_string(), password: password.to_string() };
        self.post("/login", &payload).await
    }

    pub async fn me(&self) -> ClientResult<SessionUser> {
        self.get("/auth/me").await
    }

    pub async fn logout(&self) -> ClientResult<()> {
        self.post_empty("/auth/logout").await
    }
}

fn http_error(status: StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());
    ClientError::Http { status: status.as_u16(), message }
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::Router;
    use tokio::net::TcpListener;

    use super::{ApiClient, ClientConfig};

    /// Sobe o router num `127.0.0.1:0` e devolve um cliente apontado para ele.
    pub async fn serve(router: Router) -> ApiClient {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        ApiClient::new(&ClientConfig::new(format!("http://{addr}"))).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{HeaderMap, StatusCode as AxumStatus},
        routing::{get, post},
        Json, Router,
    };
    use serde_json::json;

    fn echo_router() -> Router {
        Router::new()
            .route(
                "/echo",
                get(|headers: HeaderMap| async move {
                    let read = |name: &str| {
                        headers.get(name).and_then(|v| v.to_str().ok()).unwrap_or("").to_string()
                    };
                    Json(json!({
                        "authorization": read("authorization"),
                        "contentType": read("content-type"),
                    }))
                }),
            )
            .route(
                "/conflict",
                post(|| async {
                    (AxumStatus::CONFLICT, Json(json!({ "error": "Insufficient stock for Cola." })))
                }),
            )
            .route("/broken", get(|| async { "not json" }))
    }

    #[test]
    fn config_reads_the_public_variables() {
        let config = ClientConfig::from_lookup(|key| match key {
            "NEXT_PUBLIC_BACKEND_DOMAIN_URL" => Some("https://api.shop.co/".into()),
            "NEXT_PUBLIC_BACKEND_PORT" => Some("8443".into()),
            "NEXT_PUBLIC_ENDPOINT" => Some("/v1".into()),
            "NEXT_PUBLIC_JWT_SITE_TOKEN" => Some("site".into()),
            _ => None,
        });
        assert_eq!(config.base_url, "https://api.shop.co:8443/v1");
        assert_eq!(config.site_token.as_deref(), Some("site"));

        let defaults = ClientConfig::from_lookup(|_| None);
        assert_eq!(defaults.base_url, "http://localhost:5000");
        assert!(defaults.site_token.is_none());
    }

    #[tokio::test]
    async fn requests_carry_json_and_the_best_token() {
        let client = test_support::serve(echo_router()).await;

        let body: Value = client.get("/echo").await.unwrap();
        assert_eq!(body["contentType"], "application/json");
        assert_eq!(body["authorization"], "");

        let mut config = ClientConfig::new(client.base_url());
        config.site_token = Some("site-token".into());
        let site = ApiClient::new(&config).unwrap();
        let body: Value = site.get("/echo").await.unwrap();
        assert_eq!(body["authorization"], "Bearer site-token");

        let session = site.with_token("session-token");
        let body: Value = session.get("/echo").await.unwrap();
        assert_eq!(body["authorization"], "Bearer session-token");
    }

    #[tokio::test]
    async fn error_bodies_become_http_errors() {
        let client = test_support::serve(echo_router()).await;

        let err = client.post::<Value, _>("/conflict", &json!({})).await.unwrap_err();
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.user_message(), "Insufficient stock for Cola.");

        let err = client.get::<Value>("/missing").await.unwrap_err();
        assert_eq!(err.status(), Some(404));

        let err = client.get::<Value>("/broken").await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}
