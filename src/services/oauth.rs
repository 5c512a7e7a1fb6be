// src/services/oauth.rs

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::AccountRepository,
    models::auth::{AccountStatus, AuthResponse, SessionUser},
    services::auth::AuthService,
};

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

/// Tempo que um `state` emitido continua válido.
pub const STATE_TTL: Duration = Duration::from_secs(10 * 60);

/// Perfil mínimo devolvido pelo provedor.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityProfile {
    pub email: String,
    pub name: Option<String>,
    #[serde(default)]
    pub email_verified: Option<bool>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn authorize_url(&self, state: &str) -> Result<String, AppError>;

    /// Troca o `code` do callback pelo perfil do usuário.
    async fn fetch_profile(&self, code: &str) -> Result<IdentityProfile, AppError>;
}

pub struct GoogleProvider {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    callback_url: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl GoogleProvider {
    pub fn new(client_id: String, client_secret: String, callback_url: String) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| anyhow::anyhow!("Falha ao criar cliente HTTP: {}", e))?;
        Ok(Self { client, client_id, client_secret, callback_url })
    }
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    fn authorize_url(&self, state: &str) -> Result<String, AppError> {
        let url = Url::parse_with_params(
            GOOGLE_AUTH_URL,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.callback_url.as_str()),
                ("response_type", "code"),
                ("scope", "openid email profile"),
                ("state", state),
                ("prompt", "select_account"),
            ],
        )
        .map_err(|e| anyhow::anyhow!("URL de autorização inválida: {}", e))?;
        Ok(url.into())
    }

    async fn fetch_profile(&self, code: &str) -> Result<IdentityProfile, AppError> {
        let token: TokenResponse = self
            .client
            .post(GOOGLE_TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.callback_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| anyhow::anyhow!("Troca do código OAuth falhou: {}", e))?
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("Resposta de token inválida: {}", e))?;

        let profile = self
            .client
            .get(GOOGLE_USERINFO_URL)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| anyhow::anyhow!("Falha ao buscar perfil do Google: {}", e))?
            .json::<IdentityProfile>()
            .await
            .map_err(|e| anyhow::anyhow!("Perfil do Google inválido: {}", e))?;

        Ok(profile)
    }
}

/// `state` emitidos e ainda não usados (uso único).
#[derive(Clone)]
pub struct OAuthStates {
    states: Arc<Mutex<HashMap<String, Instant>>>,
    ttl: Duration,
}

impl OAuthStates {
    pub fn new(ttl: Duration) -> Self {
        Self { states: Arc::new(Mutex::new(HashMap::new())), ttl }
    }

    pub fn issue(&self) -> String {
        let state = Uuid::new_v4().simple().to_string();
        let now = Instant::now();
        let mut states = self.states.lock().unwrap_or_else(|e| e.into_inner());
        states.retain(|_, issued| now.duration_since(*issued) < self.ttl);
        states.insert(state.clone(), now);
        state
    }

    /// Consome o `state`; falso se nunca foi emitido, já foi usado ou venceu.
    pub fn consume(&self, state: &str) -> bool {
        let mut states = self.states.lock().unwrap_or_else(|e| e.into_inner());
        match states.remove(state) {
            Some(issued) => issued.elapsed() < self.ttl,
            None => false,
        }
    }
}

/// Parâmetros de `GET /auth/google/callback`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct OAuthService {
    provider: Option<Arc<dyn IdentityProvider>>,
    states: OAuthStates,
    account_repo: AccountRepository,
    auth: AuthService,
    frontend_base: String,
}

impl OAuthService {
    pub fn new(
        provider: Option<Arc<dyn IdentityProvider>>,
        account_repo: AccountRepository,
        auth: AuthService,
        frontend_base: String,
    ) -> Self {
        Self {
            provider,
            states: OAuthStates::new(STATE_TTL),
            account_repo,
            auth,
            frontend_base: frontend_base.trim_end_matches('/').to_string(),
        }
    }

    fn provider(&self) -> Result<&Arc<dyn IdentityProvider>, AppError> {
        self.provider.as_ref().ok_or(AppError::OAuthNotConfigured)
    }

    /// URL do Google para onde o navegador é redirecionado.
    pub fn begin(&self) -> Result<String, AppError> {
        let provider = self.provider()?;
        provider.authorize_url(&self.states.issue())
    }

    /// Sempre devolve uma URL do frontend: a ponte de login ou `/login?error=...`.
    pub async fn complete(&self, query: OAuthCallbackQuery) -> Result<String, AppError> {
        let provider = self.provider()?;

        if let Some(error) = query.error {
            tracing::warn!("Login Google recusado: {}", error);
            return self.login_error_url("access_denied");
        }

        let (Some(code), Some(state)) = (query.code, query.state) else {
            return self.login_error_url("missing_code");
        };
        if !self.states.consume(&state) {
            return self.login_error_url("invalid_state");
        }

        let profile = match provider.fetch_profile(&code).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::error!("Falha no callback do Google: {}", e);
                return self.login_error_url("oauth_failed");
            }
        };
        if profile.email_verified == Some(false) {
            return self.login_error_url("email_not_verified");
        }

        let Some(account) = self.account_repo.find_by_email(&profile.email).await? else {
            tracing::info!("Login Google sem conta cadastrada: {}", profile.email);
            return self.login_error_url("account_not_found");
        };
        if account.status != AccountStatus::Active {
            return self.login_error_url("account_inactive");
        }

        let auth = self.auth.open_session(SessionUser::from(&account)).await?;
        self.bridge_url(&auth)
    }

    /// `/auth/bridge?token=…&name=…&email=…&role=…&redirect=…`
    pub fn bridge_url(&self, auth: &AuthResponse) -> Result<String, AppError> {
        let mut url = self.frontend_url("/auth/bridge")?;
        url.query_pairs_mut()
            .append_pair("token", &auth.token)
            .append_pair("name", &auth.user.name)
            .append_pair("email", &auth.user.email)
            .append_pair("role", auth.user.role.as_str())
            .append_pair("redirect", &auth.redirect_url);
        Ok(url.into())
    }

    fn login_error_url(&self, code: &str) -> Result<String, AppError> {
        let mut url = self.frontend_url("/login")?;
        url.query_pairs_mut().append_pair("error", code);
        Ok(url.into())
    }

    fn frontend_url(&self, path: &str) -> Result<Url, AppError> {
        Url::parse(&format!("{}{}", self.frontend_base, path))
            .map_err(|e| anyhow::anyhow!("FRONTEND_DOMAIN_URL inválida: {}", e).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::UserRole;
    use crate::services::session::SessionStore;
    use sqlx::postgres::PgPoolOptions;

    struct FakeProvider;

    #[async_trait]
    impl IdentityProvider for FakeProvider {
        fn authorize_url(&self, state: &str) -> Result<String, AppError> {
            Ok(format!("https://idp.test/auth?state={state}"))
        }

        async fn fetch_profile(&self, _code: &str) -> Result<IdentityProfile, AppError> {
            Err(anyhow::anyhow!("não deveria ser chamado").into())
        }
    }

    fn service(provider: Option<Arc<dyn IdentityProvider>>) -> OAuthService {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/inventory_test")
            .unwrap();
        let repo = AccountRepository::new(pool);
        let auth = AuthService::new(repo.clone(), SessionStore::new(), "segredo".into());
        OAuthService::new(provider, repo, auth, "http://localhost:3000/".into())
    }

    #[test]
    fn google_authorize_url_carries_client_and_scopes() {
        let google = GoogleProvider::new(
            "client-123".into(),
            "secret".into(),
            "http://localhost:5000/auth/google/callback".into(),
        )
        .unwrap();
        let url = Url::parse(&google.authorize_url("abc").unwrap()).unwrap();
        let pairs: HashMap<_, _> = url.query_pairs().into_owned().collect();

        assert_eq!(url.host_str(), Some("accounts.google.com"));
        assert_eq!(pairs["client_id"], "client-123");
        assert_eq!(pairs["redirect_uri"], "http://localhost:5000/auth/google/callback");
        assert_eq!(pairs["scope"], "openid email profile");
        assert_eq!(pairs["state"], "abc");
    }

    #[test]
    fn states_are_single_use_and_expire() {
        let states = OAuthStates::new(STATE_TTL);
        let state = states.issue();
        assert!(states.consume(&state));
        assert!(!states.consume(&state));
        assert!(!states.consume("desconhecido"));

        let expired = OAuthStates::new(Duration::ZERO);
        let state = expired.issue();
        assert!(!expired.consume(&state));
    }

    #[tokio::test]
    async fn missing_configuration_is_reported() {
        let service = service(None);
        assert!(matches!(service.begin(), Err(AppError::OAuthNotConfigured)));
        assert!(matches!(
            service.complete(OAuthCallbackQuery::default()).await,
            Err(AppError::OAuthNotConfigured)
        ));
    }

    #[tokio::test]
    async fn unknown_state_redirects_to_login_with_error() {
        let service = service(Some(Arc::new(FakeProvider)));
        let query = OAuthCallbackQuery {
            code: Some("code".into()),
            state: Some("forjado".into()),
            error: None,
        };
        let url = service.complete(query).await.unwrap();
        assert_eq!(url, "http://localhost:3000/login?error=invalid_state");

        let denied = OAuthCallbackQuery { error: Some("access_denied".into()), ..Default::default() };
        let url = service.complete(denied).await.unwrap();
        assert_eq!(url, "http://localhost:3000/login?error=access_denied");
    }

    #[tokio::test]
    async fn begin_issues_a_state_the_callback_accepts_once() {
        let service = service(Some(Arc::new(FakeProvider)));
        let url = service.begin().unwrap();
        let state = url.split("state=").nth(1).unwrap().to_string();
        assert!(service.states.consume(&state));
        assert!(!service.states.consume(&state));
    }

    #[tokio::test]
    async fn bridge_url_encodes_the_session() {
        let service = service(None);
        let auth = AuthResponse {
            token: "t.o.k".into(),
            redirect_url: "/owner".into(),
            user: SessionUser {
                id: Some(Uuid::new_v4()),
                name: "Niran W".into(),
                username: Some("niran".into()),
                email: "niran@inventory.local".into(),
                role: UserRole::Owner,
            },
        };
        let url = Url::parse(&service.bridge_url(&auth).unwrap()).unwrap();
        assert_eq!(url.path(), "/auth/bridge");
        let pairs: HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs["token"], "t.o.k");
        assert_eq!(pairs["name"], "Niran W");
        assert_eq!(pairs["role"], "owner");
        assert_eq!(pairs["redirect"], "/owner");
    }
}
