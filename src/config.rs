// src/config.rs

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{
        AccountRepository, AnalyticsRepository, CustomerRepository, InvoiceRepository,
        ProductRepository, StockInRepository,
    },
    services::{
        account_service::AccountService,
        analytics_service::AnalyticsService,
        auth::AuthService,
        customer_service::CustomerService,
        document_service::DocumentService,
        oauth::{GoogleProvider, IdentityProvider, OAuthService},
        product_service::ProductService,
        sales_service::SalesService,
        session::SessionStore,
        stock_in_service::StockInService,
    },
};

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
}

/// Configuração lida das variáveis de ambiente (`.env` em desenvolvimento).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub session_secret: String,
    pub google: Option<GoogleConfig>,
    pub frontend_domain_url: String,
    pub frontend_port: Option<u16>,
    pub backend_domain_url: String,
    pub backend_port: u16,
    pub fonts_dir: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Variáveis vazias contam como ausentes.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let session_secret = get("SESSION_SECRET").context("SESSION_SECRET deve ser definido")?;

        let backend_port = match get("BACKEND_PORT") {
            Some(port) => port.parse().context("BACKEND_PORT inválida")?,
            None => 5000,
        };
        let frontend_port = match get("FRONTEND_PORT") {
            Some(port) => Some(port.parse().context("FRONTEND_PORT inválida")?),
            None => Some(3000),
        };

        let frontend_domain_url = get("FRONTEND_DOMAIN_URL").unwrap_or_else(|| "http://localhost".into());
        let backend_domain_url = get("BACKEND_DOMAIN_URL").unwrap_or_else(|| "http://localhost".into());

        // Google só fica ativo com id + secret; o callback tem padrão
        let google = match (get("GOOGLE_CLIENT_ID"), get("GOOGLE_CLIENT_SECRET")) {
            (Some(client_id), Some(client_secret)) => Some(GoogleConfig {
                client_id,
                client_secret,
                callback_url: get("GOOGLE_CALLBACK_URL").unwrap_or_else(|| {
                    format!(
                        "{}:{}/auth/google/callback",
                        backend_domain_url.trim_end_matches('/'),
                        backend_port
                    )
                }),
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            session_secret,
            google,
            frontend_domain_url,
            frontend_port,
            backend_domain_url,
            backend_port,
            fonts_dir: get("FONTS_DIR").unwrap_or_else(|| "./fonts".into()),
        })
    }

    /// Origem do frontend, ex.: `http://localhost:3000`.
    pub fn frontend_base(&self) -> String {
        let domain = self.frontend_domain_url.trim_end_matches('/');
        match self.frontend_port {
            Some(port) => format!("{}:{}", domain, port),
            None => domain.to_string(),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.backend_port)
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<Config>,
    pub i18n_store: I18nStore,
    pub sessions: SessionStore,
    pub auth_service: AuthService,
    pub oauth_service: OAuthService,
    pub account_service: AccountService,
    pub product_service: ProductService,
    pub customer_service: CustomerService,
    pub sales_service: SalesService,
    pub stock_in_service: StockInService,
    pub analytics_service: AnalyticsService,
    pub document_service: DocumentService,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
        Self::with_pool(config, db_pool)
    }

    /// Monta o gráfico de dependências sobre um pool já criado.
    pub fn with_pool(config: Config, db_pool: PgPool) -> anyhow::Result<Self> {
        let i18n_store = I18nStore::load()?;
        let sessions = SessionStore::new();

        let account_repo = AccountRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let customer_repo = CustomerRepository::new(db_pool.clone());
        let invoice_repo = InvoiceRepository::new(db_pool.clone());
        let stock_in_repo = StockInRepository::new(db_pool.clone());
        let analytics_repo = AnalyticsRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            account_repo.clone(),
            sessions.clone(),
            config.session_secret.clone(),
        );

        let provider: Option<Arc<dyn IdentityProvider>> = match &config.google {
            Some(google) => Some(Arc::new(
                GoogleProvider::new(
                    google.client_id.clone(),
                    google.client_secret.clone(),
                    google.callback_url.clone(),
                )
                .map_err(|e| anyhow::anyhow!("{}", e))?,
            )),
            None => {
                tracing::warn!("Login com Google desativado (GOOGLE_CLIENT_ID/SECRET ausentes)");
                None
            }
        };
        let oauth_service = OAuthService::new(
            provider,
            account_repo.clone(),
            auth_service.clone(),
            config.frontend_base(),
        );

        let account_service = AccountService::new(account_repo, sessions.clone(), db_pool.clone());
        let product_service = ProductService::new(product_repo.clone(), db_pool.clone());
        let customer_service = CustomerService::new(customer_repo.clone(), db_pool.clone());
        let sales_service =
            SalesService::new(product_repo.clone(), customer_repo, invoice_repo, db_pool.clone());
        let stock_in_service = StockInService::new(stock_in_repo, product_repo, db_pool.clone());
        let analytics_service = AnalyticsService::new(analytics_repo);
        let document_service = DocumentService::new(sales_service.clone(), config.fonts_dir.clone());

        Ok(Self {
            db_pool,
            config: Arc::new(config),
            i18n_store,
            sessions,
            auth_service,
            oauth_service,
            account_service,
            product_service,
            customer_service,
            sales_service,
            stock_in_service,
            analytics_service,
            document_service,
        })
    }
}
