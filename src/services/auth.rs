// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::AccountRepository,
    models::auth::{AccountStatus, AuthResponse, Claims, SessionUser, UserRole},
    services::session::{Session, SessionStore},
};

/// Validade do token e da sessão.
pub const SESSION_TTL_DAYS: i64 = 7;

#[derive(Clone)]
pub struct AuthService {
    account_repo: AccountRepository,
    sessions: SessionStore,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(account_repo: AccountRepository, sessions: SessionStore, jwt_secret: String) -> Self {
        Self { account_repo, sessions, jwt_secret }
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let account = self
            .account_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password, &account.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        // Senha certa, mas conta desativada na tela de contas
        if account.status != AccountStatus::Active {
            return Err(AppError::AccountInactive);
        }

        tracing::info!("Login de {} ({})", account.username, account.role.as_str());
        self.open_session(SessionUser::from(&account)).await
    }

    /// Abre a sessão no SessionStore e assina o token que aponta para ela.
    pub async fn open_session(&self, user: SessionUser) -> Result<AuthResponse, AppError> {
        let account_id = user
            .id
            .ok_or_else(|| anyhow::anyhow!("Sessão sem conta associada"))?;
        let role = user.role;

        let session = self
            .sessions
            .open(user, chrono::Duration::days(SESSION_TTL_DAYS))
            .await;
        let token = self.create_token(account_id, session.id, role)?;

        Ok(AuthResponse {
            token,
            redirect_url: role.home_path().to_string(),
            user: session.user,
        })
    }

    /// Token válido e sessão ainda aberta.
    pub async fn validate_token(&self, token: &str) -> Result<Session, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        let claims = token_data.claims;
        let session = self
            .sessions
            .get(claims.sid)
            .await
            .ok_or(AppError::InvalidToken)?;

        if session.user.id != Some(claims.sub) {
            return Err(AppError::InvalidToken);
        }
        Ok(session)
    }

    pub async fn logout(&self, session_id: Uuid) -> bool {
        self.sessions.close(session_id).await
    }

    pub fn create_token(
        &self,
        account_id: Uuid,
        session_id: Uuid,
        role: UserRole,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(SESSION_TTL_DAYS);

        let claims = Claims {
            sub: account_id,
            sid: session_id,
            role,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

// bcrypt é pesado: sempre fora do runtime
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

pub async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();
    let valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(valid)
}
