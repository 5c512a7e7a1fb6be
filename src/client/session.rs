// src/client/session.rs

use reqwest::Url;

use crate::{
    client::{ApiClient, ClientError, ClientResult},
    models::auth::{AuthResponse, MockLoginResponse, SessionUser, UserRole},
};

/// Estado de login do lado do cliente, alimentado pelo login e pela ponte do OAuth.
#[derive(Debug, Clone, Default)]
pub struct ClientSession {
    token: Option<String>,
    user: Option<SessionUser>,
}

impl ClientSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Guarda a sessão e devolve para onde navegar.
    pub fn apply_login(&mut self, response: AuthResponse) -> String {
        self.token = Some(response.token);
        self.user = Some(response.user);
        safe_redirect(Some(&response.redirect_url))
    }

    /// O login de demonstração não tem token; só o usuário e a URL absoluta do frontend.
    pub fn apply_mock_login(&mut self, response: MockLoginResponse) -> String {
        self.token = None;
        self.user = Some(response.user);
        response.redirect_url
    }

    /// Lê a query string da página `/auth/bridge` escrita pelo callback do Google.
    pub fn apply_bridge(&mut self, query: &str) -> ClientResult<String> {
        let mut url = Url::parse("http://bridge.local/auth/bridge")
            .map_err(|e| ClientError::Config(e.to_string()))?;
        url.set_query(Some(query.trim_start_matches('?')));

        let mut token = None;
        let mut name = None;
        let mut email = None;
        let mut role = None;
        let mut redirect = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "token" => token = Some(value.into_owned()),
                "name" => name = Some(value.into_owned()),
                "email" => email = Some(value.into_owned()),
                "role" => role = UserRole::parse(&value),
                "redirect" => redirect = Some(value.into_owned()),
                _ => {}
            }
        }

        let token = token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ClientError::Validation("Missing login token.".into()))?;
        let role = role.ok_or_else(|| ClientError::Validation("Missing or unknown role.".into()))?;
        let email = email.unwrap_or_default();

        self.token = Some(token);
        self.user = Some(SessionUser {
            id: None,
            name: name.unwrap_or_else(|| email.clone()),
            username: None,
            email,
            role,
        });
        Ok(match redirect {
            Some(path) => safe_redirect(Some(&path)),
            None => role.home_path().to_string(),
        })
    }

    pub fn clear(&mut self) {
        self.token = None;
        self.user = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn role(&self) -> Option<UserRole> {
        self.user.as_ref().map(|u| u.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Cliente com o token desta sessão (ou sem token, se não houver).
    pub fn authorize(&self, client: &ApiClient) -> ApiClient {
        match &self.token {
            Some(token) => client.clone().with_token(token.clone()),
            None => client.clone().without_token(),
        }
    }

    /// Faz logout no servidor e limpa a sessão local mesmo se a chamada falhar.
    pub async fn logout(&mut self, client: &ApiClient) -> ClientResult<()> {
        let result = self.authorize(client).logout().await;
        self.clear();
        result
    }
}

/// Só caminhos internos (`/algo`); URL absoluta ou `//host` vira `/`.
pub fn safe_redirect(path: Option<&str>) -> String {
    match path.map(str::trim) {
        Some(p) if p.starts_with('/') && !p.starts_with("//") && !p.contains('\\') => p.to_string(),
        _ => "/".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_query_opens_a_session() {
        let mut session = ClientSession::new();
        let redirect = session
            .apply_bridge("?token=abc.def&name=Somchai%20Jaidee&email=somchai%40inventory.local&role=owner&redirect=%2Fowner")
            .unwrap();

        assert_eq!(redirect, "/owner");
        assert_eq!(session.token(), Some("abc.def"));
        assert_eq!(session.role(), Some(UserRole::Owner));
        let user = session.user().unwrap();
        assert_eq!(user.name, "Somchai Jaidee");
        assert_eq!(user.email, "somchai@inventory.local");
    }

    #[test]
    fn external_redirects_are_replaced() {
        let mut session = ClientSession::new();
        let redirect = session
            .apply_bridge("token=t&email=a%40b.c&role=sales&redirect=https%3A%2F%2Fevil.example")
            .unwrap();
        assert_eq!(redirect, "/");

        assert_eq!(safe_redirect(Some("//evil.example")), "/");
        assert_eq!(safe_redirect(None), "/");
        assert_eq!(safe_redirect(Some("/sale")), "/sale");
    }

    #[test]
    fn bridge_without_redirect_uses_the_role_home() {
        let mut session = ClientSession::new();
        let redirect = session.apply_bridge("token=t&email=w%40x.y&role=warehouse").unwrap();
        assert_eq!(redirect, "/warehouse");
    }

    #[test]
    fn incomplete_bridge_is_rejected() {
        let mut session = ClientSession::new();
        assert!(session.apply_bridge("name=x&role=owner").is_err());
        assert!(session.apply_bridge("token=t&role=janitor").is_err());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn login_response_and_clear() {
        let mut session = ClientSession::new();
        let redirect = session.apply_login(AuthResponse {
            token: "jwt".into(),
            redirect_url: "/sale".into(),
            user: SessionUser {
                id: None,
                name: "Sales".into(),
                username: None,
                email: "sales@inventory.local".into(),
                role: UserRole::Sales,
            },
        });
        assert_eq!(redirect, "/sale");
        assert!(session.is_authenticated());

        session.clear();
        assert!(session.token().is_none());
        assert!(session.role().is_none());
    }
}
