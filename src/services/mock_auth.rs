// src/services/mock_auth.rs

//! Login de demonstração (`POST /login`): não consulta banco nem abre sessão.

use crate::models::auth::{MockLoginResponse, SessionUser, UserRole};

pub const OWNER_EMAIL: &str = "owner@inventory.local";
pub const OWNER_PASSWORD: &str = "owner1234";
pub const SALES_EMAIL: &str = "sales@inventory.local";
pub const SALES_PASSWORD: &str = "sales1234";

/// Papel atribuído a um par e-mail/senha. Qualquer par desconhecido cai no depósito.
pub fn resolve_role(email: &str, password: &str) -> UserRole {
    let email = email.trim().to_ascii_lowercase();
    match (email.as_str(), password) {
        (OWNER_EMAIL, OWNER_PASSWORD) => UserRole::Owner,
        (SALES_EMAIL, SALES_PASSWORD) => UserRole::Sales,
        _ => UserRole::Warehouse,
    }
}

/// `frontend_base` já vem sem barra final (ex.: `http://localhost:3000`).
pub fn mock_login(email: &str, password: &str, frontend_base: &str) -> MockLoginResponse {
    let role = resolve_role(email, password);
    let email = email.trim().to_string();

    let name = match role {
        UserRole::Owner => "Owner".to_string(),
        UserRole::Sales => "Sales".to_string(),
        _ => email
            .split('@')
            .next()
            .filter(|local| !local.is_empty())
            .unwrap_or("Warehouse")
            .to_string(),
    };

    MockLoginResponse {
        redirect_url: format!("{}{}", frontend_base.trim_end_matches('/'), role.home_path()),
        user: SessionUser { id: None, name, username: None, email, role },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRONT: &str = "http://localhost:3000";

    #[test]
    fn owner_pair_goes_to_owner_dashboard() {
        let res = mock_login("owner@inventory.local", "owner1234", FRONT);
        assert_eq!(res.redirect_url, "http://localhost:3000/owner");
        assert_eq!(res.user.role, UserRole::Owner);
    }

    #[test]
    fn sales_pair_goes_to_sales_terminal() {
        let res = mock_login(" Sales@Inventory.local ", "sales1234", FRONT);
        assert_eq!(res.redirect_url, "http://localhost:3000/sale");
        assert_eq!(res.user.role, UserRole::Sales);
    }

    #[test]
    fn anything_else_goes_to_warehouse() {
        assert_eq!(resolve_role("owner@inventory.local", "wrong"), UserRole::Warehouse);
        assert_eq!(resolve_role("sales@inventory.local", "owner1234"), UserRole::Warehouse);
        assert_eq!(resolve_role("", ""), UserRole::Warehouse);

        let res = mock_login("lek@shop.co", "x", "http://front:8080/");
        assert_eq!(res.redirect_url, "http://front:8080/warehouse");
        assert_eq!(res.user.name, "lek");
    }
}
