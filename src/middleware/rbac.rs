// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::auth::UserRole,
};

/// Uma área do sistema e os papéis que podem entrar nela.
pub trait RoleDef: Send + Sync + 'static {
    fn name() -> &'static str;
    fn allowed() -> &'static [UserRole];

    fn permits(role: UserRole) -> bool {
        Self::allowed().contains(&role)
    }
}

/// Guardião: use como argumento do handler, ex. `_: RequireRole<SaleAccess>`.
pub struct RequireRole<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_header(
            parts.headers.get(header::ACCEPT_LANGUAGE).and_then(|v| v.to_str().ok()),
        );

        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::InvalidToken.to_api_error(&locale, &app_state.i18n_store))?;

        let role = user.user.role;
        if !T::permits(role) {
            tracing::warn!(
                "Acesso negado: {} ({}) tentou entrar em '{}'",
                user.user.email,
                role.as_str(),
                T::name()
            );
            return Err(AppError::Forbidden(role.as_str().to_string())
                .to_api_error(&locale, &app_state.i18n_store));
        }

        Ok(RequireRole(PhantomData))
    }
}

// ---
// ÁREAS (TIPOS)
// ---

pub struct WarehouseAccess;
impl RoleDef for WarehouseAccess {
    fn name() -> &'static str { "warehouse" }
    fn allowed() -> &'static [UserRole] {
        &[UserRole::Owner, UserRole::Warehouse, UserRole::Admin]
    }
}

pub struct SaleAccess;
impl RoleDef for SaleAccess {
    fn name() -> &'static str { "sale" }
    fn allowed() -> &'static [UserRole] {
        &[UserRole::Owner, UserRole::Sales, UserRole::Admin]
    }
}

pub struct AnalyticsAccess;
impl RoleDef for AnalyticsAccess {
    fn name() -> &'static str { "analytics" }
    fn allowed() -> &'static [UserRole] {
        &[UserRole::Owner, UserRole::Admin]
    }
}

pub struct AccountAdmin;
impl RoleDef for AccountAdmin {
    fn name() -> &'static str { "accounts" }
    fn allowed() -> &'static [UserRole] {
        &[UserRole::Admin, UserRole::Owner]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn areas_admit_the_expected_roles() {
        assert!(WarehouseAccess::permits(UserRole::Warehouse));
        assert!(!WarehouseAccess::permits(UserRole::Sales));

        assert!(SaleAccess::permits(UserRole::Sales));
        assert!(!SaleAccess::permits(UserRole::Warehouse));

        assert!(AnalyticsAccess::permits(UserRole::Owner));
        assert!(!AnalyticsAccess::permits(UserRole::Sales));
        assert!(!AnalyticsAccess::permits(UserRole::Warehouse));

        assert!(AccountAdmin::permits(UserRole::Admin));
        assert!(!AccountAdmin::permits(UserRole::Warehouse));
    }

    #[test]
    fn owner_and_admin_reach_every_area() {
        for role in [UserRole::Owner, UserRole::Admin] {
            assert!(WarehouseAccess::permits(role));
            assert!(SaleAccess::permits(role));
            assert!(AnalyticsAccess::permits(role));
            assert!(AccountAdmin::permits(role));
        }
    }
}
