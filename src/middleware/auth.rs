use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, Validation, decode};

use crate::{dto::auth::Claims, error::AppError, state::AppState};

pub const STAFF_ROLES: [&str; 2] = ["admin", "cashier"];

/// A staff member authenticated by bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
    pub role: String,
}

pub fn ensure_role(user: &AuthUser, roles: &[&str]) -> Result<(), AppError> {
    if !roles.contains(&user.role.as_str()) {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn ensure_staff(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, &STAFF_ROLES)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::BadRequest("Missing Authorization header".into()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::BadRequest("Invalid Authorization header".into()))?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::BadRequest("Invalid Authorization scheme".into()))?
            .trim();

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(state.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::BadRequest("Invalid or expired token".into()))?;

        Ok(AuthUser {
            username: decoded.claims.sub,
            role: decoded.claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str) -> AuthUser {
        AuthUser {
            username: "ngozi".into(),
            role: role.into(),
        }
    }

    #[test]
    fn staff_roles_pass() {
        assert!(ensure_staff(&user("admin")).is_ok());
        assert!(ensure_staff(&user("cashier")).is_ok());
    }

    #[test]
    fn other_roles_are_forbidden() {
        assert!(matches!(ensure_staff(&user("customer")), Err(AppError::Forbidden)));
        assert!(matches!(ensure_role(&user("cashier"), &["admin"]), Err(AppError::Forbidden)));
    }
}
