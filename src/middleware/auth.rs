use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    error::AppError, models::Role, services::token_service::TokenService, state::AppState,
};

const BEARER_SCHEME: &str = "Bearer";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("missing bearer credential")]
    Unauthenticated,

    #[error("invalid token")]
    InvalidToken,

    #[error("insufficient role")]
    Forbidden,
}

/// Identity of the caller, taken only from a verified token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: Role,
}

/// An [`AuthUser`] whose token carries the `admin` role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

/// Verifies the raw `Authorization` header value and checks it grants `required`.
pub fn authorize(
    tokens: &TokenService,
    required: Role,
    header_value: Option<&str>,
) -> Result<AuthUser, AuthError> {
    // Scheme names are case-insensitive.
    let token = header_value
        .and_then(|value| value.trim_start().split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case(BEARER_SCHEME))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::Unauthenticated)?;

    let claims = tokens.verify(token).map_err(|_| AuthError::InvalidToken)?;
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

    if !claims.role.satisfies(required) {
        return Err(AuthError::Forbidden);
    }

    Ok(AuthUser {
        user_id,
        role: claims.role,
    })
}

fn authorize_parts(parts: &Parts, state: &AppState, required: Role) -> Result<AuthUser, AppError> {
    let header_value = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    Ok(authorize(&state.tokens, required, header_value)?)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize_parts(parts, state, Role::User)
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize_parts(parts, state, Role::Admin).map(AdminUser)
    }
}
