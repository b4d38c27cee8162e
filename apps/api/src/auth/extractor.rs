use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::state::AppState;

/// The account behind the request's `Authorization: Bearer <token>` header.
/// Rejects with 401 when the header is missing, the token does not verify,
/// or the account no longer exists.
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserRow);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".into()))?;

        let user_id = state.tokens.verify(token)?;
        let user = state
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Could not validate credentials".into()))?;
        Ok(AuthUser(user))
    }
}

/// Scheme match is case-insensitive.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
