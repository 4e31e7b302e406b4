use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use super::repo_types::User;
use crate::{error::AppError, state::AppState};

/// Validates the bearer token and resolves it to the stored user.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AppError::InvalidToken)?;

        let token = bearer_token(header).ok_or(AppError::InvalidToken)?;
        let claims = state.jwt.verify(token)?;

        // A validly signed token whose subject has no account is still rejected.
        let user = state
            .store
            .find_user_by_email(&claims.sub)
            .await?
            .ok_or_else(|| {
                warn!(sub = %claims.sub, "token subject has no account");
                AppError::InvalidToken
            })?;

        Ok(AuthUser(user))
    }
}

/// Expect "Bearer <token>", scheme case-insensitive.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
