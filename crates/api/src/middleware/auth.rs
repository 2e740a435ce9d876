//! Bearer-token authentication extractor.

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};

use crate::error::AppError;
use crate::models::Actor;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

/// Pull the token out of an `Authorization: Bearer <token>` header.
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Extractor that requires a valid bearer token.
///
/// Resolves the token against the session store and hands the handler the
/// [`Actor`] it was issued to. Missing, unknown, and expired tokens all
/// reject with 401 via [`AppError`].
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(actor): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("hello, {}", actor.subject_id)
/// }
/// ```
pub struct RequireAuth(pub Actor);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AppError::Auth(AuthError::MissingToken))?;
        let actor = AuthService::new(state.db()).verify_token(token).await?;
        Ok(Self(actor))
    }
}
