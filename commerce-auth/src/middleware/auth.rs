//! Bearer-token authentication middleware.
//!
//! A missing Authorization header is a 403; a token that fails
//! verification is a 401. Verified claims land in request extensions for
//! handlers and downstream middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use commerce_core::error::AppError;

use crate::services::Claims;
use crate::AppState;

pub fn bearer_token(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Require a valid access token.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers())
        .ok_or_else(|| AppError::Forbidden(anyhow::anyhow!("No token provided.")))?;

    let claims = state.jwt.verify_access_token(token).map_err(AppError::from)?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Require a valid refresh token (used by the access-token refresh route).
pub async fn require_refresh_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers())
        .ok_or_else(|| AppError::Forbidden(anyhow::anyhow!("No token provided.")))?;

    let claims = state
        .jwt
        .verify_refresh_token(token)
        .map_err(AppError::from)?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Extractor for verified claims placed in request extensions by the
/// middleware above.
pub struct AuthClaims(pub Claims);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthClaims
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts.extensions.get::<Claims>().ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!(
                "Auth claims missing from request extensions"
            ))
        })?;

        Ok(AuthClaims(claims.clone()))
    }
}
