//! Superadmin gate for the capability and dashboard-user administration
//! surface. Verifies the bearer token itself, then requires the
//! superadmin role.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use commerce_core::error::AppError;

use crate::middleware::auth::bearer_token;
use crate::models::Role;
use crate::AppState;

pub async fn require_superadmin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers())
        .ok_or_else(|| AppError::Forbidden(anyhow::anyhow!("No token provided.")))?;

    let claims = state.jwt.verify_access_token(token).map_err(AppError::from)?;

    if claims.role != Role::Superadmin {
        tracing::warn!(email = %claims.email, "Non-superadmin hit admin surface");
        return Err(AppError::AuthError(anyhow::anyhow!("Unauthorized access.")));
    }

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
