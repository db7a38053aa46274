//! Capability authorization middleware.
//!
//! Layered on top of `require_auth`: reads the verified claims from
//! request extensions and asks the resolver whether the granted
//! capability set covers the requested path. Denies by default when no
//! capability maps to the path.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use commerce_core::error::AppError;

use crate::services::Claims;
use crate::AppState;

pub async fn require_capability(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = req.extensions().get::<Claims>().cloned().ok_or_else(|| {
        AppError::InternalError(anyhow::anyhow!(
            "Capability check requires auth middleware to run first"
        ))
    })?;

    let path = req.uri().path().to_string();

    state
        .capability_service
        .authorize(&claims, &path)
        .await
        .map_err(AppError::from)?;

    Ok(next.run(req).await)
}
