//! Dashboard-user administration. All routes sit behind the superadmin
//! middleware.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use commerce_core::error::AppError;

use crate::{
    dtos::{
        dashboard_user::{AddDashboardUserRequest, UpdateDashboardUserRequest},
        MessageResponse,
    },
    models::SanitizedAccount,
    utils::ValidatedJson,
    AppState,
};

/// Invite a dashboard user with a granted capability set
#[utoipa::path(
    post,
    path = "/dashboard-users",
    request_body = AddDashboardUserRequest,
    responses(
        (status = 201, description = "Dashboard user invited", body = MessageResponse),
        (status = 400, description = "Role cannot be assigned", body = MessageResponse),
        (status = 409, description = "Email or phone already registered", body = MessageResponse),
        (status = 422, description = "Validation error", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard Users"
)]
pub async fn add_dashboard_user(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<AddDashboardUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let role = req.role;
    state.dashboard.add_dashboard_user(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(format!(
            "{} has been added.",
            role.as_str()
        ))),
    ))
}

/// Update a dashboard user
#[utoipa::path(
    patch,
    path = "/dashboard-users/{id}",
    params(("id" = String, Path, description = "Account document id")),
    request_body = UpdateDashboardUserRequest,
    responses(
        (status = 200, description = "Updated account", body = SanitizedAccount),
        (status = 400, description = "Invalid id or role", body = MessageResponse),
        (status = 404, description = "Account not found", body = MessageResponse),
        (status = 409, description = "Phone already registered", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard Users"
)]
pub async fn update_dashboard_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateDashboardUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let account = state.dashboard.update_dashboard_user(&id, req).await?;

    Ok(Json(account))
}
