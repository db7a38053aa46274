//! Capability registry administration. All routes sit behind the
//! superadmin middleware.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use commerce_core::error::AppError;

use crate::{
    dtos::{
        capability::{CapabilityResponse, CreateCapabilityRequest, UpdateCapabilityRequest},
        MessageResponse,
    },
    utils::ValidatedJson,
    AppState,
};

/// Create a capability
#[utoipa::path(
    post,
    path = "/capabilities",
    request_body = CreateCapabilityRequest,
    responses(
        (status = 201, description = "Capability created", body = MessageResponse),
        (status = 409, description = "Duplicate capability name", body = MessageResponse),
        (status = 422, description = "Validation error", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Capabilities"
)]
pub async fn create_capability(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateCapabilityRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .capability_service
        .create(&req.name, req.description)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Capability has been created.")),
    ))
}

/// List all capabilities
#[utoipa::path(
    get,
    path = "/capabilities",
    responses(
        (status = 200, description = "All capabilities", body = [CapabilityResponse])
    ),
    security(("bearer_auth" = [])),
    tag = "Capabilities"
)]
pub async fn get_all_capabilities(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let capabilities = state.capability_service.list().await?;

    Ok(Json(
        capabilities
            .into_iter()
            .map(CapabilityResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// Fetch a capability by id
#[utoipa::path(
    get,
    path = "/capabilities/{id}",
    params(("id" = String, Path, description = "Capability document id")),
    responses(
        (status = 200, description = "Capability", body = CapabilityResponse),
        (status = 400, description = "Invalid id", body = MessageResponse),
        (status = 404, description = "Capability not found", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Capabilities"
)]
pub async fn get_capability_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let capability = state.capability_service.get(&id).await?;

    Ok(Json(CapabilityResponse::from(capability)))
}

/// Update a capability's name or description
#[utoipa::path(
    patch,
    path = "/capabilities/{id}",
    params(("id" = String, Path, description = "Capability document id")),
    request_body = UpdateCapabilityRequest,
    responses(
        (status = 200, description = "Updated capability", body = CapabilityResponse),
        (status = 404, description = "Capability not found", body = MessageResponse),
        (status = 409, description = "Duplicate capability name", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Capabilities"
)]
pub async fn update_capability(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateCapabilityRequest>,
) -> Result<impl IntoResponse, AppError> {
    let capability = state
        .capability_service
        .update(&id, &req.name, req.description)
        .await?;

    Ok(Json(CapabilityResponse::from(capability)))
}

/// Delete a capability
#[utoipa::path(
    delete,
    path = "/capabilities/{id}",
    params(("id" = String, Path, description = "Capability document id")),
    responses(
        (status = 200, description = "Capability deleted", body = MessageResponse),
        (status = 404, description = "Capability not found", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Capabilities"
)]
pub async fn delete_capability(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.capability_service.delete(&id).await?;

    Ok(Json(MessageResponse::new("Capability has been deleted.")))
}
