use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use commerce_core::error::AppError;

use crate::{
    dtos::{
        auth::{
            AccessTokenResponse, EmailRequest, LoginRequest, RegisterRequest,
            ResetPasswordRequest, TokenPairResponse, VerifyEmailRequest, VerifyEmailResponse,
        },
        MessageResponse,
    },
    middleware::AuthClaims,
    utils::ValidatedJson,
    AppState,
};

/// Register a new customer account
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created, OTP sent", body = MessageResponse),
        (status = 409, description = "Email or phone already registered", body = MessageResponse),
        (status = 422, description = "Validation error", body = MessageResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    ),
    tag = "Authentication"
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.auth.register(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("OTP sent to your email.")),
    ))
}

/// Verify the account email with an OTP
#[utoipa::path(
    post,
    path = "/auth/verify-email",
    request_body = VerifyEmailRequest,
    responses(
        (status = 200, description = "Email verified, tokens issued", body = VerifyEmailResponse),
        (status = 400, description = "Malformed OTP", body = MessageResponse),
        (status = 401, description = "Incorrect OTP", body = MessageResponse),
        (status = 404, description = "Account not found", body = MessageResponse),
        (status = 409, description = "Email already verified", body = MessageResponse),
        (status = 410, description = "OTP expired", body = MessageResponse)
    ),
    tag = "Authentication"
)]
pub async fn verify_email(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<VerifyEmailRequest>,
) -> Result<impl IntoResponse, AppError> {
    let tokens = state.auth.verify_email(&req.email, &req.otp).await?;

    Ok(Json(VerifyEmailResponse {
        message: "Email verified successfully.".to_string(),
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    }))
}

/// Re-send the confirmation OTP
#[utoipa::path(
    post,
    path = "/auth/resend-confirmation",
    request_body = EmailRequest,
    responses(
        (status = 200, description = "OTP sent", body = MessageResponse),
        (status = 404, description = "Account not found", body = MessageResponse)
    ),
    tag = "Authentication"
)]
pub async fn resend_confirmation(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<EmailRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.auth.resend_otp(&req.email).await?;

    Ok(Json(MessageResponse::new("OTP sent to your email.")))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Tokens issued", body = TokenPairResponse),
        (status = 401, description = "Incorrect password", body = MessageResponse),
        (status = 403, description = "Email not verified or account pending", body = MessageResponse),
        (status = 404, description = "Account not found", body = MessageResponse),
        (status = 423, description = "Account suspended", body = MessageResponse)
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let tokens = state.auth.login(&req.email, &req.password).await?;

    Ok(Json(TokenPairResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    }))
}

/// Request a password-reset OTP
#[utoipa::path(
    post,
    path = "/auth/request-confirmation",
    request_body = EmailRequest,
    responses(
        (status = 200, description = "OTP sent", body = MessageResponse),
        (status = 404, description = "Account not found", body = MessageResponse)
    ),
    tag = "Authentication"
)]
pub async fn request_confirmation(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<EmailRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.auth.request_password_reset(&req.email).await?;

    Ok(Json(MessageResponse::new("OTP sent to your email.")))
}

/// Reset the password with an OTP
#[utoipa::path(
    post,
    path = "/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Malformed OTP or password mismatch", body = MessageResponse),
        (status = 401, description = "Incorrect OTP", body = MessageResponse),
        (status = 403, description = "Email not verified or account pending", body = MessageResponse),
        (status = 404, description = "Account not found", body = MessageResponse),
        (status = 410, description = "OTP expired", body = MessageResponse),
        (status = 423, description = "Account suspended", body = MessageResponse)
    ),
    tag = "Authentication"
)]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ResetPasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .auth
        .reset_password(&req.email, &req.otp, &req.new_password, &req.confirm_password)
        .await?;

    Ok(Json(MessageResponse::new("Password changed successfully.")))
}

/// Mint a fresh access token from a refresh token
#[utoipa::path(
    get,
    path = "/auth/refresh-access-token",
    responses(
        (status = 200, description = "Access token issued", body = AccessTokenResponse),
        (status = 401, description = "Invalid or expired refresh token", body = MessageResponse),
        (status = 403, description = "No token provided", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
pub async fn refresh_access_token(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
) -> Result<impl IntoResponse, AppError> {
    let access_token = state.auth.refresh_access_token(&claims)?;

    Ok(Json(AccessTokenResponse { access_token }))
}
