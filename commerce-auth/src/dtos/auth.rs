use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// Required fields use #[serde(default)] so an absent field fails the
// validator (422) instead of the JSON parser (400).

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "full name is required"))]
    #[schema(example = "Jane Doe")]
    pub full_name: String,

    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane@example.com")]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "Secret1!pass", min_length = 8)]
    pub password: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "phone is required"))]
    #[schema(example = "555-0100")]
    pub phone: String,

    pub profile_picture: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyEmailRequest {
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane@example.com")]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "otp is required"))]
    #[schema(example = "483920")]
    pub otp: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EmailRequest {
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane@example.com")]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane@example.com")]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "Secret1!pass")]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane@example.com")]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "otp is required"))]
    #[schema(example = "483920")]
    pub otp: String,

    #[serde(default, rename = "newPassword")]
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "NewSecret2!pass", min_length = 8)]
    pub new_password: String,

    #[serde(default, rename = "confirmPassword")]
    #[validate(length(min = 1, message = "confirm password is required"))]
    #[schema(example = "NewSecret2!pass")]
    pub confirm_password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenPairResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyEmailResponse {
    #[schema(example = "Email verified successfully.")]
    pub message: String,
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AccessTokenResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
}
