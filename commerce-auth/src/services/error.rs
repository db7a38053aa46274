use commerce_core::error::AppError;
use thiserror::Error;

/// Domain failures surfaced by the services layer. Every public operation
/// returns one of these tags; the `From` impl below fixes the HTTP status
/// each one maps to.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Email already exists.")]
    EmailTaken,

    #[error("Phone number already exists.")]
    PhoneTaken,

    #[error("Account not found.")]
    AccountNotFound,

    #[error("Capability not found.")]
    CapabilityNotFound,

    #[error("Capability already exists.")]
    CapabilityTaken,

    #[error("Email is already verified.")]
    AlreadyVerified,

    #[error("Email is not verified.")]
    EmailNotVerified,

    #[error("Account is pending approval.")]
    AccountPending,

    #[error("Account is suspended.")]
    AccountSuspended,

    #[error("Invalid OTP.")]
    OtpFormatInvalid,

    #[error("OTP has expired.")]
    OtpExpired,

    #[error("Incorrect OTP.")]
    OtpIncorrect,

    #[error("Incorrect password.")]
    IncorrectPassword,

    #[error("New password and confirm password do not match.")]
    PasswordMismatch,

    #[error("Token has expired.")]
    TokenExpired,

    #[error("Invalid token.")]
    TokenInvalid,

    #[error("Unauthorized access.")]
    Unauthorized,

    #[error("Role {0} cannot be assigned.")]
    RoleNotAssignable(String),

    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    #[error("Storage error: {0}")]
    Store(#[source] anyhow::Error),

    #[error("Notifier error: {0}")]
    Notifier(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::EmailTaken
            | ServiceError::PhoneTaken
            | ServiceError::AlreadyVerified
            | ServiceError::CapabilityTaken => AppError::Conflict(anyhow::anyhow!(err.to_string())),
            ServiceError::AccountNotFound | ServiceError::CapabilityNotFound => {
                AppError::NotFound(anyhow::anyhow!(err.to_string()))
            }
            ServiceError::EmailNotVerified | ServiceError::AccountPending => {
                AppError::Forbidden(anyhow::anyhow!(err.to_string()))
            }
            ServiceError::AccountSuspended => AppError::Locked(anyhow::anyhow!(err.to_string())),
            ServiceError::OtpFormatInvalid | ServiceError::PasswordMismatch => {
                AppError::BadRequest(anyhow::anyhow!(err.to_string()))
            }
            ServiceError::OtpExpired => AppError::Gone(anyhow::anyhow!(err.to_string())),
            ServiceError::OtpIncorrect
            | ServiceError::IncorrectPassword
            | ServiceError::TokenExpired
            | ServiceError::TokenInvalid
            | ServiceError::Unauthorized => AppError::AuthError(anyhow::anyhow!(err.to_string())),
            ServiceError::RoleNotAssignable(_) | ServiceError::InvalidId(_) => {
                AppError::BadRequest(anyhow::anyhow!(err.to_string()))
            }
            ServiceError::Store(e) => AppError::DatabaseError(e),
            ServiceError::Notifier(e) => AppError::EmailError(e),
            ServiceError::Internal(e) => AppError::InternalError(e),
        }
    }
}
