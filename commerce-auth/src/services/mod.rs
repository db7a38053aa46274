//! Services layer: the authentication core.
//!
//! The orchestrator (`AuthService`) composes the secret hasher, the OTP
//! engine, the token issuer, and the store/notifier adapters. The
//! capability resolver gates protected resources per request.

mod auth;
mod capability;
mod dashboard;
mod email;
pub mod error;
mod jwt;
mod otp;

pub use auth::AuthService;
pub use capability::CapabilityService;
pub use dashboard::DashboardService;
pub use email::{MockNotifier, Notifier, SentEmail, SmtpNotifier};
pub use error::ServiceError;
pub use jwt::{Claims, JwtService, TokenPair};
pub use otp::{OtpChallenge, OtpEngine};
