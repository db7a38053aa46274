//! Auth orchestrator: the register/verify/login/reset state machine.
//!
//! Account lifecycle: pending (unverified) -> active, gated solely by OTP
//! consumption; suspended is an administrative state. Store and notifier
//! failures are logged and surfaced as server errors without detail.

use chrono::Utc;
use std::sync::Arc;

use crate::dtos::auth::RegisterRequest;
use crate::models::{normalize_email, Account, AccountStatus};
use crate::services::{Claims, JwtService, Notifier, OtpEngine, ServiceError, TokenPair};
use crate::store::AccountStore;
use crate::utils::{hash_secret, templates, verify_secret, Secret, SecretHash};

#[derive(Clone)]
pub struct AuthService {
    accounts: Arc<dyn AccountStore>,
    notifier: Arc<dyn Notifier>,
    jwt: JwtService,
    otp: OtpEngine,
}

impl AuthService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        notifier: Arc<dyn Notifier>,
        jwt: JwtService,
        otp: OtpEngine,
    ) -> Self {
        Self {
            accounts,
            notifier,
            jwt,
            otp,
        }
    }

    /// Create a pending customer account with an outstanding OTP challenge
    /// and mail the code. Email uniqueness is checked before phone
    /// uniqueness, so a request violating both reports the email conflict.
    pub async fn register(&self, req: RegisterRequest) -> Result<(), ServiceError> {
        let email = normalize_email(&req.email);
        let phone = req.phone.trim().to_string();

        if self
            .accounts
            .find_by_email(&email)
            .await
            .map_err(ServiceError::Store)?
            .is_some()
        {
            return Err(ServiceError::EmailTaken);
        }

        if self
            .accounts
            .find_by_phone(&phone)
            .await
            .map_err(ServiceError::Store)?
            .is_some()
        {
            return Err(ServiceError::PhoneTaken);
        }

        let password_hash = hash_secret(&Secret::new(req.password))?;
        let (code, challenge) = self.otp.issue()?;

        let mut account = Account::new(
            req.full_name,
            email.clone(),
            phone,
            password_hash.into_string(),
            req.profile_picture,
        );
        account.otp_hash = Some(challenge.otp_hash);
        account.otp_expires_at = Some(challenge.expires_at);

        self.accounts
            .insert(&account)
            .await
            .map_err(ServiceError::Store)?;

        tracing::info!(account_id = %account.id, "Account registered");

        let (subject, html) = templates::registration_otp_email(&code, self.otp.ttl_minutes());
        self.notifier
            .send(&email, &subject, &html)
            .await
            .map_err(|e| ServiceError::Notifier(e.to_string()))?;

        Ok(())
    }

    /// Consume the outstanding OTP challenge to move the account from
    /// pending to active, and mint the first token pair.
    pub async fn verify_email(&self, email: &str, otp: &str) -> Result<TokenPair, ServiceError> {
        if !OtpEngine::is_valid_format(otp) {
            return Err(ServiceError::OtpFormatInvalid);
        }

        let email = normalize_email(email);
        let mut account = self
            .accounts
            .find_by_email(&email)
            .await
            .map_err(ServiceError::Store)?
            .ok_or(ServiceError::AccountNotFound)?;

        if account.email_verified {
            return Err(ServiceError::AlreadyVerified);
        }

        self.otp
            .check(otp, account.otp_hash.as_deref(), account.otp_expires_at)?;

        account.email_verified = true;
        account.status = AccountStatus::Active;
        account.otp_hash = None;
        account.otp_expires_at = None;
        account.updated_at = Utc::now();

        self.accounts
            .save(&account)
            .await
            .map_err(ServiceError::Store)?;

        tracing::info!(account_id = %account.id, "Email verified, account active");

        self.jwt.issue_token_pair(&account)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, ServiceError> {
        let email = normalize_email(email);
        let mut account = self
            .accounts
            .find_by_email(&email)
            .await
            .map_err(ServiceError::Store)?
            .ok_or(ServiceError::AccountNotFound)?;

        if !account.email_verified {
            return Err(ServiceError::EmailNotVerified);
        }

        // An account can be verified yet administratively pending
        match account.status {
            AccountStatus::Pending => return Err(ServiceError::AccountPending),
            AccountStatus::Suspended => return Err(ServiceError::AccountSuspended),
            AccountStatus::Active => {}
        }

        if !verify_secret(
            &Secret::new(password.to_string()),
            &SecretHash::new(account.password_hash.clone()),
        ) {
            return Err(ServiceError::IncorrectPassword);
        }

        account.last_login = Some(Utc::now());
        account.updated_at = Utc::now();
        self.accounts
            .save(&account)
            .await
            .map_err(ServiceError::Store)?;

        tracing::info!(account_id = %account.id, "Login successful");

        self.jwt.issue_token_pair(&account)
    }

    /// Issue a fresh OTP challenge for password reset, overwriting any
    /// outstanding one (single-slot policy), and mail the code.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), ServiceError> {
        self.reissue_otp(email).await
    }

    /// Re-send a confirmation OTP. Same single-slot mechanism as
    /// registration and reset.
    pub async fn resend_otp(&self, email: &str) -> Result<(), ServiceError> {
        self.reissue_otp(email).await
    }

    pub async fn reset_password(
        &self,
        email: &str,
        otp: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), ServiceError> {
        if !OtpEngine::is_valid_format(otp) {
            return Err(ServiceError::OtpFormatInvalid);
        }

        if new_password != confirm_password {
            return Err(ServiceError::PasswordMismatch);
        }

        let email = normalize_email(email);
        let mut account = self
            .accounts
            .find_by_email(&email)
            .await
            .map_err(ServiceError::Store)?
            .ok_or(ServiceError::AccountNotFound)?;

        if !account.email_verified {
            return Err(ServiceError::EmailNotVerified);
        }

        match account.status {
            AccountStatus::Pending => return Err(ServiceError::AccountPending),
            AccountStatus::Suspended => return Err(ServiceError::AccountSuspended),
            AccountStatus::Active => {}
        }

        self.otp
            .check(otp, account.otp_hash.as_deref(), account.otp_expires_at)?;

        let password_hash = hash_secret(&Secret::new(new_password.to_string()))?;
        account.password_hash = password_hash.into_string();
        account.otp_hash = None;
        account.otp_expires_at = None;
        account.updated_at = Utc::now();

        self.accounts
            .save(&account)
            .await
            .map_err(ServiceError::Store)?;

        tracing::info!(account_id = %account.id, "Password reset");

        Ok(())
    }

    /// Mint a fresh access token from verified refresh-token claims.
    pub fn refresh_access_token(&self, claims: &Claims) -> Result<String, ServiceError> {
        self.jwt.reissue_access_token(claims)
    }

    async fn reissue_otp(&self, email: &str) -> Result<(), ServiceError> {
        let email = normalize_email(email);
        let mut account = self
            .accounts
            .find_by_email(&email)
            .await
            .map_err(ServiceError::Store)?
            .ok_or(ServiceError::AccountNotFound)?;

        let (code, challenge) = self.otp.issue()?;
        account.otp_hash = Some(challenge.otp_hash);
        account.otp_expires_at = Some(challenge.expires_at);
        account.updated_at = Utc::now();

        self.accounts
            .save(&account)
            .await
            .map_err(ServiceError::Store)?;

        let (subject, html) = templates::otp_request_email(&code, self.otp.ttl_minutes());
        self.notifier
            .send(&email, &subject, &html)
            .await
            .map_err(|e| ServiceError::Notifier(e.to_string()))?;

        Ok(())
    }
}
