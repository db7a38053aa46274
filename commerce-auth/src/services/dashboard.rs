//! Dashboard-user administration: superadmin-only invite and update.

use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

use crate::dtos::dashboard_user::{AddDashboardUserRequest, UpdateDashboardUserRequest};
use crate::models::{normalize_email, Account, AccountStatus, Role, SanitizedAccount};
use crate::services::{Notifier, ServiceError};
use crate::store::AccountStore;
use crate::utils::{generate_temp_password, hash_secret, templates, Secret};

#[derive(Clone)]
pub struct DashboardService {
    accounts: Arc<dyn AccountStore>,
    notifier: Arc<dyn Notifier>,
}

impl DashboardService {
    pub fn new(accounts: Arc<dyn AccountStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { accounts, notifier }
    }

    /// Invite a dashboard user: a generated temporary password is hashed
    /// and mailed, the granted capability-id set is stored on the account.
    /// The invitee still goes through OTP verification before login.
    pub async fn add_dashboard_user(
        &self,
        req: AddDashboardUserRequest,
    ) -> Result<(), ServiceError> {
        if req.role == Role::Superadmin {
            return Err(ServiceError::RoleNotAssignable(
                req.role.as_str().to_string(),
            ));
        }

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

        let temp_password = generate_temp_password();
        let password_hash = hash_secret(&Secret::new(temp_password.clone()))?;

        let account = Account::new_dashboard(
            req.full_name,
            email.clone(),
            phone,
            password_hash.into_string(),
            req.role,
            req.capability_ids,
            req.profile_picture,
        );

        self.accounts
            .insert(&account)
            .await
            .map_err(ServiceError::Store)?;

        tracing::info!(account_id = %account.id, role = %req.role.as_str(), "Dashboard user invited");

        let (subject, html) = templates::dashboard_invite_email(&temp_password, req.role.as_str());
        self.notifier
            .send(&email, &subject, &html)
            .await
            .map_err(|e| ServiceError::Notifier(e.to_string()))?;

        Ok(())
    }

    /// Partial update of a dashboard account. Email, OTP material, and
    /// last-login are immutable through this surface.
    pub async fn update_dashboard_user(
        &self,
        id_hex: &str,
        req: UpdateDashboardUserRequest,
    ) -> Result<SanitizedAccount, ServiceError> {
        let id =
            ObjectId::parse_str(id_hex).map_err(|_| ServiceError::InvalidId(id_hex.to_string()))?;

        let mut account = self
            .accounts
            .find_by_id(&id)
            .await
            .map_err(ServiceError::Store)?
            .ok_or(ServiceError::AccountNotFound)?;

        if let Some(role) = req.role {
            if role == Role::Superadmin {
                return Err(ServiceError::RoleNotAssignable(role.as_str().to_string()));
            }
            account.role = role;
        }

        if let Some(full_name) = req.full_name {
            account.full_name = full_name;
        }

        if let Some(phone) = req.phone {
            let phone = phone.trim().to_string();
            if phone != account.phone {
                if self
                    .accounts
                    .find_by_phone(&phone)
                    .await
                    .map_err(ServiceError::Store)?
                    .is_some()
                {
                    return Err(ServiceError::PhoneTaken);
                }
                account.phone = phone;
            }
        }

        if let Some(status) = req.status {
            // An unverified account stays pending; only OTP consumption
            // activates it
            if status == AccountStatus::Active && !account.email_verified {
                return Err(ServiceError::EmailNotVerified);
            }
            account.status = status;
        }

        if let Some(capability_ids) = req.capability_ids {
            account.capability_ids = capability_ids;
        }

        if let Some(profile_picture) = req.profile_picture {
            account.profile_picture = Some(profile_picture);
        }

        account.updated_at = Utc::now();

        self.accounts
            .save(&account)
            .await
            .map_err(ServiceError::Store)?;

        Ok(account.sanitized())
    }
}
