//! Account model - identity records for customers and dashboard users.

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Account roles. Dashboard roles carry a granted capability-id set;
/// superadmin bypasses capability checks entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Superadmin,
    Admin,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Superadmin => "superadmin",
            Role::Admin => "admin",
            Role::Customer => "customer",
        }
    }

    /// Dashboard roles are the ones whose tokens carry capability ids.
    pub fn is_dashboard(&self) -> bool {
        matches!(self, Role::Superadmin | Role::Admin)
    }
}

/// Account lifecycle status. Only OTP consumption moves pending to active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Pending,
    Active,
    Suspended,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Pending => "pending",
            AccountStatus::Active => "active",
            AccountStatus::Suspended => "suspended",
        }
    }
}

/// Account entity.
///
/// The OTP challenge is embedded: at most one outstanding challenge per
/// account, stored only as its hash. A successful verification clears both
/// fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub role: Role,
    pub status: AccountStatus,
    pub email_verified: bool,
    #[serde(default)]
    pub capability_ids: Vec<i64>,
    pub otp_hash: Option<String>,
    pub otp_expires_at: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a self-registered customer account: pending and unverified
    /// until its OTP challenge is consumed.
    pub fn new(
        full_name: String,
        email: String,
        phone: String,
        password_hash: String,
        profile_picture: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            full_name,
            email,
            phone,
            password_hash,
            role: Role::Customer,
            status: AccountStatus::Pending,
            email_verified: false,
            capability_ids: Vec::new(),
            otp_hash: None,
            otp_expires_at: None,
            last_login: None,
            profile_picture,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create an admin-invited dashboard account with a granted
    /// capability-id set. Starts pending and unverified like a
    /// self-registered account.
    pub fn new_dashboard(
        full_name: String,
        email: String,
        phone: String,
        password_hash: String,
        role: Role,
        capability_ids: Vec<i64>,
        profile_picture: Option<String>,
    ) -> Self {
        let mut account = Self::new(full_name, email, phone, password_hash, profile_picture);
        account.role = role;
        account.capability_ids = capability_ids;
        account
    }

    pub fn sanitized(&self) -> SanitizedAccount {
        SanitizedAccount::from(self.clone())
    }
}

/// Lowercase-and-trim normalization applied to every email before it
/// touches the store; email uniqueness is case-insensitive.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Account response for the API (no password or OTP material).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SanitizedAccount {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub status: AccountStatus,
    pub email_verified: bool,
    pub capability_ids: Vec<i64>,
    pub last_login: Option<DateTime<Utc>>,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for SanitizedAccount {
    fn from(a: Account) -> Self {
        Self {
            id: a.id.to_hex(),
            full_name: a.full_name,
            email: a.email,
            phone: a.phone,
            role: a.role,
            status: a.status,
            email_verified: a.email_verified,
            capability_ids: a.capability_ids,
            last_login: a.last_login,
            profile_picture: a.profile_picture,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_account_starts_pending_and_unverified() {
        let account = Account::new(
            "Jane Doe".to_string(),
            "jane@example.com".to_string(),
            "555-0100".to_string(),
            "$argon2id$hash".to_string(),
            None,
        );

        assert_eq!(account.status, AccountStatus::Pending);
        assert!(!account.email_verified);
        assert_eq!(account.role, Role::Customer);
        assert!(account.capability_ids.is_empty());
    }

    #[test]
    fn dashboard_account_carries_grants_but_stays_pending() {
        let account = Account::new_dashboard(
            "Ops Admin".to_string(),
            "ops@example.com".to_string(),
            "555-0101".to_string(),
            "$argon2id$hash".to_string(),
            Role::Admin,
            vec![1, 4, 7],
            None,
        );

        assert_eq!(account.role, Role::Admin);
        assert_eq!(account.capability_ids, vec![1, 4, 7]);
        assert_eq!(account.status, AccountStatus::Pending);
        assert!(!account.email_verified);
    }

    #[test]
    fn normalize_email_lowercases_and_trims() {
        assert_eq!(normalize_email("  Jane@Example.COM "), "jane@example.com");
    }

    #[test]
    fn sanitized_account_drops_secret_material() {
        let account = Account::new(
            "Jane Doe".to_string(),
            "jane@example.com".to_string(),
            "555-0100".to_string(),
            "$argon2id$hash".to_string(),
            None,
        );
        let json = serde_json::to_value(account.sanitized()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("otp_hash").is_none());
    }
}
