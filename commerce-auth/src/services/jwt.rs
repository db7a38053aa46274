//! Token issuer: stateless, signed access and refresh tokens.
//!
//! Access and refresh tokens are HS256 JWTs signed with independent
//! secrets and expiries. There is no server-side revocation list; logout
//! is client-side discard.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;
use crate::models::{Account, Role};
use crate::services::ServiceError;

/// Claims carried by both token kinds: identity, role, and (for dashboard
/// accounts) the granted capability-id set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capability_ids: Vec<i64>,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Both tokens minted on a successful verification or login.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct JwtService {
    access_encoding_key: EncodingKey,
    access_decoding_key: DecodingKey,
    refresh_encoding_key: EncodingKey,
    refresh_decoding_key: DecodingKey,
    access_token_expiry_minutes: i64,
    refresh_token_expiry_days: i64,
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            access_encoding_key: EncodingKey::from_secret(config.access_secret.as_bytes()),
            access_decoding_key: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_encoding_key: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_decoding_key: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_token_expiry_minutes: config.access_token_expiry_minutes,
            refresh_token_expiry_days: config.refresh_token_expiry_days,
        }
    }

    fn claims_for(&self, account: &Account, lifetime: Duration) -> Claims {
        let now = Utc::now();
        // Only dashboard tokens carry the capability-id set
        let capability_ids = if account.role.is_dashboard() {
            account.capability_ids.clone()
        } else {
            Vec::new()
        };

        Claims {
            name: account.full_name.clone(),
            email: account.email.clone(),
            role: account.role,
            capability_ids,
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        }
    }

    pub fn issue_access_token(&self, account: &Account) -> Result<String, ServiceError> {
        let claims = self.claims_for(account, Duration::minutes(self.access_token_expiry_minutes));
        self.sign(&claims, &self.access_encoding_key)
    }

    pub fn issue_refresh_token(&self, account: &Account) -> Result<String, ServiceError> {
        let claims = self.claims_for(account, Duration::days(self.refresh_token_expiry_days));
        self.sign(&claims, &self.refresh_encoding_key)
    }

    pub fn issue_token_pair(&self, account: &Account) -> Result<TokenPair, ServiceError> {
        Ok(TokenPair {
            access_token: self.issue_access_token(account)?,
            refresh_token: self.issue_refresh_token(account)?,
        })
    }

    /// Mint a fresh access token from verified refresh-token claims,
    /// keeping the identity and grants but renewing the timestamps.
    pub fn reissue_access_token(&self, claims: &Claims) -> Result<String, ServiceError> {
        let now = Utc::now();
        let renewed = Claims {
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.access_token_expiry_minutes)).timestamp(),
            ..claims.clone()
        };
        self.sign(&renewed, &self.access_encoding_key)
    }

    pub fn verify_access_token(&self, token: &str) -> Result<Claims, ServiceError> {
        Self::verify(token, &self.access_decoding_key)
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, ServiceError> {
        Self::verify(token, &self.refresh_decoding_key)
    }

    pub fn access_token_expiry_seconds(&self) -> i64 {
        self.access_token_expiry_minutes * 60
    }

    fn sign(&self, claims: &Claims, key: &EncodingKey) -> Result<String, ServiceError> {
        encode(&Header::new(Algorithm::HS256), claims, key)
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Failed to encode token: {}", e)))
    }

    fn verify(token: &str, key: &DecodingKey) -> Result<Claims, ServiceError> {
        let validation = Validation::new(Algorithm::HS256);

        match decode::<Claims>(token, key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
                Err(ServiceError::TokenExpired)
            }
            Err(_) => Err(ServiceError::TokenInvalid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Account;

    fn test_config() -> JwtConfig {
        JwtConfig {
            access_secret: "test-access-secret".to_string(),
            refresh_secret: "test-refresh-secret".to_string(),
            access_token_expiry_minutes: 15,
            refresh_token_expiry_days: 7,
        }
    }

    fn customer() -> Account {
        Account::new(
            "Jane Doe".to_string(),
            "jane@example.com".to_string(),
            "555-0100".to_string(),
            "$argon2id$hash".to_string(),
            None,
        )
    }

    fn dashboard_admin() -> Account {
        Account::new_dashboard(
            "Ops Admin".to_string(),
            "ops@example.com".to_string(),
            "555-0101".to_string(),
            "$argon2id$hash".to_string(),
            Role::Admin,
            vec![3, 7],
            None,
        )
    }

    #[test]
    fn access_token_round_trip() {
        let jwt = JwtService::new(&test_config());
        let token = jwt.issue_access_token(&customer()).unwrap();

        let claims = jwt.verify_access_token(&token).unwrap();
        assert_eq!(claims.email, "jane@example.com");
        assert_eq!(claims.name, "Jane Doe");
        assert_eq!(claims.role, Role::Customer);
        assert!(claims.capability_ids.is_empty());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn dashboard_claims_carry_capability_ids() {
        let jwt = JwtService::new(&test_config());
        let token = jwt.issue_access_token(&dashboard_admin()).unwrap();

        let claims = jwt.verify_access_token(&token).unwrap();
        assert_eq!(claims.capability_ids, vec![3, 7]);
    }

    #[test]
    fn tokens_are_not_interchangeable_across_secrets() {
        let jwt = JwtService::new(&test_config());
        let pair = jwt.issue_token_pair(&customer()).unwrap();

        // Access token does not verify as a refresh token and vice versa
        let err = jwt.verify_refresh_token(&pair.access_token).unwrap_err();
        assert!(matches!(err, ServiceError::TokenInvalid));
        let err = jwt.verify_access_token(&pair.refresh_token).unwrap_err();
        assert!(matches!(err, ServiceError::TokenInvalid));
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let mut config = test_config();
        // Expiry far enough in the past to clear the default leeway
        config.access_token_expiry_minutes = -5;
        let jwt = JwtService::new(&config);

        let token = jwt.issue_access_token(&customer()).unwrap();
        let err = jwt.verify_access_token(&token).unwrap_err();
        assert!(matches!(err, ServiceError::TokenExpired));
    }

    #[test]
    fn garbage_token_is_invalid() {
        let jwt = JwtService::new(&test_config());
        let err = jwt.verify_access_token("not.a.token").unwrap_err();
        assert!(matches!(err, ServiceError::TokenInvalid));
    }

    #[test]
    fn reissued_access_token_keeps_identity_and_grants() {
        let jwt = JwtService::new(&test_config());
        let refresh = jwt.issue_refresh_token(&dashboard_admin()).unwrap();
        let refresh_claims = jwt.verify_refresh_token(&refresh).unwrap();

        let access = jwt.reissue_access_token(&refresh_claims).unwrap();
        let claims = jwt.verify_access_token(&access).unwrap();
        assert_eq!(claims.email, "ops@example.com");
        assert_eq!(claims.capability_ids, vec![3, 7]);
    }
}
