//! OTP engine: issues, expires, and checks one-time codes.
//!
//! Codes are hashed like passwords before storage and checked lazily at
//! consumption time; no background expiry sweep exists. Each account holds
//! at most one outstanding challenge, and issuing a new one overwrites it.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::config::OtpConfig;
use crate::services::ServiceError;
use crate::utils::{hash_secret, verify_secret, Secret, SecretHash};

/// The stored half of an issued challenge: the code hash and its expiry.
#[derive(Debug, Clone)]
pub struct OtpChallenge {
    pub otp_hash: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct OtpEngine {
    ttl_minutes: i64,
}

impl OtpEngine {
    pub fn new(config: &OtpConfig) -> Self {
        Self {
            ttl_minutes: config.ttl_minutes,
        }
    }

    pub fn ttl_minutes(&self) -> i64 {
        self.ttl_minutes
    }

    /// Draw a 6-digit code uniformly from [100000, 999999]. The range rules
    /// out leading zeros, so the string form is always 6 characters.
    pub fn generate(&self) -> String {
        rand::thread_rng().gen_range(100_000..=999_999).to_string()
    }

    /// Generate a fresh challenge. Returns the plaintext code (for the
    /// notifier) and the hashed challenge (for storage). The caller stores
    /// the challenge on the account, overwriting any outstanding one.
    pub fn issue(&self) -> Result<(String, OtpChallenge), ServiceError> {
        let code = self.generate();
        let otp_hash = hash_secret(&Secret::new(code.clone()))?;

        Ok((
            code,
            OtpChallenge {
                otp_hash: otp_hash.into_string(),
                expires_at: Utc::now() + Duration::minutes(self.ttl_minutes),
            },
        ))
    }

    /// A candidate is well-formed iff it is exactly 6 ASCII digits.
    pub fn is_valid_format(candidate: &str) -> bool {
        candidate.len() == 6 && candidate.bytes().all(|b| b.is_ascii_digit())
    }

    /// Expiry is strict: a challenge is expired only once its deadline has
    /// passed, not at the deadline itself.
    pub fn is_expired(expires_at: &DateTime<Utc>) -> bool {
        *expires_at < Utc::now()
    }

    /// Validate a candidate against the stored challenge.
    ///
    /// Fails with `OtpFormatInvalid`, `OtpExpired`, or `OtpIncorrect`, in
    /// that order. A cleared slot (no stored hash) checks as incorrect, so
    /// consuming the same code twice fails the second time. Clearing the
    /// slot after success is the caller's job: it decides whether the
    /// consumption verifies an email or resets a password.
    pub fn check(
        &self,
        candidate: &str,
        otp_hash: Option<&str>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), ServiceError> {
        if !Self::is_valid_format(candidate) {
            return Err(ServiceError::OtpFormatInvalid);
        }

        if let Some(expires_at) = expires_at {
            if Self::is_expired(&expires_at) {
                return Err(ServiceError::OtpExpired);
            }
        }

        let hash = match otp_hash {
            Some(hash) if !hash.is_empty() => hash,
            _ => return Err(ServiceError::OtpIncorrect),
        };

        if !verify_secret(
            &Secret::new(candidate.to_string()),
            &SecretHash::new(hash.to_string()),
        ) {
            return Err(ServiceError::OtpIncorrect);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> OtpEngine {
        OtpEngine::new(&OtpConfig { ttl_minutes: 5 })
    }

    #[test]
    fn generated_codes_are_six_digits_in_range() {
        let engine = engine();
        for _ in 0..100 {
            let code = engine.generate();
            assert_eq!(code.len(), 6);
            let value: u32 = code.parse().unwrap();
            assert!((100_000..=999_999).contains(&value));
        }
    }

    #[test]
    fn format_check_requires_exactly_six_ascii_digits() {
        assert!(OtpEngine::is_valid_format("123456"));
        assert!(!OtpEngine::is_valid_format("12345"));
        assert!(!OtpEngine::is_valid_format("1234567"));
        assert!(!OtpEngine::is_valid_format("12a456"));
        assert!(!OtpEngine::is_valid_format("12 456"));
        assert!(!OtpEngine::is_valid_format(""));
        // Non-ASCII digits must not pass
        assert!(!OtpEngine::is_valid_format("١٢٣٤٥٦"));
    }

    #[test]
    fn expiry_is_strictly_before_now() {
        let future = Utc::now() + Duration::seconds(59);
        let past = Utc::now() - Duration::seconds(1);
        assert!(!OtpEngine::is_expired(&future));
        assert!(OtpEngine::is_expired(&past));
    }

    #[test]
    fn issued_challenge_checks_against_its_own_code() {
        let engine = engine();
        let (code, challenge) = engine.issue().unwrap();

        assert!(engine
            .check(&code, Some(&challenge.otp_hash), Some(challenge.expires_at))
            .is_ok());
    }

    #[test]
    fn wrong_code_is_incorrect() {
        let engine = engine();
        let (code, challenge) = engine.issue().unwrap();
        let wrong = if code == "100000" { "100001" } else { "100000" };

        let err = engine
            .check(wrong, Some(&challenge.otp_hash), Some(challenge.expires_at))
            .unwrap_err();
        assert!(matches!(err, ServiceError::OtpIncorrect));
    }

    #[test]
    fn malformed_code_fails_before_anything_else() {
        let engine = engine();
        // Even with an expired challenge, the format error wins
        let expired = Utc::now() - Duration::minutes(10);
        let err = engine.check("12x", Some("$argon2id$x"), Some(expired)).unwrap_err();
        assert!(matches!(err, ServiceError::OtpFormatInvalid));
    }

    #[test]
    fn expired_challenge_is_reported_before_comparison() {
        let engine = engine();
        let (code, challenge) = engine.issue().unwrap();
        let expired = Utc::now() - Duration::seconds(1);

        let err = engine
            .check(&code, Some(&challenge.otp_hash), Some(expired))
            .unwrap_err();
        assert!(matches!(err, ServiceError::OtpExpired));
    }

    #[test]
    fn cleared_slot_checks_as_incorrect() {
        let engine = engine();
        let err = engine.check("123456", None, None).unwrap_err();
        assert!(matches!(err, ServiceError::OtpIncorrect));
    }
}
