use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::{distributions::Alphanumeric, Rng};

/// Newtype for secret material (passwords and OTP codes) to prevent
/// accidental logging
#[derive(Clone)]
pub struct Secret(String);

impl Secret {
    pub fn new(secret: String) -> Self {
        Self(secret)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Newtype for a stored secret hash
#[derive(Debug, Clone)]
pub struct SecretHash(String);

impl SecretHash {
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Hash a secret using Argon2.
///
/// Uses the Argon2id variant with default parameters. The salt is generated
/// per call and embedded in the encoded hash. Passwords and OTP codes go
/// through the same routine; neither is ever stored in plaintext.
pub fn hash_secret(secret: &Secret) -> Result<SecretHash, anyhow::Error> {
    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    let hash = argon2
        .hash_password(secret.as_str().as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash secret: {}", e))?
        .to_string();

    Ok(SecretHash::new(hash))
}

/// Verify a candidate secret against a stored hash.
///
/// Returns false on mismatch and on malformed hashes; never panics. The
/// comparison is the hashing library's constant-time verify routine.
pub fn verify_secret(candidate: &Secret, hash: &SecretHash) -> bool {
    let parsed = match PasswordHash::new(hash.as_str()) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(candidate.as_str().as_bytes(), &parsed)
        .is_ok()
}

/// Generate a random temporary password for admin-invited dashboard accounts.
pub fn generate_temp_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_secret() {
        let secret = Secret::new("mySecurePassword123".to_string());
        let hash = hash_secret(&secret).expect("Failed to hash secret");

        assert!(!hash.as_str().is_empty());
        assert!(hash.as_str().starts_with("$argon2"));
    }

    #[test]
    fn test_verify_round_trip() {
        let secret = Secret::new("mySecurePassword123".to_string());
        let hash = hash_secret(&secret).expect("Failed to hash secret");

        assert!(verify_secret(&secret, &hash));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let secret = Secret::new("mySecurePassword123".to_string());
        let hash = hash_secret(&secret).expect("Failed to hash secret");

        let wrong = Secret::new("wrongPassword".to_string());
        assert!(!verify_secret(&wrong, &hash));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        let secret = Secret::new("mySecurePassword123".to_string());
        assert!(!verify_secret(&secret, &SecretHash::new("not-a-hash".to_string())));
    }

    #[test]
    fn test_different_hashes_for_same_secret() {
        let secret = Secret::new("123456".to_string());
        let hash1 = hash_secret(&secret).expect("Failed to hash secret");
        let hash2 = hash_secret(&secret).expect("Failed to hash secret");

        // Random salt means distinct encodings that both verify
        assert_ne!(hash1.as_str(), hash2.as_str());
        assert!(verify_secret(&secret, &hash1));
        assert!(verify_secret(&secret, &hash2));
    }

    #[test]
    fn test_temp_password_shape() {
        let password = generate_temp_password();
        assert_eq!(password.len(), 12);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
