//! One-way password digests (Argon2, PHC string format).

use crate::error::{AppError, AppResult};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Well-formed Argon2id digest (default parameters) that no password is known
/// to match. Verifying against it costs the same as verifying a real digest.
pub const UNMATCHABLE_DIGEST: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$BDpxh3TFcr2KJa2+sb/NXA$qqlAJmTxpB9A67xSyZk+tmrrNmYClY/fqig7ceZNsSM";

/// Salted, irreversible password hashing.
pub trait PasswordEncoder: Send + Sync {
    fn hash(&self, password: &str) -> AppResult<String>;
    fn verify(&self, password: &str, digest: &str) -> AppResult<bool>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Encoder;

impl PasswordEncoder for Argon2Encoder {
    fn hash(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("hash: {}", e)))?
            .to_string();
        Ok(hash)
    }

    fn verify(&self, password: &str, digest: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(digest)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("parse hash: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_password() {
        let encoder = Argon2Encoder;
        let hash = encoder.hash("secret123").unwrap();
        assert!(encoder.verify("secret123", &hash).unwrap());
        assert!(!encoder.verify("wrong", &hash).unwrap());
    }

    #[test]
    fn digest_is_salted_and_fits_column() {
        let encoder = Argon2Encoder;
        let a = encoder.hash("secret123").unwrap();
        let b = encoder.hash("secret123").unwrap();
        assert_ne!(a, b);
        assert!(!a.contains("secret123"));
        assert!(a.len() <= 100);
    }

    #[test]
    fn unmatchable_digest_parses_and_rejects() {
        assert!(PasswordHash::new(UNMATCHABLE_DIGEST).is_ok());
        assert!(!Argon2Encoder.verify("secret123", UNMATCHABLE_DIGEST).unwrap());
        assert!(!Argon2Encoder.verify("", UNMATCHABLE_DIGEST).unwrap());
    }

    #[test]
    fn unparsable_digest_is_an_internal_error() {
        assert!(matches!(
            Argon2Encoder.verify("secret123", "plaintext"),
            Err(AppError::Internal(_))
        ));
    }
}
